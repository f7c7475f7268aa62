//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Layered duplex stream
//!
//! [`LayeredStream`] pairs a [`PumpReader`] with a direct writer and can switch
//! both directions to compressed transport once, mid-connection:
//!
//! ```text
//! Plain ──enable_compression()──▶ Compressed
//! ```
//!
//! Writes made while compressed are flushed through the encoder before
//! `write` returns, so a request/response peer sees every message promptly.

use crate::{CompressionConfig, PumpReader, Result, StreamConfig, StreamError};
use laminar_compress::Compressor;
use metrics::counter;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

/// The write indirection
enum WriteLayer<W> {
    Plain(W),
    Compressed(Compressor<W>),
}

impl<W> WriteLayer<W>
where
    W: AsyncWrite + Unpin,
{
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            WriteLayer::Plain(sink) => sink.write(buf).await,
            WriteLayer::Compressed(compressor) => {
                let written = compressor.write(buf).await?;
                compressor.flush().await?;
                Ok(written)
            }
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            WriteLayer::Plain(sink) => sink.write_all(buf).await,
            WriteLayer::Compressed(compressor) => {
                compressor.write_all(buf).await?;
                compressor.flush().await
            }
        }
    }

    async fn flush(&mut self) -> io::Result<()> {
        match self {
            WriteLayer::Plain(sink) => sink.flush().await,
            WriteLayer::Compressed(compressor) => compressor.flush().await,
        }
    }

    /// Finish any compressed stream, then shut the sink down
    async fn shutdown(self) -> io::Result<()> {
        match self {
            WriteLayer::Plain(mut sink) => sink.shutdown().await,
            WriteLayer::Compressed(mut compressor) => compressor.shutdown().await,
        }
    }
}

/// A duplex stream whose read and write paths can be switched to compressed
/// transport mid-connection.
///
/// All methods take `&self`, so one task can read while another writes
/// (share it through an `Arc`). Reads are served by a background pump; see
/// [`PumpReader`] for the ordering rules around activation.
///
/// # Example
///
/// ```rust,no_run
/// use laminar_stream::LayeredStream;
/// use tokio::net::TcpStream;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (source, sink) = TcpStream::connect("127.0.0.1:143").await?.into_split();
/// let stream = LayeredStream::new(source, sink);
///
/// stream.write(b"3 COMPRESS DEFLATE\r\n").await?;
/// let mut buf = [0u8; 1024];
/// let n = stream.read(&mut buf).await?;
/// if buf[..n].starts_with(b"3 OK") {
///     // Everything after the tagged response is compressed
///     stream.enable_compression().await?;
/// }
/// stream.write(b"4 SELECT INBOX\r\n").await?;
/// stream.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct LayeredStream<W> {
    reader: PumpReader,
    writer: Mutex<Option<WriteLayer<W>>>,
    config: StreamConfig,
}

impl<W> LayeredStream<W>
where
    W: AsyncWrite + Unpin,
{
    /// Wrap `source` and `sink` with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new<R>(source: R, sink: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::build(source, sink, StreamConfig::default())
    }

    /// Wrap `source` and `sink` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Config`] if the configuration is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn with_config<R>(source: R, sink: W, config: StreamConfig) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        config.validate().map_err(StreamError::Config)?;
        Ok(Self::build(source, sink, config))
    }

    fn build<R>(source: R, sink: W, config: StreamConfig) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        debug!(
            transfer_buffer_size = config.transfer_buffer_size,
            algorithm = %config.compression.algorithm,
            "Creating layered stream"
        );
        Self {
            reader: PumpReader::spawn(source, &config),
            writer: Mutex::new(Some(WriteLayer::Plain(sink))),
            config,
        }
    }

    /// Read from the current read path. See [`PumpReader::read`].
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.reader.read(buf).await
    }

    /// Write to the current write path.
    ///
    /// With compression enabled the encoder is flushed before returning, so
    /// the peer can decode everything written so far.
    pub async fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut writer = self.writer.lock().await;
        let layer = writer.as_mut().ok_or(StreamError::Closed)?;
        let written = layer.write(buf).await?;
        counter!("laminar.stream.bytes_written").increment(written as u64);
        trace!(written, "Wrote to stream");
        Ok(written)
    }

    /// Write all of `buf` with a single trailing flush.
    pub async fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let layer = writer.as_mut().ok_or(StreamError::Closed)?;
        layer.write_all(buf).await?;
        counter!("laminar.stream.bytes_written").increment(buf.len() as u64);
        Ok(())
    }

    /// Flush the current write path.
    pub async fn flush(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let layer = writer.as_mut().ok_or(StreamError::Closed)?;
        layer.flush().await?;
        Ok(())
    }

    /// Switch both directions to compressed transport.
    ///
    /// Every read issued after this returns decodes the configured algorithm;
    /// every write is encoded with it. Call it only when no read is outstanding
    /// and the last plain byte from the peer has been consumed.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Compress`] if the configured level is invalid for the
    ///   algorithm; the stream stays plain
    /// - [`StreamError::AlreadyCompressed`] on a second call; nothing changes
    /// - [`StreamError::Closed`] after [`close`](LayeredStream::close)
    #[instrument(
        level = "debug",
        skip(self),
        fields(algorithm = %self.config.compression.algorithm)
    )]
    pub async fn enable_compression(&self) -> Result<()> {
        let CompressionConfig { algorithm, level } = self.config.compression;
        level.validate_for(algorithm)?;

        let mut writer = self.writer.lock().await;
        let sink = match writer.take() {
            Some(WriteLayer::Plain(sink)) => sink,
            Some(layer @ WriteLayer::Compressed(_)) => {
                *writer = Some(layer);
                return Err(StreamError::AlreadyCompressed);
            }
            None => return Err(StreamError::Closed),
        };

        let compressor = Compressor::new(sink, algorithm, level)?;
        if let Err(err) = self.reader.enable_decompression(algorithm) {
            *writer = Some(WriteLayer::Plain(compressor.into_inner()));
            return Err(err);
        }
        *writer = Some(WriteLayer::Compressed(compressor));

        counter!("laminar.stream.compression_enabled").increment(1);
        debug!("Compression enabled");
        Ok(())
    }

    /// Whether compression has been enabled
    pub fn is_compressed(&self) -> bool {
        self.reader.is_compressed()
    }

    /// Kind of the source error waiting to be returned by `close`, if any
    pub fn pump_error(&self) -> Option<io::ErrorKind> {
        self.reader.pump_error()
    }

    /// The configuration this stream was built with
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Close both directions.
    ///
    /// The write path is shut down first, finishing an active compressed
    /// stream so the peer sees its trailer. That step is best effort: a peer
    /// that already hung up cannot take the trailer, so a write-side failure
    /// is logged and dropped. The read path is then closed as described in
    /// [`PumpReader::close`] and its result is returned.
    #[instrument(level = "debug", skip(self))]
    pub async fn close(&self) -> Result<()> {
        let layer = self.writer.lock().await.take();
        if let Some(layer) = layer {
            if let Err(err) = layer.shutdown().await {
                debug!(error = %err, "Write path shutdown failed");
            }
        }

        self.reader.close().await?;
        debug!("Layered stream closed");
        Ok(())
    }
}

impl<W> AsyncRead for LayeredStream<W> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.reader.poll_read_shared(cx, buf)
    }
}

impl<W> fmt::Debug for LayeredStream<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredStream")
            .field("reader", &self.reader)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
