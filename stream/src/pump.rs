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

//! Asynchronous pump reader
//!
//! A [`PumpReader`] moves bytes from a source into an in-memory relay on a
//! background task, so the source is always being drained regardless of when
//! the consumer reads. Consumer reads are dispatched through a swappable read
//! indirection, which lets a decompression layer be spliced in front of the
//! relay mid-stream without losing or reordering bytes.
//!
//! ```text
//! source ──(pump task)──▶ relay ──▶ [Decompressor] ──▶ read()
//! ```

use crate::relay::{self, RelayProducer, SharedReader, lock};
use crate::{Result, StreamConfig, StreamError};
use laminar_compress::{CompressionAlgorithm, Decompressor};
use metrics::counter;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader, ReadBuf};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

/// First non-EOF error the pump hit reading the source
type ErrorCell = Arc<Mutex<Option<io::Error>>>;

/// The read indirection and the layering state, guarded together
struct ReadState {
    current: Option<SharedReader>,
    compressed: bool,
}

/// A reader served by a background pump.
///
/// # Lifecycle
///
/// Creating a `PumpReader` spawns one tokio task that reads up to
/// `transfer_buffer_size` bytes at a time from the source and writes them to the
/// relay. When the source ends or fails, the task shuts the relay down so reads
/// report [`StreamError::EndOfStream`] once buffered bytes are delivered. A
/// source failure is held back and returned by [`close`](PumpReader::close).
///
/// # Layering
///
/// [`enable_decompression`](PumpReader::enable_decompression) replaces the read
/// indirection with a decoder reading from the previous one. Reads that already
/// took a snapshot of the old indirection finish against it, so the caller must
/// make sure no read is outstanding when the negotiated boundary is reached.
///
/// # Example
///
/// ```rust
/// use laminar_stream::{PumpReader, StreamError};
///
/// # async fn example() -> Result<(), StreamError> {
/// let reader = PumpReader::new(&b"* OK ready\r\n"[..]);
/// let mut buf = [0u8; 64];
/// let n = reader.read(&mut buf).await?;
/// assert_eq!(&buf[..n], b"* OK ready\r\n");
/// assert!(reader.read(&mut buf).await.unwrap_err().is_end_of_stream());
/// reader.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct PumpReader {
    state: Mutex<ReadState>,
    error: ErrorCell,
    cancel: CancellationToken,
    task: tokio::sync::Mutex<Option<JoinHandle<RelayProducer>>>,
}

impl PumpReader {
    /// Start pumping `source` with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new<R>(source: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::spawn(source, &StreamConfig::default())
    }

    /// Start pumping `source` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Config`] if the configuration is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn with_config<R>(source: R, config: &StreamConfig) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        config.validate().map_err(StreamError::Config)?;
        Ok(Self::spawn(source, config))
    }

    pub(crate) fn spawn<R>(source: R, config: &StreamConfig) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (producer, consumer) = relay::relay(config.transfer_buffer_size);
        let error = ErrorCell::default();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump(
            source,
            producer,
            config.transfer_buffer_size,
            error.clone(),
            cancel.clone(),
        ));

        Self {
            state: Mutex::new(ReadState {
                current: Some(consumer),
                compressed: false,
            }),
            error,
            cancel,
            task: tokio::sync::Mutex::new(Some(task)),
        }
    }

    /// Read decoded (or raw) bytes into `buf`.
    ///
    /// Returns the number of bytes read, which is never zero for a non-empty
    /// buffer. An empty `buf` returns `Ok(0)` immediately.
    ///
    /// # Errors
    ///
    /// - [`StreamError::EndOfStream`] once the source has ended and every
    ///   relayed byte was delivered; repeated on every later call
    /// - [`StreamError::Closed`] after [`close`](PumpReader::close)
    /// - [`StreamError::Io`] if a decompression layer rejects the data
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut reader = self.snapshot()?;
        match reader.read(buf).await? {
            0 => {
                trace!("Relay exhausted");
                Err(StreamError::EndOfStream)
            }
            n => Ok(n),
        }
    }

    /// Splice a decoder for `algorithm` in front of the current read indirection.
    ///
    /// Only reads issued after this call observe decoded data.
    ///
    /// # Errors
    ///
    /// - [`StreamError::AlreadyCompressed`] if a decoder is already installed
    /// - [`StreamError::Closed`] after [`close`](PumpReader::close)
    pub fn enable_decompression(&self, algorithm: CompressionAlgorithm) -> Result<()> {
        let mut state = self.lock_state();
        if state.compressed {
            return Err(StreamError::AlreadyCompressed);
        }

        let previous = state.current.take().ok_or(StreamError::Closed)?;
        let decoder = Decompressor::new(BufReader::new(previous), algorithm);
        state.current = Some(SharedReader::new(decoder));
        state.compressed = true;

        debug!(%algorithm, "Read path decompressing");
        Ok(())
    }

    /// Whether a decoder has been spliced in
    pub fn is_compressed(&self) -> bool {
        self.lock_state().compressed
    }

    /// Kind of the source error waiting to be returned by `close`, if any
    pub fn pump_error(&self) -> Option<io::ErrorKind> {
        lock(&self.error).as_ref().map(io::Error::kind)
    }

    /// Tear the reader down.
    ///
    /// If the pump recorded a source error, that error is returned and nothing
    /// else happens; a later call then performs the teardown. Otherwise the
    /// pump is cancelled and drops the source, then the relay producer is shut
    /// down and the relay consumer released. Every step runs and the first failure
    /// is returned. Closing an already closed reader returns `Ok(())`.
    #[instrument(level = "debug", skip(self))]
    pub async fn close(&self) -> Result<()> {
        if let Some(err) = lock(&self.error).take() {
            debug!(error = %err, "Returning deferred pump error");
            return Err(err.into());
        }

        let Some(task) = self.task.lock().await.take() else {
            return Ok(());
        };
        let mut first = None;

        self.cancel.cancel();
        let producer = match task.await {
            Ok(producer) => Some(producer),
            Err(err) => {
                first.get_or_insert(StreamError::Pump(err.to_string()));
                None
            }
        };

        if let Some(mut producer) = producer {
            if let Err(err) = producer.shutdown().await {
                first.get_or_insert(StreamError::Io(err));
            }
        }

        self.lock_state().current = None;

        debug!("Pump reader closed");
        first.map_or(Ok(()), Err)
    }

    pub(crate) fn poll_read_shared(
        &self,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.snapshot() {
            Ok(mut reader) => Pin::new(&mut reader).poll_read(cx, buf),
            Err(err) => Poll::Ready(Err(err.into())),
        }
    }

    fn snapshot(&self) -> Result<SharedReader> {
        self.lock_state().current.clone().ok_or(StreamError::Closed)
    }

    fn lock_state(&self) -> MutexGuard<'_, ReadState> {
        lock(&self.state)
    }
}

impl AsyncRead for PumpReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.poll_read_shared(cx, buf)
    }
}

impl fmt::Debug for PumpReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PumpReader")
            .field("compressed", &self.is_compressed())
            .field("pump_error", &self.pump_error())
            .finish_non_exhaustive()
    }
}

impl Drop for PumpReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump<R>(
    mut source: R,
    mut producer: RelayProducer,
    buffer_size: usize,
    error: ErrorCell,
    cancel: CancellationToken,
) -> RelayProducer
where
    R: AsyncRead + Unpin,
{
    debug!(buffer_size, "Pump started");
    tokio::select! {
        biased;
        _ = cancel.cancelled() => trace!("Pump cancelled"),
        pumped = transfer(&mut source, &mut producer, buffer_size, &error) => {
            debug!(bytes = pumped, "Pump stopped");
        }
    }
    drop(source);
    producer
}

/// Copy the source into the relay until it ends or fails. Returns bytes moved.
async fn transfer<R>(
    source: &mut R,
    producer: &mut RelayProducer,
    buffer_size: usize,
    error: &ErrorCell,
) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; buffer_size];
    let mut pumped = 0u64;

    loop {
        match source.read(&mut buf).await {
            Ok(0) => {
                trace!("Source reached end of stream");
                break;
            }
            Ok(n) => {
                if let Err(err) = producer.write_all(&buf[..n]).await {
                    trace!(error = %err, "Relay consumer went away");
                    break;
                }
                pumped += n as u64;
                counter!("laminar.pump.bytes").increment(n as u64);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(error = %err, "Source read failed");
                *lock(error) = Some(err);
                break;
            }
        }
    }

    // Recorded before shutdown so a consumer seeing EOF can rely on it
    if let Err(err) = producer.shutdown().await {
        trace!(error = %err, "Relay shutdown failed");
    }
    pumped
}
