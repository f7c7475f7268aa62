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

//! Writer-side compression filter

use crate::{CompressResult, CompressionAlgorithm, CompressionLevel};
use async_compression::Level;
use async_compression::tokio::write::{
    BrotliEncoder, DeflateEncoder, GzipEncoder, ZlibEncoder, ZstdEncoder,
};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{self, AsyncWrite};

pin_project! {
    /// A compression filter wrapping an [`AsyncWrite`].
    ///
    /// Bytes written to the `Compressor` are encoded with the selected
    /// [`CompressionAlgorithm`] and forwarded to the wrapped writer.
    ///
    /// # Flushing
    ///
    /// `flush()` performs a sync flush of the encoder: everything written so far
    /// is emitted as a decodable block and the inner writer is flushed. The
    /// stream is *not* finished, so further writes continue the same compressed
    /// stream. `shutdown()` writes the trailer and shuts the inner writer down.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use laminar_compress::{CompressionAlgorithm, CompressionLevel, Compressor};
    /// use tokio::io::AsyncWriteExt;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut compressor = Compressor::new(
    ///     Vec::new(),
    ///     CompressionAlgorithm::Deflate,
    ///     CompressionLevel::Default,
    /// )?;
    /// compressor.write_all(b"4 SELECT INBOX\r\n").await?;
    /// compressor.flush().await?;
    /// assert!(!compressor.get_ref().is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub struct Compressor<W> {
        #[pin]
        inner: Encoder<W>,
    }
}

impl<W> Compressor<W>
where
    W: AsyncWrite,
{
    /// Wrap `writer` in an encoder for `algorithm` at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::InvalidLevel`](crate::CompressError::InvalidLevel)
    /// if `level` is out of range for `algorithm`. The writer is dropped in that
    /// case; validate with [`CompressionLevel::validate_for`] first to keep it.
    pub fn new(
        writer: W,
        algorithm: CompressionAlgorithm,
        level: CompressionLevel,
    ) -> CompressResult<Self> {
        let quality = level.resolve(algorithm)?;
        Ok(Self {
            inner: Encoder::new(writer, algorithm, quality),
        })
    }

    /// The algorithm this filter encodes with.
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.inner.algorithm()
    }

    /// Reference to the wrapped writer.
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Mutable reference to the wrapped writer.
    ///
    /// Writing to it directly corrupts the compressed stream.
    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    /// Consume the filter, returning the wrapped writer.
    ///
    /// Call `shutdown()` first or the compressed stream will be incomplete.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W> AsyncWrite for Compressor<W>
where
    W: AsyncWrite,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        self.project().inner.poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        self.project().inner.poll_shutdown(cx)
    }
}

pin_project! {
    #[project = EncoderProj]
    enum Encoder<W> {
        Deflate { #[pin] inner: DeflateEncoder<W> },
        Zlib { #[pin] inner: ZlibEncoder<W> },
        Gzip { #[pin] inner: GzipEncoder<W> },
        Brotli { #[pin] inner: BrotliEncoder<W> },
        Zstd { #[pin] inner: ZstdEncoder<W> },
    }
}

impl<W> Encoder<W>
where
    W: AsyncWrite,
{
    fn new(inner: W, algorithm: CompressionAlgorithm, quality: Level) -> Self {
        match algorithm {
            CompressionAlgorithm::Deflate => Self::Deflate {
                inner: DeflateEncoder::with_quality(inner, quality),
            },
            CompressionAlgorithm::Zlib => Self::Zlib {
                inner: ZlibEncoder::with_quality(inner, quality),
            },
            CompressionAlgorithm::Gzip => Self::Gzip {
                inner: GzipEncoder::with_quality(inner, quality),
            },
            CompressionAlgorithm::Brotli => Self::Brotli {
                inner: BrotliEncoder::with_quality(inner, quality),
            },
            CompressionAlgorithm::Zstd => Self::Zstd {
                inner: ZstdEncoder::with_quality(inner, quality),
            },
        }
    }

    fn algorithm(&self) -> CompressionAlgorithm {
        match self {
            Self::Deflate { .. } => CompressionAlgorithm::Deflate,
            Self::Zlib { .. } => CompressionAlgorithm::Zlib,
            Self::Gzip { .. } => CompressionAlgorithm::Gzip,
            Self::Brotli { .. } => CompressionAlgorithm::Brotli,
            Self::Zstd { .. } => CompressionAlgorithm::Zstd,
        }
    }

    fn get_ref(&self) -> &W {
        match self {
            Self::Deflate { inner } => inner.get_ref(),
            Self::Zlib { inner } => inner.get_ref(),
            Self::Gzip { inner } => inner.get_ref(),
            Self::Brotli { inner } => inner.get_ref(),
            Self::Zstd { inner } => inner.get_ref(),
        }
    }

    fn get_mut(&mut self) -> &mut W {
        match self {
            Self::Deflate { inner } => inner.get_mut(),
            Self::Zlib { inner } => inner.get_mut(),
            Self::Gzip { inner } => inner.get_mut(),
            Self::Brotli { inner } => inner.get_mut(),
            Self::Zstd { inner } => inner.get_mut(),
        }
    }

    fn into_inner(self) -> W {
        match self {
            Self::Deflate { inner } => inner.into_inner(),
            Self::Zlib { inner } => inner.into_inner(),
            Self::Gzip { inner } => inner.into_inner(),
            Self::Brotli { inner } => inner.into_inner(),
            Self::Zstd { inner } => inner.into_inner(),
        }
    }
}

impl<W> AsyncWrite for Encoder<W>
where
    W: AsyncWrite,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        match self.project() {
            EncoderProj::Deflate { inner } => inner.poll_write(cx, buf),
            EncoderProj::Zlib { inner } => inner.poll_write(cx, buf),
            EncoderProj::Gzip { inner } => inner.poll_write(cx, buf),
            EncoderProj::Brotli { inner } => inner.poll_write(cx, buf),
            EncoderProj::Zstd { inner } => inner.poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.project() {
            EncoderProj::Deflate { inner } => inner.poll_flush(cx),
            EncoderProj::Zlib { inner } => inner.poll_flush(cx),
            EncoderProj::Gzip { inner } => inner.poll_flush(cx),
            EncoderProj::Brotli { inner } => inner.poll_flush(cx),
            EncoderProj::Zstd { inner } => inner.poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.project() {
            EncoderProj::Deflate { inner } => inner.poll_shutdown(cx),
            EncoderProj::Zlib { inner } => inner.poll_shutdown(cx),
            EncoderProj::Gzip { inner } => inner.poll_shutdown(cx),
            EncoderProj::Brotli { inner } => inner.poll_shutdown(cx),
            EncoderProj::Zstd { inner } => inner.poll_shutdown(cx),
        }
    }
}
