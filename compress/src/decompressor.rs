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

//! Reader-side decompression filter

use crate::CompressionAlgorithm;
use async_compression::tokio::bufread::{
    BrotliDecoder, DeflateDecoder, GzipDecoder, ZlibDecoder, ZstdDecoder,
};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{self, AsyncBufRead, AsyncRead, ReadBuf};

pin_project! {
    /// A decompression filter wrapping an [`AsyncBufRead`].
    ///
    /// Reads return decoded bytes. Once the compressed stream ends, reads
    /// return end-of-file even if the inner reader has more data. An inner
    /// reader that ends before the compressed stream is complete is an error.
    pub struct Decompressor<R> {
        #[pin]
        inner: Decoder<R>,
    }
}

impl<R> Decompressor<R>
where
    R: AsyncBufRead,
{
    /// Wrap `reader` in a decoder for `algorithm`.
    pub fn new(reader: R, algorithm: CompressionAlgorithm) -> Self {
        Self {
            inner: Decoder::new(reader, algorithm),
        }
    }

    /// The algorithm this filter decodes.
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.inner.algorithm()
    }

    /// Reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Consume the filter, returning the wrapped reader.
    ///
    /// Bytes the decoder has already pulled from the reader are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R> AsyncRead for Decompressor<R>
where
    R: AsyncBufRead,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.project().inner.poll_read(cx, buf)
    }
}

pin_project! {
    #[project = DecoderProj]
    enum Decoder<R> {
        Deflate { #[pin] inner: DeflateDecoder<R> },
        Zlib { #[pin] inner: ZlibDecoder<R> },
        Gzip { #[pin] inner: GzipDecoder<R> },
        Brotli { #[pin] inner: BrotliDecoder<R> },
        Zstd { #[pin] inner: ZstdDecoder<R> },
    }
}

impl<R> Decoder<R>
where
    R: AsyncBufRead,
{
    fn new(inner: R, algorithm: CompressionAlgorithm) -> Self {
        match algorithm {
            CompressionAlgorithm::Deflate => Self::Deflate {
                inner: DeflateDecoder::new(inner),
            },
            CompressionAlgorithm::Zlib => Self::Zlib {
                inner: ZlibDecoder::new(inner),
            },
            CompressionAlgorithm::Gzip => Self::Gzip {
                inner: GzipDecoder::new(inner),
            },
            CompressionAlgorithm::Brotli => Self::Brotli {
                inner: BrotliDecoder::new(inner),
            },
            CompressionAlgorithm::Zstd => Self::Zstd {
                inner: ZstdDecoder::new(inner),
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

    fn get_ref(&self) -> &R {
        match self {
            Self::Deflate { inner } => inner.get_ref(),
            Self::Zlib { inner } => inner.get_ref(),
            Self::Gzip { inner } => inner.get_ref(),
            Self::Brotli { inner } => inner.get_ref(),
            Self::Zstd { inner } => inner.get_ref(),
        }
    }

    fn into_inner(self) -> R {
        match self {
            Self::Deflate { inner } => inner.into_inner(),
            Self::Zlib { inner } => inner.into_inner(),
            Self::Gzip { inner } => inner.into_inner(),
            Self::Brotli { inner } => inner.into_inner(),
            Self::Zstd { inner } => inner.into_inner(),
        }
    }
}

impl<R> AsyncRead for Decoder<R>
where
    R: AsyncBufRead,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.project() {
            DecoderProj::Deflate { inner } => inner.poll_read(cx, buf),
            DecoderProj::Zlib { inner } => inner.poll_read(cx, buf),
            DecoderProj::Gzip { inner } => inner.poll_read(cx, buf),
            DecoderProj::Brotli { inner } => inner.poll_read(cx, buf),
            DecoderProj::Zstd { inner } => inner.poll_read(cx, buf),
        }
    }
}
