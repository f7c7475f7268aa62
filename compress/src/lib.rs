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

//! # Compression Filters
//!
//! Pluggable compression filters for asynchronous streams. A [`Compressor`]
//! wraps any [`AsyncWrite`](tokio::io::AsyncWrite) and encodes what is written
//! to it; a [`Decompressor`] wraps any [`AsyncBufRead`](tokio::io::AsyncBufRead)
//! and decodes what is read through it. Both are selected at runtime with
//! [`CompressionAlgorithm`], so a connection can negotiate the codec in-band
//! before building its filters.
//!
//! ## Features
//!
//! - **Multiple Algorithms**: Deflate (raw), Zlib, Gzip, Brotli and Zstd
//! - **Checked Levels**: [`CompressionLevel`] is validated before any filter is built
//! - **Interactive Flushing**: `flush()` emits a decodable block without ending the stream
//! - **Zero-cost Dispatch**: enum dispatch over `async-compression` codecs, pinned with
//!   `pin-project-lite`
//!
//! ## Basic Usage
//!
//! ```rust
//! use laminar_compress::{CompressionAlgorithm, CompressionLevel, Compressor, Decompressor};
//! use tokio::io::{AsyncReadExt, AsyncWriteExt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut compressor = Compressor::new(
//!     Vec::new(),
//!     CompressionAlgorithm::Deflate,
//!     CompressionLevel::Default,
//! )?;
//! compressor.write_all(b"4 SELECT INBOX\r\n").await?;
//! compressor.shutdown().await?;
//! let encoded = compressor.into_inner();
//!
//! let mut decompressor = Decompressor::new(&encoded[..], CompressionAlgorithm::Deflate);
//! let mut decoded = Vec::new();
//! decompressor.read_to_end(&mut decoded).await?;
//! assert_eq!(decoded, b"4 SELECT INBOX\r\n");
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod compressor;
mod decompressor;
mod error;

pub use algorithm::{CompressionAlgorithm, CompressionLevel};
pub use compressor::Compressor;
pub use decompressor::Decompressor;
pub use error::{CompressError, CompressResult};
