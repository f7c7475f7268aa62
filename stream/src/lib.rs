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

//! # Layered Duplex Streams
//!
//! Duplex byte streams that can switch from raw to compressed transport in the
//! middle of a connection. Protocols such as IMAP (`COMPRESS DEFLATE`) or
//! telnet (MCCP) negotiate compression with an in-band command; from the next
//! byte on, everything must be encoded and decoded while the bytes already in
//! flight stay in order.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────── LayeredStream ────────────┐
//! source ──pump──▶│ relay ──▶ [Decompressor] ──▶ read()   │
//!                 │                                       │
//! sink   ◀────────│ [Compressor + flush] ◀──── write()    │
//!                 └───────────────────────────────────────┘
//! ```
//!
//! - [`PumpReader`] drains the source into an in-memory relay on a background
//!   task and dispatches reads through a swappable read indirection.
//! - [`LayeredStream`] adds the write path and the one-shot
//!   [`enable_compression`](LayeredStream::enable_compression) switch.
//!
//! # Example
//!
//! ```
//! use laminar_stream::{LayeredStream, StreamError};
//! use tokio::io::AsyncReadExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), StreamError> {
//! let (client, server) = tokio::io::duplex(4096);
//! let (source, sink) = tokio::io::split(client);
//! let stream = LayeredStream::new(source, sink);
//!
//! let (peer_source, peer_sink) = tokio::io::split(server);
//! let mut peer = LayeredStream::new(peer_source, peer_sink);
//!
//! stream.write(b"1 COMPRESS DEFLATE\r\n").await?;
//! let mut command = [0u8; 20];
//! peer.read_exact(&mut command).await?;
//! assert_eq!(&command, b"1 COMPRESS DEFLATE\r\n");
//!
//! // Both sides switch once the command has been consumed
//! stream.enable_compression().await?;
//! peer.enable_compression().await?;
//!
//! stream.write(b"2 SELECT INBOX\r\n").await?;
//! let mut command = [0u8; 16];
//! peer.read_exact(&mut command).await?;
//! assert_eq!(&command, b"2 SELECT INBOX\r\n");
//!
//! stream.close().await?;
//! peer.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod layered;
mod pump;
mod relay;

pub use config::{
    CompressionConfig, DEFAULT_TRANSFER_BUFFER_SIZE, MAX_TRANSFER_BUFFER_SIZE, StreamConfig,
};
pub use error::{Result, StreamError};
pub use laminar_compress::{CompressionAlgorithm, CompressionLevel};
pub use layered::LayeredStream;
pub use pump::PumpReader;
