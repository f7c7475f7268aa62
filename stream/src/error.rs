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

//! Error types for layered stream operations

use laminar_compress::CompressError;
use std::io;
use thiserror::Error;

/// Result type for layered stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Layered stream error types
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the source, the sink or the relay
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The compression filter could not be constructed
    #[error("Compression error: {0}")]
    Compress(#[from] CompressError),

    /// The relay is exhausted and the source has ended
    #[error("End of stream")]
    EndOfStream,

    /// Compression was already enabled on this stream
    #[error("Compression already enabled")]
    AlreadyCompressed,

    /// The stream has been closed
    #[error("Stream closed")]
    Closed,

    /// The background pump task failed
    #[error("Pump task failed: {0}")]
    Pump(String),

    /// The stream configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StreamError {
    /// Check if the error is the terminal end-of-stream condition
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, StreamError::EndOfStream)
    }

    /// Check if the error means the stream can no longer be used
    pub fn is_closed(&self) -> bool {
        matches!(self, StreamError::Closed | StreamError::Pump(_))
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> io::Error {
        match err {
            StreamError::Io(err) => err,
            StreamError::EndOfStream => io::Error::from(io::ErrorKind::UnexpectedEof),
            StreamError::Closed => io::Error::new(io::ErrorKind::NotConnected, err),
            StreamError::Config(_) | StreamError::Compress(_) => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other => io::Error::other(other),
        }
    }
}
