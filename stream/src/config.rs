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

//! Layered stream configuration
//!
//! # Examples
//!
//! ```
//! use laminar_stream::{CompressionConfig, StreamConfig};
//! use laminar_compress::{CompressionAlgorithm, CompressionLevel};
//!
//! let config = StreamConfig::default()
//!     .with_transfer_buffer_size(16 * 1024)
//!     .with_compression(
//!         CompressionConfig::new(CompressionAlgorithm::Zlib)
//!             .with_level(CompressionLevel::Precise(6)),
//!     );
//! assert!(config.validate().is_ok());
//! ```

use laminar_compress::{CompressionAlgorithm, CompressionLevel};

/// Default number of bytes the pump moves per iteration
pub const DEFAULT_TRANSFER_BUFFER_SIZE: usize = 4096;

/// Largest accepted transfer buffer
pub const MAX_TRANSFER_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Compression settings applied when compression is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionConfig {
    /// Algorithm used on both the read and the write path
    pub algorithm: CompressionAlgorithm,

    /// Encoder quality for the write path
    pub level: CompressionLevel,
}

impl CompressionConfig {
    /// Create a compression configuration for the given algorithm
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self {
            algorithm,
            level: CompressionLevel::Default,
        }
    }

    /// Set the encoder quality
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }
}

/// Layered stream configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Bytes read from the source per pump iteration; also the relay capacity
    pub transfer_buffer_size: usize,

    /// Compression settings used by `enable_compression`
    pub compression: CompressionConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            transfer_buffer_size: DEFAULT_TRANSFER_BUFFER_SIZE,
            compression: CompressionConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Set the transfer buffer size
    pub fn with_transfer_buffer_size(mut self, size: usize) -> Self {
        self.transfer_buffer_size = size;
        self
    }

    /// Set the compression settings
    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    /// Validate the configuration
    ///
    /// The compression level is checked when compression is enabled, not here.
    pub fn validate(&self) -> Result<(), String> {
        if self.transfer_buffer_size == 0 {
            return Err("transfer_buffer_size must be greater than 0".to_string());
        }

        if self.transfer_buffer_size > MAX_TRANSFER_BUFFER_SIZE {
            return Err(format!(
                "transfer_buffer_size must be at most {MAX_TRANSFER_BUFFER_SIZE}"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.transfer_buffer_size, 4096);
        assert_eq!(config.compression.algorithm, CompressionAlgorithm::Deflate);
        assert_eq!(config.compression.level, CompressionLevel::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = StreamConfig::default()
            .with_transfer_buffer_size(512)
            .with_compression(
                CompressionConfig::new(CompressionAlgorithm::Zstd)
                    .with_level(CompressionLevel::Fastest),
            );

        assert_eq!(config.transfer_buffer_size, 512);
        assert_eq!(config.compression.algorithm, CompressionAlgorithm::Zstd);
        assert_eq!(config.compression.level, CompressionLevel::Fastest);
    }

    #[test]
    fn test_validation() {
        let mut config = StreamConfig::default();
        assert!(config.validate().is_ok());

        config.transfer_buffer_size = 0;
        assert!(config.validate().is_err());

        config.transfer_buffer_size = MAX_TRANSFER_BUFFER_SIZE + 1;
        assert!(config.validate().is_err());

        // Out-of-range levels are only rejected on activation
        config.transfer_buffer_size = 1;
        config.compression.level = CompressionLevel::Precise(99);
        assert!(config.validate().is_ok());
    }
}
