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

//! Compression algorithm and level selection.

use crate::{CompressError, CompressResult};
use async_compression::Level;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Compression algorithm selection for a layered stream.
///
/// | Algorithm | Format | Typical Protocol |
/// |-----------|--------|------------------|
/// | `Deflate` | Raw DEFLATE (RFC 1951) | IMAP `COMPRESS DEFLATE` (RFC 4978) |
/// | `Zlib` | DEFLATE with Zlib wrapper (RFC 1950) | Telnet MCCP2/MCCP3 |
/// | `Gzip` | Gzip member (RFC 1952) | HTTP-style tunnels |
/// | `Brotli` | Brotli stream (RFC 7932) | Custom protocols |
/// | `Zstd` | Zstandard frame (RFC 8878) | Custom protocols |
///
/// `Deflate` is the default since it is what line-oriented mail protocols negotiate.
///
/// # Examples
///
/// ```rust
/// use laminar_compress::CompressionAlgorithm;
///
/// let algo: CompressionAlgorithm = "DEFLATE".parse().unwrap();
/// assert_eq!(algo, CompressionAlgorithm::Deflate);
/// assert_eq!(algo.name(), "deflate");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionAlgorithm {
    #[default]
    Deflate,
    Zlib,
    Gzip,
    Brotli,
    Zstd,
}

impl CompressionAlgorithm {
    /// All supported algorithms.
    pub const ALL: [CompressionAlgorithm; 5] = [
        CompressionAlgorithm::Deflate,
        CompressionAlgorithm::Zlib,
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Brotli,
        CompressionAlgorithm::Zstd,
    ];

    /// Lowercase name of the algorithm as used in protocol negotiation.
    pub fn name(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Deflate => "deflate",
            CompressionAlgorithm::Zlib => "zlib",
            CompressionAlgorithm::Gzip => "gzip",
            CompressionAlgorithm::Brotli => "brotli",
            CompressionAlgorithm::Zstd => "zstd",
        }
    }

    /// Range of accepted [`CompressionLevel::Precise`] values.
    pub fn level_range(&self) -> RangeInclusive<i32> {
        match self {
            CompressionAlgorithm::Deflate
            | CompressionAlgorithm::Zlib
            | CompressionAlgorithm::Gzip => 0..=9,
            CompressionAlgorithm::Brotli => 0..=11,
            CompressionAlgorithm::Zstd => 1..=22,
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deflate" => Ok(CompressionAlgorithm::Deflate),
            "zlib" => Ok(CompressionAlgorithm::Zlib),
            "gzip" | "gz" => Ok(CompressionAlgorithm::Gzip),
            "brotli" | "br" => Ok(CompressionAlgorithm::Brotli),
            "zstd" | "zstandard" => Ok(CompressionAlgorithm::Zstd),
            _ => Err(CompressError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Compression quality.
///
/// Named levels are valid for every algorithm. `Precise` levels are checked
/// against [`CompressionAlgorithm::level_range`] before any filter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionLevel {
    Fastest,
    #[default]
    Default,
    Best,
    Precise(i32),
}

impl CompressionLevel {
    /// Check that this level is usable with `algorithm`.
    pub fn validate_for(&self, algorithm: CompressionAlgorithm) -> CompressResult<()> {
        self.resolve(algorithm).map(|_| ())
    }

    /// Translate into the encoder quality for `algorithm`.
    pub(crate) fn resolve(&self, algorithm: CompressionAlgorithm) -> CompressResult<Level> {
        match *self {
            CompressionLevel::Fastest => Ok(Level::Fastest),
            CompressionLevel::Default => Ok(Level::Default),
            CompressionLevel::Best => Ok(Level::Best),
            CompressionLevel::Precise(level) => {
                let range = algorithm.level_range();
                if range.contains(&level) {
                    Ok(Level::Precise(level))
                } else {
                    Err(CompressError::InvalidLevel {
                        algorithm,
                        level,
                        min: *range.start(),
                        max: *range.end(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_algorithm_is_deflate() {
        assert_eq!(
            CompressionAlgorithm::default(),
            CompressionAlgorithm::Deflate
        );
        assert_eq!(CompressionLevel::default(), CompressionLevel::Default);
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!(
            "DEFLATE".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Deflate
        );
        assert_eq!(
            " br ".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Brotli
        );
        for algo in CompressionAlgorithm::ALL {
            assert_eq!(algo.name().parse::<CompressionAlgorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        let err = "lzma".parse::<CompressionAlgorithm>().unwrap_err();
        assert_eq!(err, CompressError::UnknownAlgorithm("lzma".to_string()));
    }

    #[test]
    fn test_named_levels_are_always_valid() {
        for algo in CompressionAlgorithm::ALL {
            assert!(CompressionLevel::Fastest.validate_for(algo).is_ok());
            assert!(CompressionLevel::Default.validate_for(algo).is_ok());
            assert!(CompressionLevel::Best.validate_for(algo).is_ok());
        }
    }

    #[test]
    fn test_precise_level_ranges() {
        use CompressionAlgorithm::{Brotli, Deflate, Zstd};

        assert!(CompressionLevel::Precise(9).validate_for(Deflate).is_ok());
        assert!(CompressionLevel::Precise(10).validate_for(Deflate).is_err());
        assert!(CompressionLevel::Precise(11).validate_for(Brotli).is_ok());
        assert!(CompressionLevel::Precise(0).validate_for(Zstd).is_err());
        assert!(CompressionLevel::Precise(22).validate_for(Zstd).is_ok());
    }

    #[test]
    fn test_invalid_level_error_reports_range() {
        let err = CompressionLevel::Precise(-3)
            .validate_for(CompressionAlgorithm::Gzip)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid gzip compression level -3 (expected 0..=9)"
        );
    }
}
