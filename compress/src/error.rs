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

//! Error types for compression filter construction

use crate::CompressionAlgorithm;
use thiserror::Error;

/// Result type for compression filter operations
pub type CompressResult<T> = std::result::Result<T, CompressError>;

/// Compression filter configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressError {
    /// The requested level is outside the range the algorithm accepts
    #[error("Invalid {algorithm} compression level {level} (expected {min}..={max})")]
    InvalidLevel {
        algorithm: CompressionAlgorithm,
        level: i32,
        min: i32,
        max: i32,
    },

    /// The algorithm name is not recognized
    #[error("Unknown compression algorithm: {0}")]
    UnknownAlgorithm(String),
}
