// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition cache.

/// Errors raised by the partition cache. All of them are fatal for the
/// namespace being partitioned.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The underlying sled database failed.
    #[error("cache storage error: {0}")]
    Storage(#[from] sled::Error),

    /// A stored row could not be decoded.
    #[error("corrupt cache row for signature '{signature}': {detail}")]
    CorruptRow { signature: String, detail: String },
}
