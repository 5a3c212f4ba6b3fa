// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for event classification and catalog construction.

/// Errors that can occur while building or querying the event catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The hardware profile file could not be read.
    #[error("failed to read hardware profile: {0}")]
    ProfileReadError(#[from] std::io::Error),

    /// The hardware profile JSON is malformed.
    #[error("failed to parse hardware profile: {0}")]
    ProfileParseError(#[from] serde_json::Error),

    /// The hardware profile is internally inconsistent.
    #[error("invalid hardware profile '{profile}': {detail}")]
    InvalidProfile { profile: String, detail: String },

    /// A device-domain event name is not a well-formed dotted path.
    #[error("malformed device event '{event}': expected <SUBSYSTEM>.<device>.<domain>.<name>")]
    MalformedDevicePath { event: String },

    /// The catalog source failed while enumerating events.
    #[error("catalog source failed for namespace '{namespace}': {detail}")]
    SourceError { namespace: String, detail: String },
}
