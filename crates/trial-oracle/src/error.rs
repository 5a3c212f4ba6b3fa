// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for oracle and subsystem faults.
//!
//! An infeasible combination is *not* an error: `try_add` reports it as
//! `Ok(false)`. Everything here is an environment fault that aborts the
//! partition request.

/// Faults raised by a feasibility oracle or an exact subsystem.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// A trial context could not be created.
    #[error("failed to create trial context: {detail}")]
    ContextCreation { detail: String },

    /// A trial context could not be destroyed.
    #[error("failed to destroy trial context: {detail}")]
    ContextTeardown { detail: String },

    /// A guard was used after its context was released.
    #[error("trial context already released")]
    ContextReleased,

    /// The oracle does not know an event the catalog accepted.
    #[error("oracle does not recognise event '{event}'")]
    UnknownEvent { event: String },

    /// A single event could not be placed in an empty trial context.
    #[error("event '{event}' rejected as a singleton group")]
    SingletonRejected { event: String },

    /// A member of an already-verified group was rejected on replay.
    #[error("event '{event}' rejected while replaying verified group [{group}]")]
    UnexpectedRejection { event: String, group: String },

    /// The exact subsystem does not know the requested device.
    #[error("unknown device '{device}'")]
    UnknownDevice { device: String },

    /// The exact subsystem failed to compute a grouping.
    #[error("subsystem error on device '{device}': {detail}")]
    SubsystemError { device: String, detail: String },
}
