// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`FeasibilityOracle`] trait.

use crate::OracleError;

/// A stateful subsystem that decides by trial whether events can be
/// measured together.
///
/// Calls must follow the order create → `try_add`… → destroy for each
/// context. Prefer [`TrialGuard`](crate::TrialGuard) over calling these
/// methods directly; it guarantees the destroy step.
pub trait FeasibilityOracle {
    /// Opaque trial resource.
    type Handle;

    /// Allocates an empty trial context.
    fn create_trial_context(&mut self) -> Result<Self::Handle, OracleError>;

    /// Tries to add `event` to the context.
    ///
    /// Returns `Ok(false)` when the event cannot coexist with the events
    /// already in the context; the context is left unchanged in that case.
    fn try_add(&mut self, handle: &mut Self::Handle, event: &str) -> Result<bool, OracleError>;

    /// Releases a trial context.
    fn destroy_trial_context(&mut self, handle: Self::Handle) -> Result<(), OracleError>;
}

impl<O: FeasibilityOracle + ?Sized> FeasibilityOracle for &mut O {
    type Handle = O::Handle;

    fn create_trial_context(&mut self) -> Result<Self::Handle, OracleError> {
        (**self).create_trial_context()
    }

    fn try_add(&mut self, handle: &mut Self::Handle, event: &str) -> Result<bool, OracleError> {
        (**self).try_add(handle, event)
    }

    fn destroy_trial_context(&mut self, handle: Self::Handle) -> Result<(), OracleError> {
        (**self).destroy_trial_context(handle)
    }
}
