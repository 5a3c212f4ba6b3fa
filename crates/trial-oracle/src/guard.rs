// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII trial-context guard that destroys the context on drop.
//!
//! [`TrialGuard`] is how the partitioner talks to a [`FeasibilityOracle`].
//! Creating the guard creates the context; dropping it destroys the
//! context, including on `?` early returns after an oracle fault. The
//! explicit [`TrialGuard::release`] path exists so that a teardown failure
//! on the normal path can be reported instead of only logged.

use crate::{FeasibilityOracle, OracleError};

/// A scoped trial context.
///
/// # Example
/// ```ignore
/// let mut trial = TrialGuard::open(&mut oracle)?;
/// let fits = trial.try_add("PAPI_TOT_CYC")?;
/// trial.release()?;          // context destroyed, fault reported
/// ```
pub struct TrialGuard<'a, O: FeasibilityOracle + ?Sized> {
    oracle: &'a mut O,
    /// Wrapped in `Option` so `release()` and `drop()` can take it.
    handle: Option<O::Handle>,
    /// Number of events accepted so far.
    accepted: usize,
}

impl<'a, O: FeasibilityOracle + ?Sized> TrialGuard<'a, O> {
    /// Creates a trial context on `oracle`.
    pub fn open(oracle: &'a mut O) -> Result<Self, OracleError> {
        let handle = oracle.create_trial_context()?;
        Ok(Self {
            oracle,
            handle: Some(handle),
            accepted: 0,
        })
    }

    /// Tries to add `event` to the context.
    pub fn try_add(&mut self, event: &str) -> Result<bool, OracleError> {
        let handle = self.handle.as_mut().ok_or(OracleError::ContextReleased)?;
        let added = self.oracle.try_add(handle, event)?;
        if added {
            self.accepted += 1;
        }
        Ok(added)
    }

    /// Number of events accepted into this context.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Destroys the context, reporting any teardown fault.
    pub fn release(mut self) -> Result<(), OracleError> {
        match self.handle.take() {
            Some(handle) => self.oracle.destroy_trial_context(handle),
            None => Ok(()),
        }
    }
}

impl<O: FeasibilityOracle + ?Sized> Drop for TrialGuard<'_, O> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.oracle.destroy_trial_context(handle) {
                tracing::warn!("trial context teardown failed during unwind: {e}");
            }
        }
    }
}

impl<O: FeasibilityOracle + ?Sized> std::fmt::Debug for TrialGuard<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialGuard")
            .field("accepted", &self.accepted)
            .field("live", &self.handle.is_some())
            .finish()
    }
}

/// Replays `events` in order against a fresh trial context.
///
/// Returns `Ok(true)` if every event was accepted.
pub fn accepts_all<O, S>(oracle: &mut O, events: &[S]) -> Result<bool, OracleError>
where
    O: FeasibilityOracle + ?Sized,
    S: AsRef<str>,
{
    let mut trial = TrialGuard::open(oracle)?;
    for event in events {
        if !trial.try_add(event.as_ref())? {
            trial.release()?;
            return Ok(false);
        }
    }
    trial.release()?;
    Ok(true)
}
