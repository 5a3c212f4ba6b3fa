// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # trial-oracle
//!
//! Interfaces to the measurement subsystems the partitioner consults, plus
//! profile-backed implementations of both.
//!
//! # Key Components
//!
//! - [`FeasibilityOracle`]: answers "can this event join this group?" by
//!   trial allocation: create a context, add events, destroy the context.
//! - [`TrialGuard`]: an RAII wrapper around a trial context. Dropping the
//!   guard destroys the context, so no exit path can leak one.
//! - [`ExactSubsystem`]: a subsystem that computes a device's minimal
//!   grouping directly instead of being probed.
//! - [`SlotOracle`]: a simulated PMU: an event set is feasible when its
//!   events can be matched onto distinct eligible counter slots.
//! - [`DomainSubsystem`]: a simulated device subsystem: one pass per
//!   domain, at most `capacity` events per pass.
//!
//! # Ownership Model
//!
//! ```text
//! TrialGuard::open(&mut oracle)
//!       │   create_trial_context()
//!       ▼
//!   TrialGuard  ◄─── owns Handle, borrows &mut oracle
//!       │
//!       │  release()  or  drop()
//!       ▼
//!   destroy_trial_context(handle)
//! ```
//!
//! The guard holds the oracle mutably for its whole lifetime, so at most
//! one trial context is outstanding at a time.
//!
//! # Example
//! ```
//! use event_catalog::HardwareProfile;
//! use trial_oracle::{SlotOracle, TrialGuard};
//!
//! let profile = HardwareProfile::from_json(r#"{
//!     "name": "two-slot",
//!     "counters": { "num_slots": 2, "events": [
//!         { "name": "A" }, { "name": "B" }, { "name": "C" }
//!     ] }
//! }"#).unwrap();
//! let mut oracle = SlotOracle::from_profile(&profile);
//!
//! let mut trial = TrialGuard::open(&mut oracle).unwrap();
//! assert!(trial.try_add("A").unwrap());
//! assert!(trial.try_add("B").unwrap());
//! assert!(!trial.try_add("C").unwrap()); // only two slots
//! trial.release().unwrap();
//! assert_eq!(oracle.live_contexts(), 0);
//! ```

mod domain;
mod error;
mod guard;
mod oracle;
mod slot;
mod subsystem;

pub use domain::DomainSubsystem;
pub use error::OracleError;
pub use guard::{accepts_all, TrialGuard};
pub use oracle::FeasibilityOracle;
pub use slot::{OracleStats, SlotHandle, SlotOracle};
pub use subsystem::{DeviceId, DeviceInfo, ExactSubsystem};
