// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # event-catalog
//!
//! The vocabulary shared by every other crate in the workspace:
//!
//! - [`Namespace`]: the measurement subsystem an event belongs to
//!   (oracle-probed counters, exact device-domain events, or misc tags).
//! - [`DevicePath`]: a parsed `<SUBSYSTEM>.<device>.<domain>.<name>` event.
//! - [`EventCatalog`]: the read-only set of events the measurement
//!   subsystems can observe, populated once from a [`CatalogSource`].
//! - [`HardwareProfile`]: a JSON description of a PMU and its attached
//!   devices; it serves as a [`CatalogSource`] and drives the simulated
//!   oracle and subsystem in `trial-oracle`.
//!
//! # Example
//! ```
//! use event_catalog::{EventCatalog, HardwareProfile};
//!
//! let profile = HardwareProfile::from_json(r#"{
//!     "name": "tiny",
//!     "counters": { "num_slots": 2, "events": [
//!         { "name": "PAPI_TOT_CYC" },
//!         { "name": "PAPI_TOT_INS" }
//!     ] }
//! }"#).unwrap();
//!
//! let catalog = EventCatalog::populate(&profile).unwrap();
//! assert_eq!(catalog.counter_index("PAPI_TOT_INS"), Some(1));
//! ```

mod catalog;
mod error;
mod event;
pub mod profile;

pub use catalog::{CatalogSource, EventCatalog};
pub use error::CatalogError;
pub use event::{DevicePath, Namespace, EVENT_DELIMITER};
pub use profile::HardwareProfile;
