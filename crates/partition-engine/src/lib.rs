// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-engine
//!
//! The entry point of the event-set partitioner.
//!
//! The engine takes:
//! - An [`event_catalog::EventCatalog`] of the events the hardware offers.
//! - A [`trial_oracle::FeasibilityOracle`] for counter events.
//! - A [`trial_oracle::ExactSubsystem`] for device-domain events.
//! - A [`partition_cache::PartitionCache`] per request.
//!
//! and turns a requested event list into the fewest groups it can find,
//! each measurable in a single pass.
//!
//! Everything runs synchronously on the caller's thread.

mod config;
mod engine;
mod error;
mod metrics;

pub use config::EngineConfig;
pub use engine::{FinalResult, PartitionEngine};
pub use error::EngineError;
pub use metrics::{NamespaceMetrics, PartitionMetrics};
