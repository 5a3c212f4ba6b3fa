// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON hardware profile parsing.
//!
//! A profile describes what the measurement hardware can observe and how
//! much of it at once. It stands in for the vendor libraries that would
//! otherwise be queried at start-up.
//!
//! # Format
//! ```json
//! {
//!   "name": "haswell-k20",
//!   "device_subsystem": "CUDA",
//!   "counters": {
//!     "num_slots": 4,
//!     "events": [
//!       { "name": "PAPI_TOT_CYC" },
//!       { "name": "PAPI_FP_OPS", "slots": [0, 1] }
//!     ]
//!   },
//!   "devices": [
//!     {
//!       "name": "Tesla K20m",
//!       "domains": [
//!         { "name": "domain_a", "capacity": 4, "events": ["inst_executed"] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A counter without `slots` may be placed on any physical counter.
//! Device names are normalised by replacing spaces with underscores, so
//! `"Tesla K20m"` is addressed as `CUDA.Tesla_K20m.<domain>.<event>`.

use crate::{CatalogError, CatalogSource, DevicePath, Namespace};
use std::collections::HashSet;
use std::path::Path;

/// Top-level hardware profile, deserialized from JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HardwareProfile {
    /// Human-readable profile name.
    pub name: String,
    /// Leading component of every device-domain event path.
    #[serde(default = "default_subsystem")]
    pub device_subsystem: String,
    /// The CPU performance monitoring unit.
    #[serde(default)]
    pub counters: CounterPmu,
    /// Attached devices with exact grouping support.
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
}

fn default_subsystem() -> String {
    "CUDA".to_string()
}

/// Physical counter slots and the events that can be programmed onto them.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CounterPmu {
    /// Number of physical counters that can run simultaneously.
    pub num_slots: usize,
    /// Available counter events, in catalog order.
    #[serde(default)]
    pub events: Vec<CounterSpec>,
}

/// A single counter event.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CounterSpec {
    pub name: String,
    /// Physical counters this event may occupy. Empty means any.
    #[serde(default)]
    pub slots: Vec<usize>,
}

impl CounterSpec {
    /// Resolves the eligible slots against the PMU width.
    pub fn eligible_slots(&self, num_slots: usize) -> Vec<usize> {
        if self.slots.is_empty() {
            (0..num_slots).collect()
        } else {
            self.slots.clone()
        }
    }
}

/// A device with one or more event domains.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeviceSpec {
    /// Vendor device name; may contain spaces.
    pub name: String,
    #[serde(default)]
    pub domains: Vec<DomainSpec>,
}

impl DeviceSpec {
    /// The device name as it appears in event paths.
    pub fn ident(&self) -> String {
        self.name.replace(' ', "_")
    }
}

/// An event domain on a device.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DomainSpec {
    pub name: String,
    /// Maximum events from this domain collected in a single pass.
    pub capacity: usize,
    pub events: Vec<String>,
}

impl HardwareProfile {
    /// Loads a profile from a JSON file and validates it.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses and validates a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Checks that the profile is internally consistent.
    ///
    /// Checks:
    /// - A PMU that lists events has at least one slot.
    /// - Every listed slot exists.
    /// - Counter names, device names, domain names, and per-domain event
    ///   names are unique within their scope.
    /// - Every domain has a non-zero capacity.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |detail: String| CatalogError::InvalidProfile {
            profile: self.name.clone(),
            detail,
        };

        if !self.counters.events.is_empty() && self.counters.num_slots == 0 {
            return Err(invalid("counter PMU lists events but has no slots".into()));
        }

        let mut seen = HashSet::new();
        for event in &self.counters.events {
            if !seen.insert(event.name.as_str()) {
                return Err(invalid(format!("duplicate counter event '{}'", event.name)));
            }
            if let Some(&slot) = event.slots.iter().find(|&&s| s >= self.counters.num_slots) {
                return Err(invalid(format!(
                    "counter event '{}' references slot {slot}, PMU has {}",
                    event.name, self.counters.num_slots,
                )));
            }
        }

        let mut devices = HashSet::new();
        for device in &self.devices {
            if !devices.insert(device.ident()) {
                return Err(invalid(format!("duplicate device '{}'", device.name)));
            }
            let mut domains = HashSet::new();
            for domain in &device.domains {
                if !domains.insert(domain.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate domain '{}' on device '{}'",
                        domain.name, device.name,
                    )));
                }
                if domain.capacity == 0 {
                    return Err(invalid(format!(
                        "domain '{}' on device '{}' has zero capacity",
                        domain.name, device.name,
                    )));
                }
                let mut events = HashSet::new();
                for event in &domain.events {
                    if !events.insert(event.as_str()) {
                        return Err(invalid(format!(
                            "duplicate event '{event}' in domain '{}'",
                            domain.name,
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Looks up a counter event by name.
    pub fn counter(&self, name: &str) -> Option<&CounterSpec> {
        self.counters.events.iter().find(|e| e.name == name)
    }

    /// Looks up a device by its path identifier.
    pub fn device(&self, ident: &str) -> Option<&DeviceSpec> {
        self.devices.iter().find(|d| d.ident() == ident)
    }

    /// Every device-domain event as a [`DevicePath`].
    pub fn device_paths(&self) -> Vec<DevicePath> {
        let mut paths = Vec::new();
        for device in &self.devices {
            let ident = device.ident();
            for domain in &device.domains {
                for event in &domain.events {
                    paths.push(DevicePath::new(
                        self.device_subsystem.as_str(),
                        ident.as_str(),
                        domain.name.as_str(),
                        event.as_str(),
                    ));
                }
            }
        }
        paths
    }
}

impl CatalogSource for HardwareProfile {
    fn list_available_events(&self, namespace: Namespace) -> Result<Vec<String>, CatalogError> {
        Ok(match namespace {
            Namespace::Counter => self.counters.events.iter().map(|e| e.name.clone()).collect(),
            Namespace::DeviceDomain => self
                .device_paths()
                .iter()
                .map(DevicePath::to_event_name)
                .collect(),
            Namespace::Misc => Vec::new(),
        })
    }
}
