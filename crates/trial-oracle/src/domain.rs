// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulated device subsystem with per-domain pass capacity.
//!
//! Device profilers typically collect events from a single domain per
//! pass, and only so many of them. [`DomainSubsystem`] models exactly
//! that: a device's events are bucketed by domain in order of first
//! appearance, and each bucket is cut into passes of at most `capacity`
//! events. A pass never holds the same event twice; repeated events are
//! placed in the first pass that has room and lacks them.

use crate::{DeviceId, DeviceInfo, ExactSubsystem, OracleError};
use event_catalog::{DevicePath, HardwareProfile};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct Domain {
    capacity: usize,
    events: HashSet<String>,
}

#[derive(Debug, Clone)]
struct Device {
    info: DeviceInfo,
    domains: HashMap<String, Domain>,
}

/// A device subsystem described by a [`HardwareProfile`].
#[derive(Debug, Clone, Default)]
pub struct DomainSubsystem {
    devices: Vec<Device>,
}

impl DomainSubsystem {
    /// Builds the subsystem from a profile's device list.
    ///
    /// Device ids are assigned in profile order starting from 0.
    pub fn from_profile(profile: &HardwareProfile) -> Self {
        let devices = profile
            .devices
            .iter()
            .enumerate()
            .map(|(i, spec)| Device {
                info: DeviceInfo {
                    id: DeviceId(i as u32),
                    name: spec.ident(),
                },
                domains: spec
                    .domains
                    .iter()
                    .map(|d| {
                        (
                            d.name.clone(),
                            Domain {
                                capacity: d.capacity,
                                events: d.events.iter().cloned().collect(),
                            },
                        )
                    })
                    .collect(),
            })
            .collect();
        Self { devices }
    }

    fn device(&self, id: DeviceId) -> Result<&Device, OracleError> {
        self.devices
            .iter()
            .find(|d| d.info.id == id)
            .ok_or_else(|| OracleError::UnknownDevice {
                device: id.to_string(),
            })
    }
}

impl ExactSubsystem for DomainSubsystem {
    fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, OracleError> {
        Ok(self.devices.iter().map(|d| d.info.clone()).collect())
    }

    fn compute_exact_grouping(
        &self,
        device: DeviceId,
        events: &[DevicePath],
    ) -> Result<Vec<Vec<DevicePath>>, OracleError> {
        let dev = self.device(device)?;

        // Bucket by domain, first appearance first.
        let mut order: Vec<&str> = Vec::new();
        let mut buckets: HashMap<&str, Vec<&DevicePath>> = HashMap::new();
        for event in events {
            if event.device != dev.info.name {
                return Err(OracleError::SubsystemError {
                    device: dev.info.name.clone(),
                    detail: format!("event '{event}' belongs to device '{}'", event.device),
                });
            }
            let known = dev
                .domains
                .get(&event.domain)
                .is_some_and(|d| d.events.contains(&event.name));
            if !known {
                return Err(OracleError::SubsystemError {
                    device: dev.info.name.clone(),
                    detail: format!("no such event '{event}'"),
                });
            }
            buckets
                .entry(event.domain.as_str())
                .or_insert_with(|| {
                    order.push(event.domain.as_str());
                    Vec::new()
                })
                .push(event);
        }

        let mut groups = Vec::new();
        for domain in order {
            let capacity = dev.domains[domain].capacity.max(1);
            let mut passes: Vec<Vec<DevicePath>> = Vec::new();
            for &event in &buckets[domain] {
                match passes
                    .iter_mut()
                    .find(|p| p.len() < capacity && !p.contains(event))
                {
                    Some(pass) => pass.push(event.clone()),
                    None => passes.push(vec![event.clone()]),
                }
            }
            groups.extend(passes);
        }

        tracing::debug!(
            "{}: {} event(s) → {} pass(es)",
            dev.info.name,
            events.len(),
            groups.len(),
        );
        Ok(groups)
    }
}
