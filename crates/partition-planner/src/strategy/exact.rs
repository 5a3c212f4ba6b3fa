// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Exact partitioning for device-domain events.
//!
//! The device subsystem computes minimal groupings itself, so this
//! partitioner only parses names, splits the bucket per device and asks
//! once per device. Devices are visited in order of first appearance in
//! the bucket. Their groups are concatenated in that order.

use crate::strategy::BucketPartitioner;
use crate::{Group, Partition, PartitionError};
use event_catalog::{DevicePath, EventCatalog, Namespace};
use trial_oracle::{ExactSubsystem, OracleError};

/// Delegates device-domain grouping to an [`ExactSubsystem`].
pub struct ExactPartitioner<'a, X: ExactSubsystem + ?Sized> {
    catalog: &'a EventCatalog,
    subsystem: &'a X,
}

impl<'a, X: ExactSubsystem + ?Sized> ExactPartitioner<'a, X> {
    pub fn new(catalog: &'a EventCatalog, subsystem: &'a X) -> Self {
        Self { catalog, subsystem }
    }

    /// Splits the bucket per device, keeping first-appearance order.
    fn by_device(&self, bucket: &[String]) -> Result<Vec<(String, Vec<DevicePath>)>, PartitionError> {
        let mut per_device: Vec<(String, Vec<DevicePath>)> = Vec::new();
        for event in bucket {
            let path = self
                .catalog
                .device_event(event)
                .ok_or_else(|| PartitionError::UnknownEvent {
                    namespace: Namespace::DeviceDomain,
                    event: event.clone(),
                })?;
            match per_device.iter_mut().find(|(device, _)| *device == path.device) {
                Some((_, paths)) => paths.push(path.clone()),
                None => per_device.push((path.device.clone(), vec![path.clone()])),
            }
        }
        Ok(per_device)
    }
}

impl<X: ExactSubsystem + ?Sized> BucketPartitioner for ExactPartitioner<'_, X> {
    fn name(&self) -> &str {
        "exact"
    }

    fn namespace(&self) -> Namespace {
        Namespace::DeviceDomain
    }

    fn partition(&mut self, bucket: &[String]) -> Result<Partition, PartitionError> {
        if bucket.is_empty() {
            return Ok(Partition::empty(Namespace::DeviceDomain));
        }

        let per_device = self.by_device(bucket)?;
        let devices = self.subsystem.enumerate_devices()?;

        let mut groups = Vec::new();
        for (name, paths) in &per_device {
            let device = devices
                .iter()
                .find(|d| d.name == *name)
                .ok_or_else(|| OracleError::UnknownDevice {
                    device: name.clone(),
                })?;
            let passes = self.subsystem.compute_exact_grouping(device.id, paths)?;
            tracing::debug!("{name}: {} event(s) → {} group(s)", paths.len(), passes.len());
            for pass in passes {
                groups.push(Group::new(pass.iter().map(DevicePath::to_event_name).collect()));
            }
        }

        let partition = Partition::from_groups(Namespace::DeviceDomain, groups);
        tracing::info!(
            "exact: {} event(s) on {} device(s) → {} group(s)",
            bucket.len(),
            per_device.len(),
            partition.num_groups(),
        );
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_catalog::HardwareProfile;
    use trial_oracle::DomainSubsystem;

    const PROFILE: &str = r#"{
        "name": "two-gpu",
        "devices": [
            { "name": "GPU 0", "domains": [
                { "name": "sm", "capacity": 2, "events": ["inst", "cycles", "warps"] },
                { "name": "mem", "capacity": 4, "events": ["reads", "writes"] }
            ] },
            { "name": "GPU 1", "domains": [
                { "name": "sm", "capacity": 1, "events": ["inst"] }
            ] }
        ]
    }"#;

    fn setup() -> (EventCatalog, DomainSubsystem) {
        let profile = HardwareProfile::from_json(PROFILE).unwrap();
        (
            EventCatalog::populate(&profile).unwrap(),
            DomainSubsystem::from_profile(&profile),
        )
    }

    fn events(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_groups_per_device_in_first_appearance_order() {
        let (catalog, subsystem) = setup();
        let mut exact = ExactPartitioner::new(&catalog, &subsystem);
        let bucket = events(&[
            "CUDA.GPU_1.sm.inst",
            "CUDA.GPU_0.mem.reads",
            "CUDA.GPU_0.sm.inst",
            "CUDA.GPU_0.mem.writes",
        ]);

        let p = exact.partition(&bucket).unwrap();
        assert_eq!(
            p.to_texts(),
            vec![
                "CUDA.GPU_1.sm.inst",
                "CUDA.GPU_0.mem.reads:CUDA.GPU_0.mem.writes",
                "CUDA.GPU_0.sm.inst",
            ]
        );
        p.validate_coverage(&bucket).unwrap();
    }

    #[test]
    fn test_capacity_splits_domain() {
        let (catalog, subsystem) = setup();
        let mut exact = ExactPartitioner::new(&catalog, &subsystem);
        let bucket = events(&["CUDA.GPU_0.sm.inst", "CUDA.GPU_0.sm.cycles", "CUDA.GPU_0.sm.warps"]);
        assert_eq!(exact.partition(&bucket).unwrap().num_groups(), 2);
    }

    #[test]
    fn test_empty_bucket() {
        let (catalog, subsystem) = setup();
        let mut exact = ExactPartitioner::new(&catalog, &subsystem);
        assert!(exact.partition(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_event() {
        let (catalog, subsystem) = setup();
        let mut exact = ExactPartitioner::new(&catalog, &subsystem);
        let err = exact.partition(&events(&["CUDA.GPU_0.sm.bogus"])).unwrap_err();
        assert!(matches!(err, PartitionError::UnknownEvent { namespace: Namespace::DeviceDomain, .. }));
    }

    #[test]
    fn test_device_missing_from_subsystem() {
        let (catalog, _) = setup();
        let empty = DomainSubsystem::default();
        let mut exact = ExactPartitioner::new(&catalog, &empty);
        let err = exact.partition(&events(&["CUDA.GPU_0.sm.inst"])).unwrap_err();
        assert!(matches!(err, PartitionError::Oracle(OracleError::UnknownDevice { .. })));
    }
}
