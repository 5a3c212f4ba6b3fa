// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`ExactSubsystem`] trait.

use crate::OracleError;
use event_catalog::DevicePath;
use std::fmt;

/// Subsystem-assigned device identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// A device as reported by [`ExactSubsystem::enumerate_devices`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    /// Name as it appears in event paths (no spaces).
    pub name: String,
}

/// A subsystem that reports a device's minimal feasible grouping directly.
pub trait ExactSubsystem {
    /// Lists the attached devices.
    fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, OracleError>;

    /// Partitions `events`, all of which belong to `device`, into passes.
    fn compute_exact_grouping(
        &self,
        device: DeviceId,
        events: &[DevicePath],
    ) -> Result<Vec<Vec<DevicePath>>, OracleError>;
}

impl<X: ExactSubsystem + ?Sized> ExactSubsystem for &X {
    fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, OracleError> {
        (**self).enumerate_devices()
    }

    fn compute_exact_grouping(
        &self,
        device: DeviceId,
        events: &[DevicePath],
    ) -> Result<Vec<Vec<DevicePath>>, OracleError> {
        (**self).compute_exact_grouping(device, events)
    }
}
