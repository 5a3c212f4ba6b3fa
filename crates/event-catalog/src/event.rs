// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Event namespaces and device-domain event paths.

use crate::CatalogError;
use std::fmt;

/// Delimiter used to join the members of a group into its textual form.
pub const EVENT_DELIMITER: char = ':';

/// The measurement subsystem an event belongs to.
///
/// Every requested event falls into exactly one namespace; [`Namespace::Misc`]
/// is the catch-all for anything the router does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Hardware counters probed one-by-one through a feasibility oracle.
    Counter,
    /// Device events whose subsystem reports feasible groupings directly.
    DeviceDomain,
    /// Opaque tags that are never split.
    Misc,
}

impl Namespace {
    /// All namespaces, in merge order.
    pub const ALL: [Namespace; 3] = [Namespace::Counter, Namespace::DeviceDomain, Namespace::Misc];

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::DeviceDomain => "device_domain",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device-domain event name split into its components.
///
/// The textual form is `<SUBSYSTEM>.<device>.<domain>.<name>`. Only the
/// first three dots separate components, so the event name itself may
/// contain further dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DevicePath {
    pub subsystem: String,
    pub device: String,
    pub domain: String,
    pub name: String,
}

impl DevicePath {
    /// Builds a path from its parts.
    pub fn new(
        subsystem: impl Into<String>,
        device: impl Into<String>,
        domain: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subsystem: subsystem.into(),
            device: device.into(),
            domain: domain.into(),
            name: name.into(),
        }
    }

    /// Parses a dotted event name.
    pub fn parse(event: &str) -> Result<Self, CatalogError> {
        let malformed = || CatalogError::MalformedDevicePath {
            event: event.to_string(),
        };

        let mut parts = event.splitn(4, '.');
        let subsystem = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let device = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let domain = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let name = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;

        Ok(Self::new(subsystem, device, domain, name))
    }

    /// Returns the dotted event name.
    pub fn to_event_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.subsystem, self.device, self.domain, self.name)
    }
}
