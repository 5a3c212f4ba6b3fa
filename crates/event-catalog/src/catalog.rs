// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The available-event catalog.
//!
//! The catalog is populated once, before the first partition request, by
//! querying a [`CatalogSource`] for each namespace that has one. It is
//! read-only afterwards and is handed to the partitioners by reference.
//!
//! Counter events keep the position at which the source reported them.
//! That index defines the canonical member order of counter groups, so a
//! group read back from the cache prints the same way it was stored.

use crate::{CatalogError, DevicePath, Namespace};
use std::collections::HashMap;

/// Something that can enumerate the events a subsystem is able to observe.
pub trait CatalogSource {
    /// Lists the available event names for `namespace`.
    ///
    /// Namespaces without a backing subsystem return an empty list.
    fn list_available_events(&self, namespace: Namespace) -> Result<Vec<String>, CatalogError>;
}

/// Read-only set of events the measurement subsystems can observe.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    counters: Vec<String>,
    counter_index: HashMap<String, usize>,
    device_events: Vec<DevicePath>,
    device_index: HashMap<String, usize>,
}

impl EventCatalog {
    /// Queries `source` once per namespace and builds the catalog.
    pub fn populate<S: CatalogSource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        let counters = source.list_available_events(Namespace::Counter)?;
        let device_events = source.list_available_events(Namespace::DeviceDomain)?;
        let catalog = Self::from_events(counters, device_events)?;
        tracing::info!("{}", catalog.summary());
        Ok(catalog)
    }

    /// Builds a catalog from explicit event lists.
    ///
    /// Device-domain names must be well-formed dotted paths. A name listed
    /// twice keeps its first index.
    pub fn from_events(
        counters: Vec<String>,
        device_events: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for name in counters {
            if catalog.counter_index.contains_key(&name) {
                continue;
            }
            catalog.counter_index.insert(name.clone(), catalog.counters.len());
            catalog.counters.push(name);
        }

        for name in device_events {
            if catalog.device_index.contains_key(&name) {
                continue;
            }
            let path = DevicePath::parse(&name)?;
            catalog.device_index.insert(name, catalog.device_events.len());
            catalog.device_events.push(path);
        }

        Ok(catalog)
    }

    /// Returns the catalog index of a counter event.
    pub fn counter_index(&self, name: &str) -> Option<usize> {
        self.counter_index.get(name).copied()
    }

    /// All counter events in catalog order.
    pub fn counters(&self) -> &[String] {
        &self.counters
    }

    /// Resolves a dotted device-domain event name.
    pub fn device_event(&self, name: &str) -> Option<&DevicePath> {
        self.device_index.get(name).map(|&i| &self.device_events[i])
    }

    /// All device-domain events in catalog order.
    pub fn device_events(&self) -> &[DevicePath] {
        &self.device_events
    }

    /// Returns `true` if `name` is available in `namespace`.
    ///
    /// The misc namespace has no catalog; every tag is accepted.
    pub fn contains(&self, namespace: Namespace, name: &str) -> bool {
        match namespace {
            Namespace::Counter => self.counter_index.contains_key(name),
            Namespace::DeviceDomain => self.device_index.contains_key(name),
            Namespace::Misc => true,
        }
    }

    /// Number of catalogued events in `namespace`.
    pub fn len(&self, namespace: Namespace) -> usize {
        match namespace {
            Namespace::Counter => self.counters.len(),
            Namespace::DeviceDomain => self.device_events.len(),
            Namespace::Misc => 0,
        }
    }

    /// Returns `true` if no namespace has any catalogued event.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.device_events.is_empty()
    }

    /// Returns a one-line summary for logging.
    pub fn summary(&self) -> String {
        let mut devices: Vec<&str> = self.device_events.iter().map(|p| p.device.as_str()).collect();
        devices.sort_unstable();
        devices.dedup();
        format!(
            "catalog: {} counter events, {} device-domain events on {} device(s)",
            self.counters.len(),
            self.device_events.len(),
            devices.len(),
        )
    }
}
