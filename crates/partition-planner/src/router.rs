// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Namespace routing by name prefix.

use event_catalog::Namespace;

/// Default prefix of hardware counter events.
pub const DEFAULT_COUNTER_PREFIX: &str = "PAPI_";
/// Default device subsystem; its events look like `CUDA.<device>.<domain>.<name>`.
pub const DEFAULT_DEVICE_SUBSYSTEM: &str = "CUDA";

/// Input events split by namespace. Each bucket keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    pub counter: Vec<String>,
    pub device_domain: Vec<String>,
    pub misc: Vec<String>,
}

impl Buckets {
    pub fn get(&self, namespace: Namespace) -> &[String] {
        match namespace {
            Namespace::Counter => &self.counter,
            Namespace::DeviceDomain => &self.device_domain,
            Namespace::Misc => &self.misc,
        }
    }

    fn get_mut(&mut self, namespace: Namespace) -> &mut Vec<String> {
        match namespace {
            Namespace::Counter => &mut self.counter,
            Namespace::DeviceDomain => &mut self.device_domain,
            Namespace::Misc => &mut self.misc,
        }
    }

    /// Total events across all buckets.
    pub fn total(&self) -> usize {
        self.counter.len() + self.device_domain.len() + self.misc.len()
    }
}

/// Assigns each event to exactly one namespace.
///
/// An event starting with the counter prefix is a counter event; one
/// starting with `<subsystem>.` is a device-domain event; everything else
/// is misc. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRouter {
    counter_prefix: String,
    device_prefix: String,
}

impl Default for NamespaceRouter {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER_PREFIX, DEFAULT_DEVICE_SUBSYSTEM)
    }
}

impl NamespaceRouter {
    pub fn new(counter_prefix: &str, device_subsystem: &str) -> Self {
        Self {
            counter_prefix: counter_prefix.to_string(),
            device_prefix: format!("{device_subsystem}."),
        }
    }

    /// Namespace of a single event.
    pub fn classify(&self, event: &str) -> Namespace {
        if event.starts_with(&self.counter_prefix) {
            Namespace::Counter
        } else if event.starts_with(&self.device_prefix) {
            Namespace::DeviceDomain
        } else {
            Namespace::Misc
        }
    }

    /// Splits `events` into per-namespace buckets.
    pub fn route<S: AsRef<str>>(&self, events: &[S]) -> Buckets {
        let mut buckets = Buckets::default();
        for event in events {
            let event = event.as_ref();
            buckets.get_mut(self.classify(event)).push(event.to_string());
        }
        tracing::debug!(
            "routed {} event(s): {} counter, {} device-domain, {} misc",
            buckets.total(),
            buckets.counter.len(),
            buckets.device_domain.len(),
            buckets.misc.len(),
        );
        buckets
    }
}
