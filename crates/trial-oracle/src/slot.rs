// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulated counter PMU.
//!
//! The [`SlotOracle`] models a performance monitoring unit with a fixed
//! number of physical counters. Each event may only be programmed onto
//! some of them. A set of events is feasible when every event can be
//! assigned its own eligible counter, which is a bipartite matching
//! problem. The oracle answers it with augmenting paths.
//!
//! Adding an event that is already in the context is rejected, matching
//! how real PMU libraries refuse duplicate events in one event set.

use crate::{FeasibilityOracle, OracleError};
use event_catalog::HardwareProfile;
use std::collections::{HashMap, HashSet};

/// Default limit on simultaneously open trial contexts.
const DEFAULT_MAX_LIVE_CONTEXTS: usize = 1;

/// Cumulative oracle activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct OracleStats {
    pub contexts_created: u64,
    pub contexts_destroyed: u64,
    pub probes: u64,
    pub rejections: u64,
}

/// Trial context for the [`SlotOracle`].
#[derive(Debug)]
pub struct SlotHandle {
    id: u64,
    members: Vec<String>,
}

impl SlotHandle {
    /// Events currently in this context.
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// A PMU with a fixed number of counter slots.
#[derive(Debug, Clone)]
pub struct SlotOracle {
    num_slots: usize,
    eligible: HashMap<String, Vec<usize>>,
    live: HashSet<u64>,
    next_id: u64,
    max_live: usize,
    stats: OracleStats,
}

impl SlotOracle {
    /// Creates an oracle with `num_slots` counters and no events.
    pub fn new(num_slots: usize) -> Self {
        Self {
            num_slots,
            eligible: HashMap::new(),
            live: HashSet::new(),
            next_id: 0,
            max_live: DEFAULT_MAX_LIVE_CONTEXTS,
            stats: OracleStats::default(),
        }
    }

    /// Builds the oracle from a profile's counter PMU.
    pub fn from_profile(profile: &HardwareProfile) -> Self {
        let mut oracle = Self::new(profile.counters.num_slots);
        for event in &profile.counters.events {
            oracle = oracle.with_event(&event.name, event.eligible_slots(profile.counters.num_slots));
        }
        oracle
    }

    /// Registers an event with its eligible slots. Out-of-range slots are
    /// ignored.
    pub fn with_event(mut self, name: &str, slots: Vec<usize>) -> Self {
        let slots = slots.into_iter().filter(|&s| s < self.num_slots).collect();
        self.eligible.insert(name.to_string(), slots);
        self
    }

    /// Sets how many trial contexts may be open at once.
    pub fn with_max_live_contexts(mut self, max_live: usize) -> Self {
        self.max_live = max_live;
        self
    }

    /// Number of physical counters.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Number of trial contexts currently open.
    pub fn live_contexts(&self) -> usize {
        self.live.len()
    }

    /// Returns a snapshot of cumulative activity.
    pub fn stats(&self) -> OracleStats {
        self.stats
    }

    /// Returns `true` if `events` can be matched onto distinct slots.
    fn assignable(&self, events: &[&[usize]]) -> bool {
        let mut owner: Vec<Option<usize>> = vec![None; self.num_slots];
        for e in 0..events.len() {
            let mut visited = vec![false; self.num_slots];
            if !augment(e, events, &mut owner, &mut visited) {
                return false;
            }
        }
        true
    }
}

/// Kuhn's augmenting-path step for event `e`.
fn augment(
    e: usize,
    events: &[&[usize]],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &slot in events[e] {
        if visited[slot] {
            continue;
        }
        visited[slot] = true;
        let free = match owner[slot] {
            None => true,
            Some(other) => augment(other, events, owner, visited),
        };
        if free {
            owner[slot] = Some(e);
            return true;
        }
    }
    false
}

impl FeasibilityOracle for SlotOracle {
    type Handle = SlotHandle;

    fn create_trial_context(&mut self) -> Result<SlotHandle, OracleError> {
        if self.live.len() >= self.max_live {
            return Err(OracleError::ContextCreation {
                detail: format!("{} trial context(s) already open", self.live.len()),
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        self.stats.contexts_created += 1;
        Ok(SlotHandle {
            id,
            members: Vec::new(),
        })
    }

    fn try_add(&mut self, handle: &mut SlotHandle, event: &str) -> Result<bool, OracleError> {
        if !self.live.contains(&handle.id) {
            return Err(OracleError::ContextReleased);
        }
        if !self.eligible.contains_key(event) {
            return Err(OracleError::UnknownEvent {
                event: event.to_string(),
            });
        }
        self.stats.probes += 1;

        if handle.members.iter().any(|m| m == event) {
            self.stats.rejections += 1;
            return Ok(false);
        }

        let slots: Vec<&[usize]> = handle
            .members
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(event))
            .map(|name| self.eligible[name].as_slice())
            .collect();

        if self.assignable(&slots) {
            handle.members.push(event.to_string());
            Ok(true)
        } else {
            self.stats.rejections += 1;
            Ok(false)
        }
    }

    fn destroy_trial_context(&mut self, handle: SlotHandle) -> Result<(), OracleError> {
        if !self.live.remove(&handle.id) {
            return Err(OracleError::ContextTeardown {
                detail: format!("trial context {} is not open", handle.id),
            });
        }
        self.stats.contexts_destroyed += 1;
        Ok(())
    }
}
