// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end partition requests.
//!
//! These tests drive the full flow from routing → per-namespace
//! partitioning → cache reconciliation → merge, through the public
//! engine API, with both profile-backed and scripted oracles.

use event_catalog::{EventCatalog, HardwareProfile, Namespace};
use partition_cache::{PartitionCache, Signature};
use partition_engine::{EngineConfig, EngineError, PartitionEngine};
use partition_planner::{Algorithm, CacheDecision, PartitionError};
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use trial_oracle::{accepts_all, DomainSubsystem, FeasibilityOracle, OracleError, SlotOracle};

// ── Helpers ────────────────────────────────────────────────────

fn profile_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../profiles/haswell-k20.json")
}

fn profile() -> HardwareProfile {
    HardwareProfile::from_file(&profile_path()).unwrap()
}

fn config(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        retry_budget: 25,
        ..Default::default()
    }
}

fn profile_engine(seed: u64) -> PartitionEngine<SlotOracle, DomainSubsystem> {
    PartitionEngine::from_profile(config(seed), &profile()).unwrap()
}

/// Accepts any two distinct events in a context, never three.
#[derive(Debug, Default)]
struct PairOracle {
    live: usize,
    created: usize,
    fail_on: Option<String>,
}

impl FeasibilityOracle for PairOracle {
    type Handle = Vec<String>;

    fn create_trial_context(&mut self) -> Result<Vec<String>, OracleError> {
        self.live += 1;
        self.created += 1;
        Ok(Vec::new())
    }

    fn try_add(&mut self, handle: &mut Vec<String>, event: &str) -> Result<bool, OracleError> {
        if self.fail_on.as_deref() == Some(event) {
            return Err(OracleError::ContextCreation {
                detail: "injected fault".into(),
            });
        }
        if handle.len() >= 2 || handle.iter().any(|e| e == event) {
            return Ok(false);
        }
        handle.push(event.to_string());
        Ok(true)
    }

    fn destroy_trial_context(&mut self, _handle: Vec<String>) -> Result<(), OracleError> {
        self.live -= 1;
        Ok(())
    }
}

fn pair_engine(names: &[&str]) -> PartitionEngine<PairOracle, DomainSubsystem> {
    let catalog =
        EventCatalog::from_events(names.iter().map(|s| s.to_string()).collect(), Vec::new())
            .unwrap();
    PartitionEngine::new(config(3), catalog, PairOracle::default(), DomainSubsystem::default())
        .unwrap()
}

fn multiset<S: AsRef<str>>(events: &[S]) -> HashMap<String, usize> {
    let mut m = HashMap::new();
    for e in events {
        *m.entry(e.as_ref().to_string()).or_default() += 1;
    }
    m
}

fn flatten(groups: &[String]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|g| g.split(':').map(str::to_string))
        .collect()
}

// ── Core scenarios ─────────────────────────────────────────────

#[test]
fn test_pair_oracle_three_counters_two_groups() {
    let mut engine = pair_engine(&["PAPI_A", "PAPI_B", "PAPI_C"]);
    let cache = PartitionCache::temporary().unwrap();

    let r = engine
        .partition(&cache, &["PAPI_A", "PAPI_B", "PAPI_C"], Algorithm::Greedy, false)
        .unwrap();
    assert_eq!(r.groups.len(), 2);
    assert_eq!(multiset(&flatten(&r.groups)), multiset(&["PAPI_A", "PAPI_B", "PAPI_C"]));
    assert_eq!(engine.oracle().live, 0);
}

#[test]
fn test_merge_two_zero_one() {
    let mut engine = pair_engine(&["PAPI_A", "PAPI_B", "PAPI_C"]);
    let cache = PartitionCache::temporary().unwrap();

    let r = engine
        .partition(
            &cache,
            &["PAPI_A", "my_tag", "PAPI_B", "PAPI_C"],
            Algorithm::Greedy,
            false,
        )
        .unwrap();
    assert_eq!(r.groups.len(), 2);
    assert!(r.groups[0].ends_with(":my_tag"));
    assert!(!r.groups[1].contains("my_tag"));
}

#[test]
fn test_single_counter() {
    let mut engine = profile_engine(1);
    let cache = PartitionCache::temporary().unwrap();
    let r = engine
        .partition(&cache, &["PAPI_TOT_CYC"], Algorithm::Greedy, false)
        .unwrap();
    assert_eq!(r.groups, vec!["PAPI_TOT_CYC"]);
}

#[test]
fn test_misc_only_never_touches_oracle() {
    let mut engine = profile_engine(1);
    let cache = PartitionCache::temporary().unwrap();
    let r = engine
        .partition(&cache, &["tagB", "tagA"], Algorithm::Greedy, false)
        .unwrap();
    assert_eq!(r.groups, vec!["tagB:tagA"]);
    assert_eq!(engine.oracle().stats().contexts_created, 0);
    assert!(cache.is_empty(Namespace::Counter).unwrap());
}

#[test]
fn test_device_events_follow_subsystem_grouping() {
    let mut engine = profile_engine(1);
    let cache = PartitionCache::temporary().unwrap();
    let events = [
        "CUDA.Tesla_K40c.domain_a.inst_executed",
        "CUDA.Tesla_K20m.domain_b.gld_request",
        "CUDA.Tesla_K20m.domain_b.gst_request",
        "CUDA.Tesla_K20m.domain_b.shared_load",
        "CUDA.Tesla_K40c.domain_a.active_cycles",
    ];
    let r = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
    assert_eq!(
        r.groups,
        vec![
            "CUDA.Tesla_K40c.domain_a.inst_executed:CUDA.Tesla_K40c.domain_a.active_cycles",
            "CUDA.Tesla_K20m.domain_b.gld_request:CUDA.Tesla_K20m.domain_b.gst_request",
            "CUDA.Tesla_K20m.domain_b.shared_load",
        ]
    );
}

#[test]
fn test_slot_constraints_respected() {
    // FP_OPS and DP_OPS both need slot 0, so they can never share a group.
    let mut engine = profile_engine(5);
    let cache = PartitionCache::temporary().unwrap();
    let r = engine
        .partition(
            &cache,
            &["PAPI_FP_OPS", "PAPI_DP_OPS", "PAPI_TOT_CYC"],
            Algorithm::Greedy,
            false,
        )
        .unwrap();
    assert_eq!(r.groups.len(), 2);
    for g in &r.groups {
        assert!(!(g.contains("PAPI_FP_OPS") && g.contains("PAPI_DP_OPS")));
    }
}

#[test]
fn test_every_counter_group_replays_on_fresh_pmu() {
    let p = profile();
    let events: Vec<String> = p.counters.events.iter().map(|e| e.name.clone()).collect();

    for seed in 0..20 {
        let mut engine = profile_engine(seed);
        let cache = PartitionCache::temporary().unwrap();
        let r = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
        assert_eq!(multiset(&flatten(&r.groups)), multiset(&events));

        for group in &r.groups {
            let members: Vec<&str> = group.split(':').collect();
            let mut fresh = SlotOracle::from_profile(&p);
            assert!(
                accepts_all(&mut fresh, &members).unwrap(),
                "seed {seed}: group '{group}' rejected on replay"
            );
        }
    }
}

#[test]
fn test_repeated_events_never_share_a_group() {
    let mut engine = profile_engine(2);
    let cache = PartitionCache::temporary().unwrap();
    let gld = "CUDA.Tesla_K20m.domain_b.gld_request";
    let events = [gld, gld, "PAPI_TOT_CYC", "PAPI_TOT_CYC"];

    let r = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
    assert_eq!(r.groups.len(), 2);
    assert_eq!(multiset(&flatten(&r.groups)), multiset(&events));
    for group in &r.groups {
        let members: Vec<&str> = group.split(':').collect();
        assert_eq!(multiset(&members), multiset(&["PAPI_TOT_CYC", gld]));
    }
}

// ── Cache behaviour ────────────────────────────────────────────

#[test]
fn test_cached_round_trip_without_oracle_calls() {
    let mut engine = profile_engine(11);
    let cache = PartitionCache::temporary().unwrap();
    let events = ["PAPI_TOT_INS", "PAPI_L1_DCM", "PAPI_BR_MSP", "PAPI_TOT_CYC", "PAPI_FP_OPS"];

    let first = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
    assert_eq!(first.metrics.cache_decision, CacheDecision::Stored);
    let created = engine.oracle().stats().contexts_created;

    // Same set, different order.
    let reordered = ["PAPI_FP_OPS", "PAPI_TOT_CYC", "PAPI_BR_MSP", "PAPI_L1_DCM", "PAPI_TOT_INS"];
    let second = engine.partition(&cache, &reordered, Algorithm::Cached, false).unwrap();
    assert_eq!(second.groups, first.groups);
    assert_eq!(second.metrics.cache_decision, CacheDecision::Hit);
    assert_eq!(engine.oracle().stats().contexts_created, created);
}

#[test]
fn test_cached_miss_drops_counters_only() {
    let mut engine = profile_engine(2);
    let cache = PartitionCache::temporary().unwrap();
    let r = engine
        .partition(
            &cache,
            &["PAPI_TOT_CYC", "CUDA.Tesla_K20m.domain_d.l2_subp0_read_sector_misses", "t"],
            Algorithm::Cached,
            false,
        )
        .unwrap();
    assert_eq!(
        r.groups,
        vec!["CUDA.Tesla_K20m.domain_d.l2_subp0_read_sector_misses:t"]
    );
    assert_eq!(r.metrics.cache_decision, CacheDecision::Miss);
    assert_eq!(engine.oracle().stats().contexts_created, 0);
}

#[test]
fn test_cache_never_gets_worse() {
    let mut engine = pair_engine(&["PAPI_A", "PAPI_B", "PAPI_C"]);
    let cache = PartitionCache::temporary().unwrap();
    let sig = Signature::new(Namespace::Counter, ["PAPI_A", "PAPI_B", "PAPI_C"]);
    let events = ["PAPI_C", "PAPI_B", "PAPI_A"];

    cache
        .replace(&sig, &["PAPI_A".into(), "PAPI_B".into(), "PAPI_C".into()])
        .unwrap();
    let r = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
    assert_eq!(r.metrics.cache_decision, CacheDecision::Replaced);
    assert_eq!(cache.lookup(&sig).unwrap().len(), 2);

    for _ in 0..3 {
        engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
        assert_eq!(cache.lookup(&sig).unwrap().len(), 2);
    }
}

#[test]
fn test_prefer_latest() {
    let mut engine = pair_engine(&["PAPI_A", "PAPI_B", "PAPI_C"]);
    let cache = PartitionCache::temporary().unwrap();
    let sig = Signature::new(Namespace::Counter, ["PAPI_A", "PAPI_B", "PAPI_C"]);
    let events = ["PAPI_A", "PAPI_B", "PAPI_C"];
    let best = vec!["PAPI_A:PAPI_B:PAPI_C".to_string()];
    cache.replace(&sig, &best).unwrap();

    let kept = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();
    assert_eq!(kept.groups, best);

    let latest = engine.partition(&cache, &events, Algorithm::Greedy, true).unwrap();
    assert_eq!(latest.groups.len(), 2);
    assert_eq!(cache.lookup(&sig).unwrap(), best);
}

#[test]
fn test_cache_persists_across_engines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partitions.db");
    let events = ["PAPI_L2_DCM", "PAPI_L3_TCM", "PAPI_TLB_DM", "PAPI_STL_ICY", "PAPI_BR_INS"];

    let stored = {
        let cache = PartitionCache::open(&path).unwrap();
        profile_engine(4)
            .partition(&cache, &events, Algorithm::Greedy, false)
            .unwrap()
            .groups
    };

    let cache = PartitionCache::open(&path).unwrap();
    let mut engine = profile_engine(99);
    let r = engine.partition(&cache, &events, Algorithm::Cached, false).unwrap();
    assert_eq!(r.groups, stored);
}

// ── Failure paths ──────────────────────────────────────────────

#[test]
fn test_unknown_counter_names_event() {
    let mut engine = profile_engine(1);
    let cache = PartitionCache::temporary().unwrap();
    let err = engine
        .partition(&cache, &["PAPI_TOT_CYC", "PAPI_BOGUS"], Algorithm::Greedy, false)
        .unwrap_err();
    assert!(err.to_string().contains("PAPI_BOGUS"));
    assert!(matches!(
        err,
        EngineError::PartitionError(PartitionError::UnknownEvent { .. })
    ));
    assert_eq!(engine.oracle().live_contexts(), 0);
}

#[test]
fn test_malformed_device_event_rejected() {
    let mut engine = profile_engine(1);
    let cache = PartitionCache::temporary().unwrap();
    let err = engine
        .partition(&cache, &["CUDA.Tesla_K20m"], Algorithm::Greedy, false)
        .unwrap_err();
    assert!(err.to_string().contains("CUDA.Tesla_K20m"));
}

#[test]
fn test_oracle_fault_aborts_without_leaking() {
    let mut engine = pair_engine(&["PAPI_A", "PAPI_B", "PAPI_C"]);
    let cache = PartitionCache::temporary().unwrap();
    // Rebuild with a faulting oracle.
    let catalog = engine.catalog().clone();
    engine = PartitionEngine::new(
        config(3),
        catalog,
        PairOracle {
            fail_on: Some("PAPI_B".into()),
            ..Default::default()
        },
        DomainSubsystem::default(),
    )
    .unwrap();

    let r = engine.partition(&cache, &["PAPI_A", "PAPI_B", "PAPI_C"], Algorithm::Greedy, false);
    assert!(matches!(
        r,
        Err(EngineError::PartitionError(PartitionError::Oracle(_)))
    ));
    assert!(engine.oracle().created > 0);
    assert_eq!(engine.oracle().live, 0);
    assert!(cache.is_empty(Namespace::Counter).unwrap());
}

// ── Determinism ────────────────────────────────────────────────

#[test]
fn test_same_seed_same_groups() {
    let events: Vec<String> = profile()
        .counters
        .events
        .iter()
        .map(|e| e.name.clone())
        .collect();

    let run = |seed| {
        let cache = PartitionCache::temporary().unwrap();
        profile_engine(seed)
            .partition(&cache, &events, Algorithm::Greedy, false)
            .unwrap()
            .groups
    };
    assert_eq!(run(2024), run(2024));
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_result_covers_request(
        picks in proptest::collection::vec(0usize..12, 0..10),
        tags in proptest::collection::vec("[a-z]{1,6}", 0..3),
        seed in any::<u64>(),
    ) {
        let p = profile();
        let mut events: Vec<String> = picks
            .iter()
            .map(|&i| p.counters.events[i].name.clone())
            .collect();
        events.extend(tags.iter().cloned());

        let mut engine = PartitionEngine::from_profile(config(seed), &p).unwrap();
        let cache = PartitionCache::temporary().unwrap();
        let r = engine.partition(&cache, &events, Algorithm::Greedy, false).unwrap();

        prop_assert_eq!(multiset(&flatten(&r.groups)), multiset(&events));
        prop_assert!(r.groups.len() <= events.len());
        prop_assert_eq!(engine.oracle().live_contexts(), 0);
    }
}
