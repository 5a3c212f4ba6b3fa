// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Randomized greedy partitioning over a feasibility oracle.
//!
//! One trial shuffles the input and packs it first-fit: each event joins
//! the first existing group the oracle still accepts it into, or opens a
//! new group. The search runs a fixed number of trials and keeps the
//! result with the fewest groups. Ties keep the earlier trial.
//!
//! # Probing
//!
//! The oracle is stateful and only answers incremental questions, so
//! testing "can `e` join group `G`?" means:
//!
//! ```text
//! open context → add every member of G → add e → destroy context
//! ```
//!
//! Every member of `G` was accepted when it joined, so a rejection while
//! replaying `G` is an oracle inconsistency and aborts the search. Each
//! context lives inside a [`TrialGuard`], so aborts never leak one.
//!
//! # Output order
//!
//! Events inside a group are sorted by catalog index. Groups keep the
//! order in which the winning trial opened them.

use crate::strategy::BucketPartitioner;
use crate::{Group, Partition, PartitionError};
use event_catalog::{EventCatalog, Namespace};
use rand::seq::SliceRandom;
use rand::Rng;
use trial_oracle::{FeasibilityOracle, OracleError, TrialGuard};

/// Number of shuffled trials per search.
pub const DEFAULT_RETRY_BUDGET: usize = 100;

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct GreedyStats {
    /// Trials run.
    pub trials: usize,
    /// Membership tests issued, including singleton checks.
    pub probes: usize,
    /// Trial that produced the kept result.
    pub best_trial: usize,
}

/// Randomized first-fit packing of counter events.
pub struct GreedyPartitioner<'a, O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> {
    catalog: &'a EventCatalog,
    oracle: &'a mut O,
    rng: &'a mut R,
    retry_budget: usize,
    stats: GreedyStats,
}

impl<'a, O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> GreedyPartitioner<'a, O, R> {
    pub fn new(catalog: &'a EventCatalog, oracle: &'a mut O, rng: &'a mut R) -> Self {
        Self {
            catalog,
            oracle,
            rng,
            retry_budget: DEFAULT_RETRY_BUDGET,
            stats: GreedyStats::default(),
        }
    }

    /// Sets the number of trials.
    pub fn with_retry_budget(mut self, retry_budget: usize) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Statistics of the most recent [`partition`](BucketPartitioner::partition) call.
    pub fn stats(&self) -> GreedyStats {
        self.stats
    }

    /// Resolves every event to its catalog index, failing on the first
    /// unknown one.
    pub fn validate(&self, bucket: &[String]) -> Result<Vec<usize>, PartitionError> {
        bucket
            .iter()
            .map(|event| {
                self.catalog
                    .counter_index(event)
                    .ok_or_else(|| PartitionError::UnknownEvent {
                        namespace: Namespace::Counter,
                        event: event.clone(),
                    })
            })
            .collect()
    }

    /// One first-fit pass over `order`. Groups hold positions into `bucket`.
    fn pack(&mut self, bucket: &[String], order: &[usize]) -> Result<Vec<Vec<usize>>, PartitionError> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for &pos in order {
            let mut placed = false;
            for group in groups.iter_mut() {
                if self.probe(bucket, group, &bucket[pos])? {
                    group.push(pos);
                    placed = true;
                    break;
                }
            }
            if !placed {
                self.check_singleton(&bucket[pos])?;
                groups.push(vec![pos]);
            }
        }
        Ok(groups)
    }

    /// Asks whether `candidate` can join the group made of `members`.
    fn probe(
        &mut self,
        bucket: &[String],
        members: &[usize],
        candidate: &str,
    ) -> Result<bool, PartitionError> {
        self.stats.probes += 1;
        let mut trial = TrialGuard::open(&mut *self.oracle)?;
        for &m in members {
            if !trial.try_add(&bucket[m])? {
                let group: Vec<&str> = members.iter().map(|&i| bucket[i].as_str()).collect();
                return Err(OracleError::UnexpectedRejection {
                    event: bucket[m].clone(),
                    group: group.join(", "),
                }
                .into());
            }
        }
        let accepted = trial.try_add(candidate)?;
        trial.release()?;
        Ok(accepted)
    }

    /// A new group must at least hold its first event.
    fn check_singleton(&mut self, event: &str) -> Result<(), PartitionError> {
        self.stats.probes += 1;
        let mut trial = TrialGuard::open(&mut *self.oracle)?;
        if !trial.try_add(event)? {
            return Err(OracleError::SingletonRejected {
                event: event.to_string(),
            }
            .into());
        }
        trial.release()?;
        Ok(())
    }
}

impl<O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> BucketPartitioner for GreedyPartitioner<'_, O, R> {
    fn name(&self) -> &str {
        "greedy"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Counter
    }

    fn partition(&mut self, bucket: &[String]) -> Result<Partition, PartitionError> {
        self.stats = GreedyStats::default();
        if bucket.is_empty() {
            return Ok(Partition::empty(Namespace::Counter));
        }
        if self.retry_budget == 0 {
            return Err(PartitionError::InvalidRetryBudget);
        }
        let indices = self.validate(bucket)?;

        let mut order: Vec<usize> = (0..bucket.len()).collect();
        let mut threshold = bucket.len() + 1;
        let mut best: Vec<Vec<usize>> = Vec::new();

        for trial in 0..self.retry_budget {
            order.shuffle(&mut *self.rng);
            let groups = self.pack(bucket, &order)?;
            self.stats.trials += 1;
            if groups.len() < threshold {
                tracing::debug!("greedy trial {trial}: {} group(s)", groups.len());
                threshold = groups.len();
                self.stats.best_trial = trial;
                best = groups;
            }
        }

        let groups = best
            .into_iter()
            .map(|mut members| {
                members.sort_by_key(|&pos| indices[pos]);
                Group::new(members.into_iter().map(|pos| bucket[pos].clone()).collect())
            })
            .collect();

        tracing::info!(
            "greedy: {} event(s) → {} group(s) after {} trial(s), {} probe(s)",
            bucket.len(),
            threshold,
            self.stats.trials,
            self.stats.probes,
        );
        Ok(Partition::from_groups(Namespace::Counter, groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use trial_oracle::{accepts_all, SlotOracle};

    fn events(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn catalog(names: &[&str]) -> EventCatalog {
        EventCatalog::from_events(events(names), Vec::new()).unwrap()
    }

    /// `num_slots` counters; every event may use any slot.
    fn slots(num_slots: usize, names: &[&str]) -> SlotOracle {
        names
            .iter()
            .fold(SlotOracle::new(num_slots), |o, n| o.with_event(n, (0..num_slots).collect()))
    }

    /// Accepts any pair of distinct events but no triple.
    #[derive(Default)]
    struct PairOracle {
        live: usize,
    }

    impl FeasibilityOracle for PairOracle {
        type Handle = Vec<String>;

        fn create_trial_context(&mut self) -> Result<Vec<String>, OracleError> {
            self.live += 1;
            Ok(Vec::new())
        }

        fn try_add(&mut self, handle: &mut Vec<String>, event: &str) -> Result<bool, OracleError> {
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

    /// Accepts a singleton of `bad`, then forgets it on replay.
    struct FlakyOracle {
        bad: String,
        live: usize,
        seen: usize,
    }

    impl FeasibilityOracle for FlakyOracle {
        type Handle = ();

        fn create_trial_context(&mut self) -> Result<(), OracleError> {
            self.live += 1;
            Ok(())
        }

        fn try_add(&mut self, _handle: &mut (), event: &str) -> Result<bool, OracleError> {
            if event == self.bad {
                self.seen += 1;
                return Ok(self.seen == 1);
            }
            Ok(true)
        }

        fn destroy_trial_context(&mut self, _handle: ()) -> Result<(), OracleError> {
            self.live -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_pair_oracle_three_events_two_groups() {
        let cat = catalog(&["A", "B", "C"]);
        let mut oracle = PairOracle::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let p = greedy.partition(&events(&["A", "B", "C"])).unwrap();
        assert_eq!(p.num_groups(), 2);
        p.validate_coverage(&events(&["A", "B", "C"])).unwrap();
        assert_eq!(greedy.stats().trials, DEFAULT_RETRY_BUDGET);
        drop(greedy);
        assert_eq!(oracle.live, 0);
    }

    #[test]
    fn test_single_event() {
        let cat = catalog(&["PAPI_TOT_CYC"]);
        let mut oracle = slots(4, &["PAPI_TOT_CYC"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let p = greedy.partition(&events(&["PAPI_TOT_CYC"])).unwrap();
        assert_eq!(p.to_texts(), vec!["PAPI_TOT_CYC"]);
    }

    #[test]
    fn test_all_fit_one_group_in_catalog_order() {
        let names = ["E0", "E1", "E2", "E3"];
        let cat = catalog(&names);
        let mut oracle = slots(4, &names);
        let mut rng = StdRng::seed_from_u64(3);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let p = greedy.partition(&events(&["E3", "E1", "E0", "E2"])).unwrap();
        assert_eq!(p.to_texts(), vec!["E0:E1:E2:E3"]);
    }

    #[test]
    fn test_empty_bucket_never_touches_oracle() {
        let cat = catalog(&["A"]);
        let mut oracle = slots(1, &["A"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        assert!(greedy.partition(&[]).unwrap().is_empty());
        drop(greedy);
        assert_eq!(oracle.stats().contexts_created, 0);
    }

    #[test]
    fn test_unknown_event_fails_before_probing() {
        let cat = catalog(&["A"]);
        let mut oracle = slots(2, &["A"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let err = greedy.partition(&events(&["A", "NOPE"])).unwrap_err();
        assert!(matches!(err, PartitionError::UnknownEvent { ref event, .. } if event == "NOPE"));
        drop(greedy);
        assert_eq!(oracle.stats().contexts_created, 0);
    }

    #[test]
    fn test_zero_retry_budget_rejected() {
        let cat = catalog(&["A"]);
        let mut oracle = slots(1, &["A"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng).with_retry_budget(0);
        assert!(matches!(
            greedy.partition(&events(&["A"])),
            Err(PartitionError::InvalidRetryBudget)
        ));
    }

    #[test]
    fn test_singleton_rejection_is_fatal() {
        struct Never;
        impl FeasibilityOracle for Never {
            type Handle = ();
            fn create_trial_context(&mut self) -> Result<(), OracleError> {
                Ok(())
            }
            fn try_add(&mut self, _: &mut (), _: &str) -> Result<bool, OracleError> {
                Ok(false)
            }
            fn destroy_trial_context(&mut self, _: ()) -> Result<(), OracleError> {
                Ok(())
            }
        }

        let cat = catalog(&["A"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut oracle = Never;
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);
        let err = greedy.partition(&events(&["A"])).unwrap_err();
        assert!(matches!(err, PartitionError::Oracle(OracleError::SingletonRejected { .. })));
    }

    #[test]
    fn test_replay_rejection_aborts_without_leaking() {
        let cat = catalog(&["BAD", "OK"]);
        let mut oracle = FlakyOracle {
            bad: "BAD".into(),
            live: 0,
            seen: 0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        // Whichever order is drawn, BAD is replayed or re-probed after its
        // first acceptance, and the second answer is a rejection.
        let err = greedy.partition(&events(&["BAD", "OK"])).unwrap_err();
        assert!(matches!(err, PartitionError::Oracle(_)));
        drop(greedy);
        assert_eq!(oracle.live, 0);
    }

    #[test]
    fn test_duplicates_split_across_groups() {
        let cat = catalog(&["A"]);
        let mut oracle = slots(4, &["A"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let p = greedy.partition(&events(&["A", "A"])).unwrap();
        assert_eq!(p.to_texts(), vec!["A", "A"]);
    }

    #[test]
    fn test_restricted_slots() {
        // X and Y both need slot 0; Z may use either slot.
        let cat = catalog(&["X", "Y", "Z"]);
        let mut oracle = SlotOracle::new(2)
            .with_event("X", vec![0])
            .with_event("Y", vec![0])
            .with_event("Z", vec![0, 1]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng);

        let p = greedy.partition(&events(&["X", "Y", "Z"])).unwrap();
        assert_eq!(p.num_groups(), 2);
    }

    #[test]
    fn test_same_seed_same_result() {
        let names: Vec<String> = (0..12).map(|i| format!("E{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let cat = catalog(&refs);

        let run = |seed: u64| {
            let mut oracle = SlotOracle::new(3);
            for (i, n) in refs.iter().enumerate() {
                oracle = oracle.with_event(n, vec![i % 3, (i + 1) % 3]);
            }
            let mut rng = StdRng::seed_from_u64(seed);
            GreedyPartitioner::new(&cat, &mut oracle, &mut rng)
                .with_retry_budget(10)
                .partition(&names)
                .unwrap()
        };

        assert_eq!(run(42), run(42));
    }

    proptest! {
        #[test]
        fn prop_covers_input_and_beats_trivial(n in 1usize..10, num_slots in 1usize..5, seed in any::<u64>()) {
            let names: Vec<String> = (0..n).map(|i| format!("E{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let cat = catalog(&refs);
            let mut oracle = slots(num_slots, &refs);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut greedy = GreedyPartitioner::new(&cat, &mut oracle, &mut rng).with_retry_budget(5);

            let p = greedy.partition(&names).unwrap();
            prop_assert!(p.validate_coverage(&names).is_ok());
            prop_assert!(p.num_groups() <= n);
            // Free slots: packing is always optimal.
            prop_assert_eq!(p.num_groups(), (n + num_slots - 1) / num_slots);
            drop(greedy);
            prop_assert_eq!(oracle.live_contexts(), 0);
        }

        #[test]
        fn prop_groups_replay_on_fresh_context(
            eligible in proptest::collection::vec(proptest::collection::vec(0usize..4, 1..3), 1..10),
            seed in any::<u64>(),
        ) {
            let names: Vec<String> = (0..eligible.len()).map(|i| format!("E{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let cat = catalog(&refs);
            let pmu = || {
                names
                    .iter()
                    .zip(&eligible)
                    .fold(SlotOracle::new(4), |o, (n, s)| o.with_event(n, s.clone()))
            };

            let mut oracle = pmu();
            let mut rng = StdRng::seed_from_u64(seed);
            let p = GreedyPartitioner::new(&cat, &mut oracle, &mut rng)
                .with_retry_budget(5)
                .partition(&names)
                .unwrap();

            prop_assert!(p.validate_coverage(&names).is_ok());
            for group in &p.groups {
                let mut fresh = pmu();
                prop_assert!(accepts_all(&mut fresh, group.events()).unwrap(), "{} rejected", group);
                prop_assert_eq!(fresh.live_contexts(), 0);
            }
        }
    }
}
