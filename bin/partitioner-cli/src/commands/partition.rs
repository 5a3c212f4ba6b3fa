// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `partitioner partition` command: partition one event list.
//!
//! Prints each merged group on its own line, prefixed by its index:
//! ```text
//!  0: PAPI_TOT_CYC:PAPI_TOT_INS:CUDA.Tesla_K20m.domain_a.inst_executed
//!  1: PAPI_FP_OPS
//! ```

use super::EventList;
use partition_cache::PartitionCache;
use partition_engine::{EngineConfig, FinalResult, PartitionEngine};
use partition_planner::Algorithm;
use std::io::Write;
use std::path::Path;

pub fn execute(
    profile: &Path,
    config: EngineConfig,
    cache_file: &Path,
    events: &EventList,
    algorithm: Option<Algorithm>,
    prefer_latest: Option<bool>,
    json: bool,
) -> anyhow::Result<()> {
    let algorithm = match algorithm {
        Some(a) => a,
        None => config.parse_algorithm()?,
    };
    let prefer_latest = prefer_latest.unwrap_or(config.prefer_latest);

    let profile = super::load_profile(profile)?;
    let mut engine = PartitionEngine::from_profile(config, &profile)?;
    let cache = PartitionCache::open(cache_file)?;

    tracing::info!(
        "partitioning {} event(s) with {algorithm}, cache '{}'",
        events.0.len(),
        cache_file.display(),
    );
    let result = engine.partition(&cache, &events.0, algorithm, prefer_latest)?;
    cache.flush()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        write_groups(&mut out, &result)?;
    }
    Ok(())
}

fn write_groups<W: Write>(out: &mut W, result: &FinalResult) -> std::io::Result<()> {
    for (i, group) in result.groups.iter().enumerate() {
        writeln!(out, "{i:2}: {group}")?;
    }
    Ok(())
}
