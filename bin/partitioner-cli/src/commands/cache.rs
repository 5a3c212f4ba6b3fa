// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `partitioner cache` command: list the entries of a cache database.

use event_catalog::Namespace;
use partition_cache::PartitionCache;
use std::path::Path;

pub fn execute(cache_file: &Path) -> anyhow::Result<()> {
    if !cache_file.exists() {
        anyhow::bail!("no cache database at '{}'", cache_file.display());
    }
    let cache = PartitionCache::open(cache_file)?;

    let mut total = 0;
    for namespace in Namespace::ALL {
        let entries = cache.entries(namespace)?;
        if entries.is_empty() {
            continue;
        }
        println!("[{namespace}] {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
        for entry in &entries {
            println!("  {}", entry.signature);
            for (i, group) in entry.groups.iter().enumerate() {
                println!("    {i:2}: {group}");
            }
        }
        total += entries.len();
    }

    if total == 0 {
        println!("cache '{}' is empty", cache_file.display());
    }
    Ok(())
}
