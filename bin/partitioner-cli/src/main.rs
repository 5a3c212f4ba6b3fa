// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partitioner
//!
//! Command-line interface for the event-set partitioner.
//!
//! ## Usage
//! ```bash
//! # Partition a request, reconciling with the cache
//! partitioner partition ./partitions.db PAPI_TOT_CYC:PAPI_TOT_INS:PAPI_FP_OPS
//!
//! # Cache-only lookup, returning the fresh result even if the cache is better
//! partitioner partition ./partitions.db PAPI_TOT_CYC:PAPI_TOT_INS cached true
//!
//! # Show what the hardware profile offers
//! partitioner --profile profiles/haswell-k20.json inspect
//!
//! # List cached partitions
//! partitioner cache ./partitions.db
//! ```

mod commands;

use clap::{Parser, Subcommand};
use commands::EventList;
use partition_planner::Algorithm;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "partitioner",
    about = "Splits measurement events into the fewest co-measurable groups",
    version,
    author
)]
struct Cli {
    /// Path to a TOML engine configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hardware profile (JSON) describing the available events. The default
    /// is resolved against the current directory, so pass an explicit path
    /// when running outside the workspace root.
    #[arg(short, long, global = true, default_value = "profiles/haswell-k20.json")]
    profile: PathBuf,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a `:`-separated event list and print one group per line.
    Partition {
        /// Partition cache database (created if missing).
        cache_file: PathBuf,

        /// Events to partition, e.g. `PAPI_TOT_CYC:PAPI_TOT_INS`.
        #[arg(value_parser = commands::parse_event_list)]
        events: EventList,

        /// `greedy` or `cached` (default from config).
        #[arg(value_parser = commands::parse_algorithm)]
        algorithm: Option<Algorithm>,

        /// `true` to return the fresh partition even if the cache holds a
        /// better one (default from config).
        #[arg(value_parser = commands::parse_prefer_latest)]
        prefer_latest: Option<bool>,

        /// Print the groups and metrics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the events and limits described by the hardware profile.
    Inspect,

    /// List every partition stored in a cache database.
    Cache {
        /// Partition cache database.
        cache_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Partition {
            cache_file,
            events,
            algorithm,
            prefer_latest,
            json,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::partition::execute(
                &cli.profile,
                config,
                &cache_file,
                &events,
                algorithm,
                prefer_latest,
                json,
            )
        }
        Commands::Inspect => commands::inspect::execute(&cli.profile),
        Commands::Cache { cache_file } => commands::cache::execute(&cache_file),
    }
}
