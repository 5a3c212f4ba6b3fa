// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommands and the helpers they share.

pub mod cache;
pub mod inspect;
pub mod partition;

use anyhow::Context;
use event_catalog::{HardwareProfile, EVENT_DELIMITER};
use partition_engine::EngineConfig;
use partition_planner::Algorithm;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// A parsed `EVENT1[:EVENT2]...` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventList(pub Vec<String>);

/// Installs the stderr log subscriber. `RUST_LOG` overrides `-v`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the engine configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}

pub fn load_profile(path: &Path) -> anyhow::Result<HardwareProfile> {
    if !path.exists() {
        let base = match std::env::current_dir() {
            Ok(cwd) if path.is_relative() => format!(" (relative to '{}')", cwd.display()),
            _ => String::new(),
        };
        anyhow::bail!(
            "hardware profile '{}' not found{base}; pass --profile <json>",
            path.display()
        );
    }
    HardwareProfile::from_file(path)
        .with_context(|| format!("failed to load hardware profile '{}'", path.display()))
}

pub fn parse_event_list(s: &str) -> Result<EventList, String> {
    let events: Vec<String> = s.split(EVENT_DELIMITER).map(str::to_string).collect();
    if events.iter().any(String::is_empty) {
        return Err(format!("empty event name in '{s}'"));
    }
    Ok(EventList(events))
}

pub fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Accepts `true`/`false`/`1`/`0`, case-insensitively.
pub fn parse_prefer_latest(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!("expected 'true' or 'false', got '{s}'")),
    }
}
