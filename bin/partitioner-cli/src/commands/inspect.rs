// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `partitioner inspect` command: display the hardware profile.
//!
//! Prints the counter PMU with each event's eligible slots, then every
//! device with its domains, pass capacities and full event paths.

use event_catalog::EventCatalog;
use std::path::Path;

pub fn execute(profile_path: &Path) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            partitioner · Profile Inspector           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let profile = super::load_profile(profile_path)?;
    let catalog = EventCatalog::populate(&profile)?;

    // ── Summary ────────────────────────────────────────────────
    println!("  Profile: {}", profile.name);
    println!("  {}", catalog.summary());
    println!();

    // ── Counter PMU ────────────────────────────────────────────
    let num_slots = profile.counters.num_slots;
    println!("  Counter PMU: {num_slots} slot(s)");
    println!("  {:<4} {:<28} {}", "Idx", "Event", "Slots");
    println!("  {}", "-".repeat(50));
    for (i, event) in profile.counters.events.iter().enumerate() {
        let slots = event.eligible_slots(num_slots);
        let slots = if slots.len() == num_slots {
            "any".to_string()
        } else {
            format!("{slots:?}")
        };
        println!("  {:<4} {:<28} {}", i, event.name, slots);
    }
    println!();

    // ── Devices ────────────────────────────────────────────────
    println!("  Devices ({}):", profile.devices.len());
    for (id, device) in profile.devices.iter().enumerate() {
        println!("   [{id}] {} ({})", device.ident(), device.name);
        for domain in &device.domains {
            println!(
                "       {:<16} capacity {:>2}, {} event(s)",
                domain.name,
                domain.capacity,
                domain.events.len(),
            );
        }
    }
    println!();

    if !catalog.device_events().is_empty() {
        println!("  Device-domain events:");
        for path in catalog.device_events() {
            println!("   {path}");
        }
        println!();
    }

    Ok(())
}
