// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::import::{parse_inventory, parse_transactions};
use crate::ledger::{ImportMode, Ledger};
use crate::store::SnapshotStore;
use anyhow::{Context, Result};
use std::fs::File;

pub fn handle<S: SnapshotStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(ledger, sub),
        Some(("inventory", sub)) => import_inventory(ledger, sub),
        _ => Ok(()),
    }
}

fn import_transactions<S: SnapshotStore>(
    ledger: &mut Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mode = if sub.get_flag("skip_detection") {
        ImportMode::SkipDetection
    } else {
        ImportMode::Validated
    };
    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let inputs = parse_transactions(file, ledger.get_inventory(), ledger.today())
        .with_context(|| format!("Read transactions from {}", path))?;
    let alerts_before = ledger.get_alerts().len();
    let created = ledger
        .import_transactions(inputs, mode)
        .with_context(|| format!("Import transactions from {}", path))?;
    println!(
        "Imported {} transactions from {} ({} new alerts)",
        created.len(),
        path,
        ledger.get_alerts().len() - alerts_before
    );
    Ok(())
}

fn import_inventory<S: SnapshotStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let items = parse_inventory(file).with_context(|| format!("Read inventory from {}", path))?;
    let added = ledger
        .import_inventory(items)
        .with_context(|| format!("Import inventory from {}", path))?;
    println!("Imported {} products from {}", added.len(), path);
    Ok(())
}
