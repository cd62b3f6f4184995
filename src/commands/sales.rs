// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::inventory::resolve_product;
use crate::ledger::Ledger;
use crate::store::SnapshotStore;
use crate::utils::{fmt_money, parse_date};
use anyhow::Result;

pub fn handle<S: SnapshotStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let product_id = resolve_product(ledger, sub.get_one::<String>("product").unwrap())?;
    let quantity = *sub.get_one::<u32>("quantity").unwrap();
    let date = sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?;

    let alerts_before = ledger.get_alerts().len();
    let tx = ledger.checkout(product_id, quantity, date)?;
    println!(
        "Sold {} on {} for {} (#{})",
        tx.description,
        tx.date,
        fmt_money(&tx.amount),
        tx.id
    );
    if let Some(item) = ledger.find_item(product_id) {
        println!("'{}' stock now {}", item.name, item.stock);
    }
    let raised = ledger.get_alerts().len() - alerts_before;
    for alert in ledger.get_alerts().iter().take(raised) {
        println!("! {}", alert.message);
    }
    Ok(())
}
