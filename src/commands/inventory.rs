// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::ledger::{Ledger, NewItem};
use crate::models::Id;
use crate::store::SnapshotStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<S: SnapshotStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let stock = *sub.get_one::<i64>("stock").unwrap();
            let threshold = *sub.get_one::<i64>("threshold").unwrap();
            let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
            let item = ledger.add_inventory_item(NewItem {
                name,
                stock,
                low_stock_threshold: threshold,
                price,
            })?;
            println!(
                "Added product #{} '{}' ({} in stock, alert at {}, price {})",
                item.id,
                item.name,
                item.stock,
                item.low_stock_threshold,
                fmt_money(&item.price)
            );
        }
        Some(("list", sub)) => {
            let items = ledger.get_inventory();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.to_string(),
                            i.name.clone(),
                            i.stock.to_string(),
                            i.low_stock_threshold.to_string(),
                            fmt_money(&i.price),
                            if i.stock <= i.low_stock_threshold {
                                "LOW".to_string()
                            } else {
                                String::new()
                            },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Stock", "Threshold", "Price", ""], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

/// Accept either a numeric id or a product name.
pub fn resolve_product<S: SnapshotStore>(ledger: &Ledger<S>, raw: &str) -> Result<Id> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<Id>() {
        if ledger.find_item(id).is_some() {
            return Ok(id);
        }
    }
    match ledger.find_item_by_name(raw) {
        Some(item) => Ok(item.id),
        None => Err(LedgerError::ReferentialIntegrity(format!(
            "product '{}' does not exist",
            raw
        ))
        .into()),
    }
}
