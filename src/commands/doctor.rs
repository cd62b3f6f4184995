// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Ledger, Snapshot};
use crate::models::{AlertType, TxType};
use crate::store::SnapshotStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

pub fn issues(snapshot: &Snapshot) -> Vec<Issue> {
    let mut out = Vec::new();
    let product_exists = |id: i64| snapshot.inventory.iter().any(|i| i.id == id);

    // 1) Sales pointing at products that are gone, or missing a quantity
    for t in &snapshot.transactions {
        if let Some(pid) = t.product_id {
            if !product_exists(pid) {
                out.push(Issue {
                    kind: "sale_unknown_product",
                    detail: format!("tx #{} references product {}", t.id, pid),
                });
            }
            if t.r#type == TxType::Income && t.quantity.is_none() {
                out.push(Issue {
                    kind: "sale_without_quantity",
                    detail: format!("tx #{}", t.id),
                });
            }
        }
    }

    // 2) Oversold stock
    for i in &snapshot.inventory {
        if i.stock < 0 {
            out.push(Issue {
                kind: "negative_stock",
                detail: format!("'{}' stock {}", i.name, i.stock),
            });
        }
    }

    // 3) Alerts whose subject was deleted
    for a in &snapshot.alerts {
        let Some(rel) = a.related_id else { continue };
        let resolves = match a.r#type {
            AlertType::LowStock => product_exists(rel),
            AlertType::UnusualExpense | AlertType::DuplicateEntry => {
                snapshot.transactions.iter().any(|t| t.id == rel)
            }
        };
        if !resolves {
            out.push(Issue {
                kind: "alert_orphaned",
                detail: format!("alert #{} ({}) -> {}", a.id, a.r#type, rel),
            });
        }
    }
    out
}

pub fn handle<S: SnapshotStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let found = issues(ledger.snapshot());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &found)? {
        return Ok(());
    }
    if found.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = found
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
