// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::inventory::resolve_product;
use crate::ledger::Ledger;
use crate::models::{TransactionInput, TxType};
use crate::store::SnapshotStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_id, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;

pub fn handle<S: SnapshotStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: SnapshotStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let date = sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?;
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let r#type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let product_id = sub
        .get_one::<String>("product")
        .map(|p| resolve_product(ledger, p))
        .transpose()?;
    let quantity = sub.get_one::<u32>("quantity").copied();

    let tx = ledger.record_transaction(TransactionInput {
        date,
        description: description.to_string(),
        amount,
        r#type,
        category,
        product_id,
        quantity,
    })?;
    println!(
        "Recorded {} #{} {} on {} '{}'",
        tx.r#type,
        tx.id,
        fmt_money(&tx.amount),
        tx.date,
        tx.description
    );
    Ok(())
}

fn list<S: SnapshotStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.quantity.map(|q| q.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Description", "Amount", "Category", "Qty"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub product_id: Option<i64>,
    pub quantity: Option<u32>,
}

pub fn query_rows<S: SnapshotStore>(
    ledger: &Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxType>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_lowercase());
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = ledger
        .get_transactions()
        .iter()
        .filter(|t| kind.is_none_or(|k| t.r#type == k))
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.to_lowercase() == c)
        })
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            description: t.description.clone(),
            amount: fmt_money(&t.amount),
            category: t.category.clone(),
            product_id: t.product_id,
            quantity: t.quantity,
        })
        .collect();
    Ok(data)
}

fn edit<S: SnapshotStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut tx = ledger
        .get_transactions()
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .with_context(|| format!("Transaction {} not found", id))?;
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date(d)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        tx.description = d.to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category = c.to_string();
    }
    let edited = ledger.edit_transaction(tx)?;
    println!(
        "Updated #{}: {} {} '{}' ({})",
        edited.id,
        edited.date,
        fmt_money(&edited.amount),
        edited.description,
        edited.category
    );
    Ok(())
}

fn remove<S: SnapshotStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let removed = ledger.delete_transaction(id)?;
    println!("Removed #{} '{}'", removed.id, removed.description);
    Ok(())
}
