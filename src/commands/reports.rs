// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::MIN_PROJECTION_TRANSACTIONS;
use crate::ledger::Ledger;
use crate::store::SnapshotStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: SnapshotStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trend", sub)) => trend(ledger, sub)?,
        Some(("projection", sub)) => projection(ledger, sub)?,
        Some(("summary", sub)) => summary(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn trend<S: SnapshotStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let trends = ledger.compute_demand_trend();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trends)? {
        return Ok(());
    }
    if trends.is_empty() {
        println!("No product has at least two matched sales yet");
        return Ok(());
    }
    let rows = trends
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                t.sales.to_string(),
                format!("{:.0}", t.units_sold),
                format!("{:+.3}", t.slope),
                if t.declining { "declining" } else { "steady/rising" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Product", "Sales", "Units", "Units/day", "Trend"], rows)
    );
    Ok(())
}

fn projection<S: SnapshotStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let horizon = *sub.get_one::<u32>("horizon").unwrap();
    let window = *sub.get_one::<u32>("window").unwrap();
    let every = (*sub.get_one::<usize>("every").unwrap()).max(1);

    let Some(p) = ledger.compute_cash_flow_projection(horizon, window)? else {
        println!(
            "Need at least {} transactions to project cash flow",
            MIN_PROJECTION_TRANSACTIONS
        );
        return Ok(());
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        return Ok(());
    }
    println!(
        "Balance {} | {}-day average {:+.2}/day",
        fmt_money(&p.current_balance),
        p.window_days,
        p.daily_average
    );
    let last = p.points.len().saturating_sub(1);
    let rows = p
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) % every == 0 || *i == last)
        .map(|(_, pt)| vec![pt.date.to_string(), format!("{:.2}", pt.balance)])
        .collect();
    println!("{}", pretty_table(&["Date", "Projected balance"], rows));
    if let Some(d) = p.first_negative {
        println!("Warning: balance projected to go negative on {}", d);
    }
    Ok(())
}

fn summary<S: SnapshotStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let s = ledger.summary();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Transactions".into(), s.transactions.to_string()],
        vec!["Income".into(), fmt_money(&s.income)],
        vec!["Expense".into(), fmt_money(&s.expense)],
        vec!["Balance".into(), fmt_money(&s.balance)],
        vec!["Products".into(), s.products.to_string()],
        vec!["Products at/below threshold".into(), s.products_low.to_string()],
        vec!["Alerts new".into(), s.alerts_new.to_string()],
        vec!["Alerts ignored".into(), s.alerts_ignored.to_string()],
        vec!["Alerts resolved".into(), s.alerts_resolved.to_string()],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
