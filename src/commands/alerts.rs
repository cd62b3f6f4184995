// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{Alert, AlertStatus};
use crate::store::SnapshotStore;
use crate::utils::{maybe_print_json, parse_id, pretty_table};
use anyhow::Result;

pub fn handle<S: SnapshotStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = query_alerts(ledger, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.date.to_string(),
                            a.r#type.to_string(),
                            a.status.to_string(),
                            a.message.clone(),
                            a.related_id.map(|r| r.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Type", "Status", "Message", "Related"], rows)
                );
            }
        }
        Some(("set", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let status: AlertStatus = sub.get_one::<String>("status").unwrap().parse()?;
            let alert = ledger.set_alert_status(id, status)?;
            println!("Alert #{} marked {}", alert.id, alert.status);
        }
        _ => {}
    }
    Ok(())
}

pub fn query_alerts<S: SnapshotStore>(
    ledger: &Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<Alert>> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<AlertStatus>())
        .transpose()?;
    Ok(ledger
        .get_alerts()
        .iter()
        .filter(|a| status.is_none_or(|s| a.status == s))
        .cloned()
        .collect())
}
