// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use tillbook::{Ledger, cli, commands, db};

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    setup_logging(matches.get_flag("verbose"));

    let path = db::resolve_path(matches.get_one::<String>("db").map(String::as_str))?;
    let store = db::open_at(&path)?;
    let mut ledger =
        Ledger::open(store).with_context(|| format!("Load ledger from {}", path.display()))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Ledger initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("sell", sub)) => commands::sales::handle(&mut ledger, sub)?,
        Some(("inventory", sub)) => commands::inventory::handle(&mut ledger, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut ledger, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to erase all data without --yes");
            }
            ledger.clear_all()?;
            println!("All transactions, inventory and alerts erased");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
