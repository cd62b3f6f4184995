// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;
use tillbook::commands::importer;
use tillbook::models::{AlertType, TxType};
use tillbook::notify::NullNotifier;
use tillbook::store::MemoryStore;
use tillbook::{Ledger, cli};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn base_ledger() -> Ledger<MemoryStore> {
    Ledger::open(MemoryStore::new())
        .unwrap()
        .with_clock(today)
        .with_notifier(NullNotifier)
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn import(ledger: &mut Ledger<MemoryStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tillbook", "import"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(ledger, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn inventory_then_sales_import_moves_stock() {
    let mut ledger = base_ledger();
    let inv = csv_file("name,stock,threshold,price\nCandle,5,3,4.00\nSoap, 20 ,5,2.50\n");
    let padded = format!("  {}  ", inv.path().to_str().unwrap());
    import(&mut ledger, &["inventory", "--path", &padded]).unwrap();
    assert_eq!(ledger.get_inventory().len(), 2);

    let txs = csv_file(
        "date,description,amount,type,category,product,quantity\n\
         2025-06-10,Candle sale,8.00,,,Candle,2\n\
         2025-06-11,Office chair,-120,,Furniture,,\n",
    );
    import(&mut ledger, &["transactions", "--path", txs.path().to_str().unwrap()]).unwrap();

    let candle = ledger.find_item_by_name("candle").unwrap();
    assert_eq!(candle.stock, 3);
    assert_eq!(ledger.get_transactions().len(), 2);
    assert_eq!(ledger.get_transactions()[0].r#type, TxType::Expense);
    assert_eq!(ledger.get_transactions()[0].amount, Decimal::from(120));
    assert_eq!(ledger.get_alerts().len(), 1);
    assert_eq!(ledger.get_alerts()[0].r#type, AlertType::LowStock);
}

#[test]
fn skip_detection_leaves_stock_and_alerts_alone() {
    let mut ledger = base_ledger();
    let inv = csv_file("name,stock,threshold,price\nCandle,5,3,4.00\n");
    import(&mut ledger, &["inventory", "--path", inv.path().to_str().unwrap()]).unwrap();

    // Historical price differs from today's; accepted in this mode.
    let txs = csv_file(
        "date,description,amount,type,category,product,quantity\n\
         2024-11-02,Candle sale,6.00,income,,Candle,2\n",
    );
    import(
        &mut ledger,
        &["transactions", "--path", txs.path().to_str().unwrap(), "--skip-detection"],
    )
    .unwrap();
    assert_eq!(ledger.get_transactions().len(), 1);
    assert_eq!(ledger.get_transactions()[0].category, "Sales");
    assert_eq!(ledger.get_inventory()[0].stock, 5);
    assert!(ledger.get_alerts().is_empty());
}

#[test]
fn sale_row_without_quantity_rejects_whole_file() {
    let mut ledger = base_ledger();
    let inv = csv_file("name,stock,threshold,price\nCandle,5,3,4.00\n");
    import(&mut ledger, &["inventory", "--path", inv.path().to_str().unwrap()]).unwrap();

    let txs = csv_file(
        "date,description,amount,type,category,product,quantity\n\
         2025-06-01,Rent,900,expense,Premises,,\n\
         2025-06-02,Candle sale,4.00,income,,Candle,\n",
    );
    let err = import(
        &mut ledger,
        &["transactions", "--path", txs.path().to_str().unwrap(), "--skip-detection"],
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("row 2"));
    assert!(ledger.get_transactions().is_empty());
}

#[test]
fn importer_rejects_invalid_date() {
    let mut ledger = base_ledger();
    let txs = csv_file(
        "date,description,amount,type,category,product,quantity\n\
         2025-13-03,Shop,5,expense,Misc,,\n",
    );
    let err = import(&mut ledger, &["transactions", "--path", txs.path().to_str().unwrap()])
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid date"));
    assert!(ledger.get_transactions().is_empty());
}

#[test]
fn importer_rejects_unknown_product() {
    let mut ledger = base_ledger();
    let txs = csv_file(
        "date,description,amount,type,category,product,quantity\n\
         2025-06-03,Vase sale,5,income,,Vase,1\n",
    );
    let err = import(&mut ledger, &["transactions", "--path", txs.path().to_str().unwrap()])
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Vase"));
}
