// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tillbook::commands::doctor;
use tillbook::models::{Alert, AlertStatus, AlertType, InventoryItem, Transaction, TxType};
use tillbook::Snapshot;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
}

#[test]
fn clean_snapshot_has_no_issues() {
    assert!(doctor::issues(&Snapshot::default()).is_empty());
}

#[test]
fn reports_dangling_references_and_oversold_stock() {
    let snapshot = Snapshot {
        transactions: vec![Transaction {
            id: 3,
            date: day(),
            description: "Sale: Vase x1".into(),
            amount: Decimal::from(20),
            r#type: TxType::Income,
            category: "Sales".into(),
            product_id: Some(99),
            quantity: None,
        }],
        inventory: vec![InventoryItem {
            id: 1,
            name: "Bowl".into(),
            stock: -2,
            low_stock_threshold: 1,
            price: Decimal::from(8),
        }],
        alerts: vec![Alert {
            id: 4,
            r#type: AlertType::UnusualExpense,
            message: "Unusual expense".into(),
            date: day(),
            status: AlertStatus::New,
            related_id: Some(42),
        }],
    };
    let kinds: Vec<&str> = doctor::issues(&snapshot).iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            "sale_unknown_product",
            "sale_without_quantity",
            "negative_stock",
            "alert_orphaned"
        ]
    );
}
