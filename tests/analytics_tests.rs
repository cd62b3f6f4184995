// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tillbook::analytics::{DEFAULT_HORIZON_DAYS, DEFAULT_WINDOW_DAYS};
use tillbook::models::TransactionInput;
use tillbook::notify::NullNotifier;
use tillbook::store::MemoryStore;
use tillbook::{Ledger, LedgerError, NewItem};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn ledger() -> Ledger<MemoryStore> {
    Ledger::open(MemoryStore::new())
        .unwrap()
        .with_clock(today)
        .with_notifier(NullNotifier)
}

#[test]
fn demand_trend_of_rising_sales_has_unit_slope() {
    let mut l = ledger();
    let lamp = l
        .add_inventory_item(NewItem {
            name: "Lamp".into(),
            stock: 100,
            low_stock_threshold: 5,
            price: Decimal::from(30),
        })
        .unwrap();
    for (qty, day) in [(1, 10), (2, 11), (3, 12)] {
        l.checkout(lamp.id, qty, Some(date(6, day))).unwrap();
    }
    let trends = l.compute_demand_trend();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].product_id, lamp.id);
    assert_eq!(trends[0].sales, 3);
    assert_relative_eq!(trends[0].slope, 1.0, epsilon = 1e-9);
    assert!(!trends[0].declining);
}

#[test]
fn demand_trend_matches_imported_rows_by_description() {
    let mut l = ledger();
    l.add_inventory_item(NewItem {
        name: "Scarf".into(),
        stock: 100,
        low_stock_threshold: 5,
        price: Decimal::from(10),
    })
    .unwrap();
    // Historical rows without a product id, quantity implied by amount.
    for (amount, day) in [(40, 1), (20, 8), (10, 15)] {
        l.record_transaction(
            TransactionInput::income("2x winter SCARF bundle", Decimal::from(amount))
                .on(date(5, day)),
        )
        .unwrap();
    }
    let trends = l.compute_demand_trend();
    assert_eq!(trends.len(), 1);
    assert!(trends[0].declining);
    assert_relative_eq!(trends[0].units_sold, 7.0);
}

#[test]
fn quiet_window_projects_flat_balance() {
    let mut l = ledger();
    for d in 1..=4 {
        l.record_transaction(TransactionInput::income("Invoice", Decimal::from(100)).on(date(1, d)))
            .unwrap();
    }
    for d in 5..=6 {
        l.record_transaction(
            TransactionInput::expense("Stock", Decimal::from(50), "Purchases").on(date(1, d)),
        )
        .unwrap();
    }
    let p = l
        .compute_cash_flow_projection(DEFAULT_HORIZON_DAYS, DEFAULT_WINDOW_DAYS)
        .unwrap()
        .unwrap();
    assert_eq!(p.current_balance, Decimal::from(300));
    assert_eq!(p.daily_average, 0.0);
    assert_eq!(p.points.len(), 90);
    assert!(p.points.iter().all(|pt| pt.balance == 300.0));
    assert_eq!(p.points[0].date, date(7, 1));
    assert!(!p.negative_balance_warning);
}

#[test]
fn flat_negative_balance_is_flagged() {
    let mut l = ledger();
    for d in 1..=6 {
        l.record_transaction(
            TransactionInput::expense("Loan repayment", Decimal::from(20), "Finance")
                .on(date(2, d)),
        )
        .unwrap();
    }
    let p = l.compute_cash_flow_projection(90, 30).unwrap().unwrap();
    assert_eq!(p.daily_average, 0.0);
    assert!(p.points.iter().all(|pt| pt.balance == -120.0));
    assert!(p.negative_balance_warning);
    assert_eq!(p.first_negative, Some(date(7, 1)));
}

#[test]
fn recent_spending_drives_projection_down() {
    let mut l = ledger();
    l.record_transaction(TransactionInput::income("Capital", Decimal::from(1000)).on(date(1, 2)))
        .unwrap();
    for d in 21..=25 {
        l.record_transaction(
            TransactionInput::expense("Wages", Decimal::from(60), "Payroll").on(date(6, d)),
        )
        .unwrap();
    }
    // 300 out over a 30-day window: -10/day from a 700 balance.
    let p = l.compute_cash_flow_projection(90, 30).unwrap().unwrap();
    assert_relative_eq!(p.daily_average, -10.0, epsilon = 1e-9);
    assert_relative_eq!(p.points[69].balance, 0.0, epsilon = 1e-6);
    assert!(p.negative_balance_warning);
    assert_eq!(p.first_negative, Some(date(9, 9)));
}

#[test]
fn projection_needs_history_and_sane_arguments() {
    let mut l = ledger();
    for _ in 0..5 {
        l.record_transaction(TransactionInput::income("Tips", Decimal::from(5)))
            .unwrap();
    }
    assert!(l.compute_cash_flow_projection(90, 30).unwrap().is_none());
    assert!(matches!(
        l.compute_cash_flow_projection(0, 30).unwrap_err(),
        LedgerError::Validation(_)
    ));
}

#[test]
fn summary_counts_low_products() {
    let mut l = ledger();
    let cup = l
        .add_inventory_item(NewItem {
            name: "Cup".into(),
            stock: 3,
            low_stock_threshold: 2,
            price: Decimal::from(2),
        })
        .unwrap();
    l.checkout(cup.id, 1, None).unwrap();
    l.record_transaction(TransactionInput::expense("Rent", Decimal::from(5), "Premises"))
        .unwrap();
    let s = l.summary();
    assert_eq!(s.income, Decimal::from(2));
    assert_eq!(s.expense, Decimal::from(5));
    assert_eq!(s.balance, Decimal::from(-3));
    assert_eq!(s.products_low, 1);
    assert_eq!(s.alerts_new, 1);
}
