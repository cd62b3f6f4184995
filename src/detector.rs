// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-transaction anomaly checks: unusual expenses and low-stock crossings.

use tracing::{debug, warn};

use crate::models::{AlertType, Id, InventoryItem, Transaction, TxType};
use crate::stats::z_score;

/// Expense samples required before the z-score check runs (strictly more).
pub const MIN_EXPENSE_SAMPLES: usize = 5;
pub const Z_THRESHOLD: f64 = 2.5;

/// An alert the detector wants raised; the ledger assigns id, date and status.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: AlertType,
    pub message: String,
    pub related_id: Option<Id>,
}

/// Run every check for a freshly recorded `tx`.
///
/// `history` must already contain `tx`. Sales decrement the referenced
/// item's stock in `inventory`; the reference is assumed to resolve.
pub fn inspect(
    history: &[Transaction],
    tx: &Transaction,
    inventory: &mut [InventoryItem],
) -> Vec<Finding> {
    let mut findings = Vec::new();
    match tx.r#type {
        TxType::Expense => findings.extend(unusual_expense(history, tx)),
        TxType::Income => findings.extend(apply_sale(tx, inventory)),
    }
    findings
}

/// z-score of `tx.amount` against every expense amount in `history`.
pub fn unusual_expense(history: &[Transaction], tx: &Transaction) -> Option<Finding> {
    if tx.r#type != TxType::Expense {
        return None;
    }
    let amounts: Vec<f64> = history
        .iter()
        .filter(|t| t.r#type == TxType::Expense)
        .map(Transaction::amount_f64)
        .collect();
    if amounts.len() <= MIN_EXPENSE_SAMPLES {
        debug!(samples = amounts.len(), "not enough expenses for z-score");
        return None;
    }
    let z = z_score(tx.amount_f64(), &amounts);
    debug!(tx = tx.id, z, "expense z-score");
    if z.abs() <= Z_THRESHOLD {
        return None;
    }
    Some(Finding {
        kind: AlertType::UnusualExpense,
        message: format!(
            "Unusual expense: '{}' ({}) is {:.1} standard deviations from the average expense",
            tx.description,
            tx.amount.round_dp(2),
            z
        ),
        related_id: Some(tx.id),
    })
}

/// Decrement stock for a sale and report a downward threshold crossing.
pub fn apply_sale(tx: &Transaction, inventory: &mut [InventoryItem]) -> Option<Finding> {
    let (product_id, quantity) = match (tx.r#type, tx.product_id, tx.quantity) {
        (TxType::Income, Some(p), Some(q)) => (p, q),
        _ => return None,
    };
    let Some(item) = inventory.iter_mut().find(|i| i.id == product_id) else {
        warn!(tx = tx.id, product_id, "sale references unknown product, stock untouched");
        return None;
    };
    let before = item.stock;
    item.stock -= i64::from(quantity);
    let after = item.stock;
    debug!(product = %item.name, before, after, "stock decremented");

    if before > item.low_stock_threshold && after <= item.low_stock_threshold {
        Some(Finding {
            kind: AlertType::LowStock,
            message: format!(
                "Low stock: '{}' has {} left (threshold {})",
                item.name, after, item.low_stock_threshold
            ),
            related_id: Some(item.id),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn expense(id: Id, amount: i64) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: format!("Expense {}", id),
            amount: Decimal::from(amount),
            r#type: TxType::Expense,
            category: "Supplies".into(),
            product_id: None,
            quantity: None,
        }
    }

    fn sale(id: Id, product_id: Id, quantity: u32) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "Sale".into(),
            amount: Decimal::from(quantity),
            r#type: TxType::Income,
            category: "Sales".into(),
            product_id: Some(product_id),
            quantity: Some(quantity),
        }
    }

    fn item(stock: i64, threshold: i64) -> InventoryItem {
        InventoryItem {
            id: 1,
            name: "Mug".into(),
            stock,
            low_stock_threshold: threshold,
            price: Decimal::ONE,
        }
    }

    #[test]
    fn outlier_needs_more_than_five_samples() {
        let mut history: Vec<Transaction> = (1..=4).map(|i| expense(i, 10)).collect();
        history.push(expense(5, 5000));
        assert!(unusual_expense(&history, &history[4]).is_none());
    }

    #[test]
    fn outlier_flagged_once_population_is_large_enough() {
        let mut history: Vec<Transaction> = (1..=7).map(|i| expense(i, 10)).collect();
        history.push(expense(8, 1000));
        let finding = unusual_expense(&history, &history[7]).unwrap();
        assert_eq!(finding.kind, AlertType::UnusualExpense);
        assert_eq!(finding.related_id, Some(8));
    }

    #[test]
    fn income_never_checked_as_expense() {
        let history: Vec<Transaction> = (1..=8).map(|i| expense(i, 10)).collect();
        let mut inv = vec![item(50, 5)];
        assert!(inspect(&history, &sale(9, 1, 1), &mut inv).is_empty());
        assert_eq!(inv[0].stock, 49);
    }

    #[test]
    fn low_stock_is_edge_triggered() {
        let mut inv = vec![item(12, 10)];
        assert!(apply_sale(&sale(1, 1, 3), &mut inv).is_some());
        assert_eq!(inv[0].stock, 9);
        assert!(apply_sale(&sale(2, 1, 1), &mut inv).is_none());
        assert_eq!(inv[0].stock, 8);
    }

    #[test]
    fn landing_exactly_on_threshold_alerts() {
        let mut inv = vec![item(11, 10)];
        assert!(apply_sale(&sale(1, 1, 1), &mut inv).is_some());
    }

    #[test]
    fn oversold_stock_goes_negative() {
        let mut inv = vec![item(2, 0)];
        let finding = apply_sale(&sale(1, 1, 5), &mut inv).unwrap();
        assert_eq!(inv[0].stock, -3);
        assert_eq!(finding.related_id, Some(1));
    }

    #[test]
    fn unknown_product_leaves_inventory_alone() {
        let mut inv = vec![item(12, 10)];
        assert!(apply_sale(&sale(1, 99, 5), &mut inv).is_none());
        assert_eq!(inv[0].stock, 12);
    }
}
