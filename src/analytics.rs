// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only views derived from a ledger snapshot: per-product demand trend,
//! cash-flow projection and headline totals.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Alert, AlertStatus, Id, InventoryItem, Transaction, TxType};
use crate::stats::{linear_regression, moving_average};

pub const DEFAULT_HORIZON_DAYS: u32 = 90;
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MIN_PROJECTION_TRANSACTIONS: usize = 6;
/// Matched sales needed before a product gets a trend line.
pub const MIN_TREND_SALES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandTrend {
    pub product_id: Id,
    pub name: String,
    pub sales: usize,
    pub units_sold: f64,
    pub slope: f64,
    pub intercept: f64,
    pub declining: bool,
}

/// Fit sold quantity against days since first sale for every product with
/// enough matched sales, most declining first.
///
/// A transaction that carries a product id counts only for that product.
/// Older rows without one are matched when the product name appears in the
/// description, ignoring case.
pub fn demand_trend(transactions: &[Transaction], inventory: &[InventoryItem]) -> Vec<DemandTrend> {
    let mut trends = Vec::new();
    for item in inventory {
        let needle = item.name.trim().to_lowercase();
        let mut sales: Vec<(NaiveDate, f64)> = transactions
            .iter()
            .filter(|t| t.r#type == TxType::Income)
            .filter(|t| match t.product_id {
                Some(pid) => pid == item.id,
                None => !needle.is_empty() && t.description.to_lowercase().contains(&needle),
            })
            .map(|t| (t.date, sold_quantity(t, item)))
            .collect();
        if sales.len() < MIN_TREND_SALES {
            continue;
        }
        sales.sort_by_key(|(d, _)| *d);
        let first = sales[0].0;
        let points: Vec<(f64, f64)> = sales
            .iter()
            .map(|(d, q)| ((*d - first).num_days() as f64, *q))
            .collect();
        let fit = linear_regression(&points);
        trends.push(DemandTrend {
            product_id: item.id,
            name: item.name.clone(),
            sales: sales.len(),
            units_sold: sales.iter().map(|(_, q)| q).sum(),
            slope: fit.slope,
            intercept: fit.intercept,
            declining: fit.slope < 0.0,
        });
    }
    trends.sort_by(|a, b| {
        a.slope
            .partial_cmp(&b.slope)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    trends
}

/// Recorded quantity, or `round(amount / price)` (at least 1) when absent.
fn sold_quantity(tx: &Transaction, item: &InventoryItem) -> f64 {
    if let Some(q) = tx.quantity {
        return f64::from(q);
    }
    if item.price <= Decimal::ZERO {
        return 1.0;
    }
    let implied = tx
        .amount
        .checked_div(item.price)
        .map(|q| q.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|q| q.to_f64())
        .unwrap_or(1.0);
    implied.max(1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowProjection {
    pub current_balance: Decimal,
    pub daily_average: f64,
    pub window_days: u32,
    pub horizon_days: u32,
    pub points: Vec<ProjectionPoint>,
    pub negative_balance_warning: bool,
    pub first_negative: Option<NaiveDate>,
}

/// Extend the current balance by the trailing moving average of daily net
/// cash, held constant for every projected day.
///
/// The window covers `today - (window_days - 1) ..= today`; quiet days count
/// as zero. Returns `None` below [`MIN_PROJECTION_TRANSACTIONS`].
pub fn cash_flow_projection(
    transactions: &[Transaction],
    today: NaiveDate,
    horizon_days: u32,
    window_days: u32,
) -> Option<CashFlowProjection> {
    if transactions.len() < MIN_PROJECTION_TRANSACTIONS {
        return None;
    }
    let current_balance = transactions
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.signed_amount()));

    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in transactions {
        let day = daily.entry(t.date).or_insert(Decimal::ZERO);
        *day = day.saturating_add(t.signed_amount());
    }
    let window: Vec<f64> = (0..window_days)
        .rev()
        .map(|back| today - Duration::days(i64::from(back)))
        .map(|d| daily.get(&d).and_then(|v| v.to_f64()).unwrap_or(0.0))
        .collect();
    let daily_average = moving_average(&window);

    let mut running = current_balance.to_f64().unwrap_or_default();
    let mut points = Vec::with_capacity(horizon_days as usize);
    for day in 1..=horizon_days {
        running += daily_average;
        points.push(ProjectionPoint {
            date: today + Duration::days(i64::from(day)),
            balance: running,
        });
    }
    let first_negative = points.iter().find(|p| p.balance < 0.0).map(|p| p.date);

    Some(CashFlowProjection {
        current_balance,
        daily_average,
        window_days,
        horizon_days,
        points,
        negative_balance_warning: first_negative.is_some(),
        first_negative,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub products: usize,
    pub products_low: usize,
    pub alerts_new: usize,
    pub alerts_ignored: usize,
    pub alerts_resolved: usize,
}

pub fn summary(transactions: &[Transaction], inventory: &[InventoryItem], alerts: &[Alert]) -> Summary {
    let (mut income, mut expense) = (Decimal::ZERO, Decimal::ZERO);
    for t in transactions {
        match t.r#type {
            TxType::Income => income = income.saturating_add(t.amount),
            TxType::Expense => expense = expense.saturating_add(t.amount),
        }
    }
    let count = |s: AlertStatus| alerts.iter().filter(|a| a.status == s).count();
    Summary {
        transactions: transactions.len(),
        income,
        expense,
        balance: income.saturating_sub(expense),
        products: inventory.len(),
        products_low: inventory
            .iter()
            .filter(|i| i.stock <= i.low_stock_threshold)
            .count(),
        alerts_new: count(AlertStatus::New),
        alerts_ignored: count(AlertStatus::Ignored),
        alerts_resolved: count(AlertStatus::Resolved),
    }
}
