// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub type Id = i64;

/// Category forced onto every product sale.
pub const SALES_CATEGORY: &str = "Sales";

/// Largest accepted amount or unit price, in whole currency units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(LedgerError::Validation(format!(
                "Invalid transaction type '{}', expected income or expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl Transaction {
    /// Income carrying a product reference, i.e. a point-of-sale line.
    pub fn is_sale(&self) -> bool {
        self.r#type == TxType::Income && self.product_id.is_some()
    }

    pub fn amount_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or_default()
    }

    /// Amount with income positive and expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TxType::Income => self.amount,
            TxType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Id,
    pub name: String,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    UnusualExpense,
    DuplicateEntry,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "low_stock",
            AlertType::UnusualExpense => "unusual_expense",
            AlertType::DuplicateEntry => "duplicate_entry",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Ignored,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "new",
            AlertStatus::Ignored => "ignored",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(AlertStatus::New),
            "ignored" => Ok(AlertStatus::Ignored),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(LedgerError::Validation(format!(
                "Invalid alert status '{}', expected new, ignored or resolved",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Id,
    pub r#type: AlertType,
    pub message: String,
    pub date: NaiveDate,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<Id>,
}

/// Caller-assembled request for a new transaction. Identity is assigned
/// by the ledger; a missing date means "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TxType,
    pub category: Option<String>,
    pub product_id: Option<Id>,
    pub quantity: Option<u32>,
}

impl TransactionInput {
    pub fn expense(description: &str, amount: Decimal, category: &str) -> Self {
        Self {
            date: None,
            description: description.to_string(),
            amount,
            r#type: TxType::Expense,
            category: Some(category.to_string()),
            product_id: None,
            quantity: None,
        }
    }

    pub fn income(description: &str, amount: Decimal) -> Self {
        Self {
            date: None,
            description: description.to_string(),
            amount,
            r#type: TxType::Income,
            category: None,
            product_id: None,
            quantity: None,
        }
    }

    /// Point-of-sale line for `quantity` units of `item` at its current price.
    pub fn sale(item: &InventoryItem, quantity: u32) -> Result<Self, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::Validation(
                "Sale quantity must be at least 1".into(),
            ));
        }
        let amount = item
            .price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| LedgerError::Validation("Sale total is too large".into()))?;
        Ok(Self {
            date: None,
            description: format!("Sale: {} x{}", item.name, quantity),
            amount,
            r#type: TxType::Income,
            category: Some(SALES_CATEGORY.to_string()),
            product_id: Some(item.id),
            quantity: Some(quantity),
        })
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
