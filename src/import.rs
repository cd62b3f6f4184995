// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV rows to strict ledger inputs. All string coercion happens here so the
//! ledger only ever sees typed values.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LedgerError, Result};
use crate::ledger::NewItem;
use crate::models::{InventoryItem, SALES_CATEGORY, TransactionInput, TxType};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TransactionRow {
    date: String,
    description: String,
    amount: String,
    r#type: String,
    category: String,
    product: String,
    quantity: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InventoryRow {
    name: String,
    stock: String,
    threshold: String,
    price: String,
}

fn row_err(row: usize, msg: impl std::fmt::Display) -> LedgerError {
    LedgerError::Validation(format!("row {}: {}", row, msg))
}

/// Parse a money string, tolerating a currency symbol and thousands
/// separators. The sign is returned separately from the magnitude.
pub fn coerce_amount(raw: &str) -> Result<(Decimal, bool)> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    let value = cleaned
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Validation(format!("Invalid amount '{}'", raw.trim())))?;
    Ok((value.abs(), value.is_sign_negative() && !value.is_zero()))
}

/// `income`/`sale` and `expense` are recognised; a blank value follows the
/// amount's sign and anything else is treated as an expense.
pub fn coerce_type(raw: &str, negative: bool) -> TxType {
    match raw.trim().to_ascii_lowercase().as_str() {
        "income" | "sale" | "sales" => TxType::Income,
        "expense" => TxType::Expense,
        "" if !negative => TxType::Income,
        _ => TxType::Expense,
    }
}

pub fn coerce_date(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

fn coerce_int<T: std::str::FromStr>(raw: &str, field: &str) -> Result<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| LedgerError::Validation(format!("Invalid {} '{}'", field, raw)))
}

/// Resolve a product column by numeric id or case-insensitive name.
fn resolve_product(raw: &str, inventory: &[InventoryItem]) -> Result<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let by_id = raw
        .parse::<i64>()
        .ok()
        .and_then(|id| inventory.iter().find(|i| i.id == id));
    let found = by_id.or_else(|| inventory.iter().find(|i| i.name.eq_ignore_ascii_case(raw)));
    match found {
        Some(item) => Ok(Some(item.id)),
        None => Err(LedgerError::ReferentialIntegrity(format!(
            "product '{}' does not exist",
            raw
        ))),
    }
}

/// Read `date,description,amount,type,category,product,quantity` rows.
pub fn parse_transactions<R: Read>(
    reader: R,
    inventory: &[InventoryItem],
    today: NaiveDate,
) -> Result<Vec<TransactionInput>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut inputs = Vec::new();
    for (idx, rec) in rdr.deserialize::<TransactionRow>().enumerate() {
        let row = idx + 1;
        let rec = rec.map_err(|e| row_err(row, e))?;
        let (amount, negative) = coerce_amount(&rec.amount).map_err(|e| row_err(row, e))?;
        let product_id = resolve_product(&rec.product, inventory).map_err(|e| match e {
            LedgerError::ReferentialIntegrity(m) => {
                LedgerError::ReferentialIntegrity(format!("row {}: {}", row, m))
            }
            other => other,
        })?;
        let r#type = if product_id.is_some() && rec.r#type.trim().is_empty() {
            TxType::Income
        } else {
            coerce_type(&rec.r#type, negative)
        };
        let category = match (r#type, product_id) {
            (TxType::Income, Some(_)) => Some(SALES_CATEGORY.to_string()),
            _ => Some(rec.category.trim().to_string()).filter(|c| !c.is_empty()),
        };
        inputs.push(TransactionInput {
            date: Some(coerce_date(&rec.date, today).map_err(|e| row_err(row, e))?),
            description: rec.description.trim().to_string(),
            amount,
            r#type,
            category,
            product_id,
            quantity: coerce_int::<u32>(&rec.quantity, "quantity").map_err(|e| row_err(row, e))?,
        });
    }
    Ok(inputs)
}

/// Read `name,stock,threshold,price` rows. Blank stock or threshold is 0.
pub fn parse_inventory<R: Read>(reader: R) -> Result<Vec<NewItem>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut items = Vec::new();
    for (idx, rec) in rdr.deserialize::<InventoryRow>().enumerate() {
        let row = idx + 1;
        let rec = rec.map_err(|e| row_err(row, e))?;
        let (price, _) = coerce_amount(&rec.price).map_err(|e| row_err(row, e))?;
        items.push(NewItem {
            name: rec.name.trim().to_string(),
            stock: coerce_int::<i64>(&rec.stock, "stock")
                .map_err(|e| row_err(row, e))?
                .unwrap_or(0),
            low_stock_threshold: coerce_int::<i64>(&rec.threshold, "threshold")
                .map_err(|e| row_err(row, e))?
                .unwrap_or(0),
            price,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn widget() -> InventoryItem {
        InventoryItem {
            id: 7,
            name: "Widget".into(),
            stock: 10,
            low_stock_threshold: 2,
            price: Decimal::new(250, 2),
        }
    }

    #[test]
    fn amount_strips_symbols_and_reports_sign() {
        assert_eq!(coerce_amount(" $1,250.50 ").unwrap(), (Decimal::new(125050, 2), false));
        assert_eq!(coerce_amount("-12").unwrap(), (Decimal::from(12), true));
        assert!(coerce_amount("twelve").is_err());
    }

    #[test]
    fn type_defaults() {
        assert_eq!(coerce_type("INCOME", true), TxType::Income);
        assert_eq!(coerce_type("", false), TxType::Income);
        assert_eq!(coerce_type("", true), TxType::Expense);
        assert_eq!(coerce_type("refund?", false), TxType::Expense);
    }

    #[test]
    fn rows_become_typed_inputs() {
        let csv = "date,description,amount,type,category,product,quantity\n\
                   2025-06-01, Rent ,-900,,Premises,,\n\
                   ,Widget sale,5.00,,,widget,2\n";
        let rows = parse_transactions(csv.as_bytes(), &[widget()], today()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].r#type, TxType::Expense);
        assert_eq!(rows[0].description, "Rent");
        assert_eq!(rows[0].amount, Decimal::from(900));
        assert_eq!(rows[0].category.as_deref(), Some("Premises"));
        assert_eq!(rows[1].r#type, TxType::Income);
        assert_eq!(rows[1].date, Some(today()));
        assert_eq!(rows[1].product_id, Some(7));
        assert_eq!(rows[1].quantity, Some(2));
        assert_eq!(rows[1].category.as_deref(), Some("Sales"));
    }

    #[test]
    fn unknown_product_is_rejected_with_row() {
        let csv = "date,description,amount,type,category,product,quantity\n\
                   2025-06-01,Gizmo,5,income,,gizmo,1\n";
        let err = parse_transactions(csv.as_bytes(), &[widget()], today()).unwrap_err();
        assert!(matches!(err, LedgerError::ReferentialIntegrity(ref m) if m.contains("row 1")));
    }

    #[test]
    fn bad_date_is_validation_error() {
        let csv = "date,description,amount,type,category,product,quantity\n\
                   2025-13-01,Paper,5,expense,Office,,\n";
        let err = parse_transactions(csv.as_bytes(), &[], today()).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn inventory_rows_default_blank_numbers() {
        let csv = "name,stock,threshold,price\nMug,12,,4.50\n";
        let items = parse_inventory(csv.as_bytes()).unwrap();
        assert_eq!(items[0].stock, 12);
        assert_eq!(items[0].low_stock_threshold, 0);
        assert_eq!(items[0].price, Decimal::new(450, 2));
    }
}
