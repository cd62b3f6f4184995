// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger store: sole owner of transactions, inventory and alerts.
//!
//! Every mutation is staged on a copy of the current snapshot, persisted,
//! and only then swapped in. A failed save leaves memory untouched.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analytics::{self, CashFlowProjection, DemandTrend, Summary};
use crate::detector;
use crate::error::{LedgerError, Result};
use crate::models::{
    Alert, AlertStatus, AlertType, Id, InventoryItem, MAX_AMOUNT, SALES_CATEGORY, Transaction,
    TransactionInput, TxType,
};
use crate::notify::{LogNotifier, Notifier, Severity};
use crate::store::{ALERTS_KEY, INVENTORY_KEY, SEQUENCE_KEY, SnapshotStore, TRANSACTIONS_KEY};

/// All three collections, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub inventory: Vec<InventoryItem>,
    pub alerts: Vec<Alert>,
}

/// How bulk-imported transactions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Same path as `record_transaction`: detector runs, stock moves.
    Validated,
    /// Rows are validated and appended without detection or stock changes.
    /// Sale amounts are not checked against today's price.
    SkipDetection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub price: Decimal,
}

#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    transactions: bool,
    inventory: bool,
    alerts: bool,
    sequence: bool,
}

/// Working copy of the ledger state for one mutation.
struct Staged {
    state: Snapshot,
    next_id: Id,
    raised: Vec<Alert>,
    dirty: Dirty,
}

impl Staged {
    fn alloc(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        self.dirty.sequence = true;
        id
    }
}

pub struct Ledger<S: SnapshotStore> {
    store: S,
    notifier: Box<dyn Notifier>,
    clock: fn() -> NaiveDate,
    state: Snapshot,
    next_id: Id,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

fn load_vec<T: serde::de::DeserializeOwned>(store: &impl SnapshotStore, key: &str) -> Result<Vec<T>> {
    match store.load(key)? {
        Some(v) => Ok(serde_json::from_value(v)?),
        None => Ok(Vec::new()),
    }
}

impl<S: SnapshotStore> Ledger<S> {
    /// Load all collections from `store`.
    pub fn open(store: S) -> Result<Self> {
        let state = Snapshot {
            transactions: load_vec(&store, TRANSACTIONS_KEY)?,
            inventory: load_vec(&store, INVENTORY_KEY)?,
            alerts: load_vec(&store, ALERTS_KEY)?,
        };
        let max_seen = state
            .transactions
            .iter()
            .map(|t| t.id)
            .chain(state.inventory.iter().map(|i| i.id))
            .chain(state.alerts.iter().map(|a| a.id))
            .max()
            .unwrap_or(0);
        let stored_seq = match store.load(SEQUENCE_KEY)? {
            Some(v) => serde_json::from_value::<Id>(v)?,
            None => 1,
        };
        let next_id = stored_seq.max(max_seen + 1);
        debug!(
            transactions = state.transactions.len(),
            inventory = state.inventory.len(),
            alerts = state.alerts.len(),
            next_id,
            "ledger loaded"
        );
        Ok(Self {
            store,
            notifier: Box::new(LogNotifier),
            clock: utc_today,
            state,
            next_id,
        })
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Override how "today" is determined (defaults to the UTC calendar day).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn get_inventory(&self) -> &[InventoryItem] {
        &self.state.inventory
    }

    pub fn get_alerts(&self) -> &[Alert] {
        &self.state.alerts
    }

    pub fn find_item(&self, id: Id) -> Option<&InventoryItem> {
        self.state.inventory.iter().find(|i| i.id == id)
    }

    /// Case-insensitive exact name lookup.
    pub fn find_item_by_name(&self, name: &str) -> Option<&InventoryItem> {
        let name = name.trim();
        self.state
            .inventory
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    fn stage(&self) -> Staged {
        Staged {
            state: self.state.clone(),
            next_id: self.next_id,
            raised: Vec::new(),
            dirty: Dirty::default(),
        }
    }

    fn commit(&mut self, staged: Staged) -> Result<()> {
        let Staged {
            state,
            next_id,
            raised,
            dirty,
        } = staged;
        let mut entries: Vec<(&str, Value)> = Vec::new();
        if dirty.transactions {
            entries.push((TRANSACTIONS_KEY, serde_json::to_value(&state.transactions)?));
        }
        if dirty.inventory {
            entries.push((INVENTORY_KEY, serde_json::to_value(&state.inventory)?));
        }
        if dirty.alerts {
            entries.push((ALERTS_KEY, serde_json::to_value(&state.alerts)?));
        }
        if dirty.sequence {
            entries.push((SEQUENCE_KEY, serde_json::to_value(next_id)?));
        }
        if !entries.is_empty() {
            self.store.save_all(&entries)?;
        }
        self.state = state;
        self.next_id = next_id;

        for alert in &raised {
            let (title, severity) = match alert.r#type {
                AlertType::LowStock => ("Low stock", Severity::Warning),
                AlertType::UnusualExpense => ("Unusual expense", Severity::Error),
                AlertType::DuplicateEntry => ("Possible duplicate", Severity::Info),
            };
            if let Err(e) = self.notifier.notify(title, &alert.message, severity) {
                warn!(alert = alert.id, error = %e, "notification failed");
            }
        }
        Ok(())
    }

    /// Validate, append (newest first) and run the anomaly detector.
    pub fn record_transaction(&mut self, input: TransactionInput) -> Result<Transaction> {
        let mut staged = self.stage();
        let today = self.today();
        let tx = apply_record(&mut staged, today, input, ImportMode::Validated)?;
        self.commit(staged)?;
        info!(id = tx.id, kind = tx.r#type.as_str(), amount = %tx.amount, "transaction recorded");
        Ok(tx)
    }

    /// Point-of-sale checkout of `quantity` units at the item's current price.
    pub fn checkout(
        &mut self,
        product_id: Id,
        quantity: u32,
        date: Option<NaiveDate>,
    ) -> Result<Transaction> {
        let item = self.find_item(product_id).ok_or_else(|| {
            LedgerError::ReferentialIntegrity(format!("product {} does not exist", product_id))
        })?;
        let mut input = TransactionInput::sale(item, quantity)?;
        input.date = date;
        self.record_transaction(input)
    }

    /// Replace an expense by id. Sales and other income cannot be edited.
    pub fn edit_transaction(&mut self, updated: Transaction) -> Result<Transaction> {
        let mut staged = self.stage();
        let slot = staged
            .state
            .transactions
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| {
                LedgerError::InvalidOperation(format!("transaction {} does not exist", updated.id))
            })?;
        if slot.r#type != TxType::Expense {
            return Err(LedgerError::InvalidOperation(format!(
                "transaction {} is income and cannot be edited",
                updated.id
            )));
        }
        if updated.r#type != TxType::Expense {
            return Err(LedgerError::InvalidOperation(
                "an expense cannot be turned into income".into(),
            ));
        }
        if updated.product_id.is_some() || updated.quantity.is_some() {
            return Err(LedgerError::Validation(
                "product and quantity are only allowed on sales".into(),
            ));
        }
        let description = require_text(&updated.description, "description")?;
        require_positive(updated.amount)?;
        let category = require_text(&updated.category, "category")?;

        *slot = Transaction {
            description,
            category,
            ..updated
        };
        let edited = slot.clone();
        staged.dirty.transactions = true;
        self.commit(staged)?;
        info!(id = edited.id, "transaction edited");
        Ok(edited)
    }

    /// Remove a transaction. Stock it consumed and alerts it raised stay as
    /// they are.
    pub fn delete_transaction(&mut self, id: Id) -> Result<Transaction> {
        let mut staged = self.stage();
        let pos = staged
            .state
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| {
                LedgerError::InvalidOperation(format!("transaction {} does not exist", id))
            })?;
        let removed = staged.state.transactions.remove(pos);
        staged.dirty.transactions = true;
        self.commit(staged)?;
        info!(id, "transaction deleted");
        Ok(removed)
    }

    /// Empty every collection. Ids keep counting up.
    pub fn clear_all(&mut self) -> Result<()> {
        let mut staged = self.stage();
        staged.state = Snapshot::default();
        staged.dirty = Dirty {
            transactions: true,
            inventory: true,
            alerts: true,
            sequence: false,
        };
        self.commit(staged)?;
        warn!("all ledger data cleared");
        Ok(())
    }

    pub fn set_alert_status(&mut self, id: Id, status: AlertStatus) -> Result<Alert> {
        let mut staged = self.stage();
        let alert = staged
            .state
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LedgerError::InvalidOperation(format!("alert {} does not exist", id)))?;
        alert.status = status;
        let updated = alert.clone();
        staged.dirty.alerts = true;
        self.commit(staged)?;
        debug!(id, status = %status, "alert status changed");
        Ok(updated)
    }

    pub fn add_inventory_item(&mut self, item: NewItem) -> Result<InventoryItem> {
        let mut added = self.import_inventory(vec![item])?;
        added
            .pop()
            .ok_or_else(|| LedgerError::InvalidOperation("no item added".into()))
    }

    /// Append inventory rows; all rows are validated before any is stored.
    pub fn import_inventory(&mut self, items: Vec<NewItem>) -> Result<Vec<InventoryItem>> {
        let mut staged = self.stage();
        let mut added = Vec::with_capacity(items.len());
        for item in items {
            let name = require_text(&item.name, "name")?;
            require_positive(item.price)?;
            if staged
                .state
                .inventory
                .iter()
                .any(|i| i.name.eq_ignore_ascii_case(&name))
            {
                return Err(LedgerError::Validation(format!(
                    "product '{}' already exists",
                    name
                )));
            }
            let created = InventoryItem {
                id: staged.alloc(),
                name,
                stock: item.stock,
                low_stock_threshold: item.low_stock_threshold,
                price: item.price,
            };
            staged.state.inventory.insert(0, created.clone());
            added.push(created);
        }
        staged.dirty.inventory = true;
        self.commit(staged)?;
        info!(count = added.len(), "inventory items added");
        Ok(added)
    }

    /// Bulk insert. Either every row is stored or none is.
    pub fn import_transactions(
        &mut self,
        inputs: Vec<TransactionInput>,
        mode: ImportMode,
    ) -> Result<Vec<Transaction>> {
        let mut staged = self.stage();
        let today = self.today();
        let mut created = Vec::with_capacity(inputs.len());
        for (row, input) in inputs.into_iter().enumerate() {
            let tx = apply_record(&mut staged, today, input, mode).map_err(|e| match e {
                LedgerError::Validation(m) => LedgerError::Validation(format!("row {}: {}", row + 1, m)),
                LedgerError::ReferentialIntegrity(m) => {
                    LedgerError::ReferentialIntegrity(format!("row {}: {}", row + 1, m))
                }
                other => other,
            })?;
            created.push(tx);
        }
        self.commit(staged)?;
        info!(count = created.len(), ?mode, "transactions imported");
        Ok(created)
    }

    pub fn compute_demand_trend(&self) -> Vec<DemandTrend> {
        analytics::demand_trend(&self.state.transactions, &self.state.inventory)
    }

    /// `None` when there is not enough history to project.
    pub fn compute_cash_flow_projection(
        &self,
        horizon_days: u32,
        window_days: u32,
    ) -> Result<Option<CashFlowProjection>> {
        if horizon_days == 0 || window_days == 0 {
            return Err(LedgerError::Validation(
                "horizon and window must be at least one day".into(),
            ));
        }
        Ok(analytics::cash_flow_projection(
            &self.state.transactions,
            self.today(),
            horizon_days,
            window_days,
        ))
    }

    pub fn summary(&self) -> Summary {
        analytics::summary(
            &self.state.transactions,
            &self.state.inventory,
            &self.state.alerts,
        )
    }
}

fn require_text(value: &str, field: &str) -> Result<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(LedgerError::Validation(format!("{} is required", field)));
    }
    Ok(v.to_string())
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(LedgerError::Validation(format!(
            "amount {} exceeds the limit of {}",
            amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Validate `input` against the staged inventory and append it.
fn apply_record(
    staged: &mut Staged,
    today: NaiveDate,
    input: TransactionInput,
    mode: ImportMode,
) -> Result<Transaction> {
    let description = require_text(&input.description, "description")?;
    require_positive(input.amount)?;
    if input.quantity == Some(0) {
        return Err(LedgerError::Validation("quantity must be at least 1".into()));
    }

    let category = match (input.r#type, input.product_id) {
        (TxType::Expense, _) => {
            if input.product_id.is_some() || input.quantity.is_some() {
                return Err(LedgerError::Validation(
                    "product and quantity are only allowed on sales".into(),
                ));
            }
            require_text(input.category.as_deref().unwrap_or(""), "category")?
        }
        (TxType::Income, Some(pid)) => {
            let quantity = input.quantity.ok_or_else(|| {
                LedgerError::Validation("a sale needs a quantity".into())
            })?;
            let item = staged
                .state
                .inventory
                .iter()
                .find(|i| i.id == pid)
                .ok_or_else(|| {
                    LedgerError::ReferentialIntegrity(format!("product {} does not exist", pid))
                })?;
            let expected = item
                .price
                .checked_mul(Decimal::from(quantity))
                .ok_or_else(|| LedgerError::Validation("sale total is too large".into()))?;
            if mode == ImportMode::Validated && input.amount != expected {
                return Err(LedgerError::Validation(format!(
                    "sale amount {} does not match {} x {} = {}",
                    input.amount, quantity, item.price, expected
                )));
            }
            SALES_CATEGORY.to_string()
        }
        (TxType::Income, None) => {
            if input.quantity.is_some() {
                return Err(LedgerError::Validation(
                    "quantity is only allowed on sales".into(),
                ));
            }
            input
                .category
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        }
    };

    let tx = Transaction {
        id: staged.alloc(),
        date: input.date.unwrap_or(today),
        description,
        amount: input.amount,
        r#type: input.r#type,
        category,
        product_id: input.product_id,
        quantity: input.quantity,
    };
    staged.state.transactions.insert(0, tx.clone());
    staged.dirty.transactions = true;

    if mode == ImportMode::SkipDetection {
        return Ok(tx);
    }

    let findings = detector::inspect(&staged.state.transactions, &tx, &mut staged.state.inventory);
    if tx.is_sale() {
        staged.dirty.inventory = true;
    }
    for finding in findings {
        let alert = Alert {
            id: staged.alloc(),
            r#type: finding.kind,
            message: finding.message,
            date: today,
            status: AlertStatus::New,
            related_id: finding.related_id,
        };
        debug!(alert = alert.id, kind = alert.r#type.as_str(), "alert raised");
        staged.state.alerts.insert(0, alert.clone());
        staged.raised.push(alert);
        staged.dirty.alerts = true;
    }
    Ok(tx)
}
