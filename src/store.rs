// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable key/value snapshots, one JSON document per collection.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::debug;

use crate::error::{LedgerError, Result};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const INVENTORY_KEY: &str = "inventory";
pub const ALERTS_KEY: &str = "alerts";
pub const SEQUENCE_KEY: &str = "sequence";

pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Value>>;

    fn save(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Persist several keys as one unit. Implementations that can commit
    /// atomically should override this.
    fn save_all(&mut self, entries: &[(&str, Value)]) -> Result<()> {
        for (key, value) in entries {
            self.save(key, value)?;
        }
        Ok(())
    }
}

/// Snapshot table inside the application's SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS snapshots(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

fn upsert(conn: &Connection, key: &str, value: &Value) -> Result<()> {
    let body = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO snapshots(key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
        params![key, body],
    )
    .map_err(|e| LedgerError::Persistence(format!("save '{}': {}", key, e)))?;
    Ok(())
}

impl SnapshotStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| LedgerError::Persistence(format!("load '{}': {}", key, e)))?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        upsert(&self.conn, key, value)
    }

    fn save_all(&mut self, entries: &[(&str, Value)]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| LedgerError::Persistence(format!("begin: {}", e)))?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit()
            .map_err(|e| LedgerError::Persistence(format!("commit: {}", e)))?;
        debug!(keys = entries.len(), "snapshot committed");
        Ok(())
    }
}

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail, simulating a full disk.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        if self.fail_saves {
            return Err(LedgerError::Persistence(format!(
                "save '{}': store unavailable",
                key
            )));
        }
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn save_all(&mut self, entries: &[(&str, Value)]) -> Result<()> {
        if self.fail_saves {
            return Err(LedgerError::Persistence("store unavailable".into()));
        }
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sqlite_roundtrips_and_overwrites() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.load(ALERTS_KEY).unwrap().is_none());
        store.save(ALERTS_KEY, &json!([1, 2])).unwrap();
        store
            .save_all(&[(ALERTS_KEY, json!([3])), (SEQUENCE_KEY, json!(4))])
            .unwrap();
        assert_eq!(store.load(ALERTS_KEY).unwrap(), Some(json!([3])));
        assert_eq!(store.load(SEQUENCE_KEY).unwrap(), Some(json!(4)));
    }

    #[test]
    fn memory_store_can_refuse_writes() {
        let mut store = MemoryStore::new();
        store.fail_saves(true);
        let err = store.save(INVENTORY_KEY, &json!([])).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert!(store.get(INVENTORY_KEY).is_none());
    }
}
