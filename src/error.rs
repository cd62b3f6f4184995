// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Errors raised by the ledger engine.
///
/// Every variant is a synchronous failure of the call that produced it;
/// nothing is retried and no partial mutation is left behind.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Missing or malformed required fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not permitted on the target record (editing a sale,
    /// unknown id, ...).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A product reference that does not resolve to an inventory item.
    #[error("Unknown product: {0}")]
    ReferentialIntegrity(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
