// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod cli;
pub mod commands;
pub mod db;
pub mod detector;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod stats;
pub mod store;
pub mod utils;

pub use error::{LedgerError, Result};
pub use ledger::{ImportMode, Ledger, NewItem, Snapshot};
