// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fire-and-forget notification sink for newly raised alerts.

use std::fmt;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Receives a message whenever the ledger creates an alert.
///
/// Errors are reported back to the ledger only so they can be logged; they
/// never fail the mutation that produced the alert.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) -> Result<()>;
}

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) -> Result<()> {
        match severity {
            Severity::Info => info!(title, "{}", message),
            Severity::Warning => warn!(title, "{}", message),
            Severity::Error => error!(title, "{}", message),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str, _severity: Severity) -> Result<()> {
        Ok(())
    }
}
