// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::SqliteStore;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.tillbook", "Tillbook", "tillbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tillbook.sqlite"))
}

/// Resolve the data file, honouring an explicit `--db` override.
pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(p) => Ok(PathBuf::from(p)),
        None => db_path(),
    }
}

pub fn open_at(path: &Path) -> Result<SqliteStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create data dir {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    let store = SqliteStore::new(conn)
        .with_context(|| format!("Initialize snapshot schema in {}", path.display()))?;
    Ok(store)
}
