// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;

use crate::category::{CategorySet, DEFAULT_CATEGORIES};
use crate::db::SqliteStore;
use crate::engine::{EngineOptions, WeekMatching};
use crate::error::{Error, Result};

pub const KEY_CATEGORIES: &str = "categories";
pub const KEY_REMOTE_URL: &str = "remote_url";
pub const KEY_SYNC_MAX_ATTEMPTS: &str = "sync_max_attempts";
pub const KEY_WEEK_MATCHING: &str = "week_matching";

pub const KNOWN_KEYS: [&str; 4] = [
    KEY_CATEGORIES,
    KEY_REMOTE_URL,
    KEY_SYNC_MAX_ATTEMPTS,
    KEY_WEEK_MATCHING,
];

const DEFAULT_SYNC_MAX_ATTEMPTS: u32 = 5;

/// Runtime settings, stored as rows of the `settings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub categories: Vec<String>,
    pub remote_url: Option<String>,
    pub sync_max_attempts: u32,
    pub week_matching: WeekMatching,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            remote_url: None,
            sync_max_attempts: DEFAULT_SYNC_MAX_ATTEMPTS,
            week_matching: WeekMatching::default(),
        }
    }
}

impl Settings {
    pub fn load(store: &SqliteStore) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = store.get_setting(KEY_CATEGORIES)? {
            s.categories = split_categories(&v);
        }
        s.remote_url = store
            .get_setting(KEY_REMOTE_URL)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(v) = store.get_setting(KEY_SYNC_MAX_ATTEMPTS)? {
            s.sync_max_attempts = parse_attempts(&v)?;
        }
        if let Some(v) = store.get_setting(KEY_WEEK_MATCHING)? {
            s.week_matching = v.parse::<WeekMatching>()?;
        }
        Ok(s)
    }

    /// Validates and stores one setting.
    pub fn set(store: &SqliteStore, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            KEY_CATEGORIES => {
                let cats = split_categories(value);
                store.set_setting(key, &cats.join(","))
            }
            KEY_REMOTE_URL => store.set_setting(key, value),
            KEY_SYNC_MAX_ATTEMPTS => {
                parse_attempts(value)?;
                store.set_setting(key, value)
            }
            KEY_WEEK_MATCHING => {
                let m: WeekMatching = value.parse()?;
                store.set_setting(key, m.as_str())
            }
            other => Err(Error::Config(format!(
                "unknown setting '{}', expected one of {}",
                other,
                KNOWN_KEYS.join(", ")
            ))),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            categories: CategorySet::new(&self.categories),
            week_matching: self.week_matching,
        }
    }
}

fn split_categories(v: &str) -> Vec<String> {
    v.split(',')
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

fn parse_attempts(v: &str) -> Result<u32> {
    match v.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!(
            "{} must be a positive integer, got '{}'",
            KEY_SYNC_MAX_ATTEMPTS, v
        ))),
    }
}
