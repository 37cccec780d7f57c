// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod sync;
pub mod transactions;
pub mod wages;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::books::Books;
use crate::db::SqliteStore;
use crate::settings::Settings;
use crate::store::{self, Store, SyncOp};
use crate::utils::{now_local, parse_timestamp};

/// Services shared by the command handlers, built once by `main`.
pub struct App {
    pub store: SqliteStore,
    pub settings: Settings,
    pub books: Books,
}

impl App {
    /// Loads settings and the current snapshot from `store`.
    pub fn load(store: SqliteStore) -> Result<Self> {
        let settings = Settings::load(&store).context("Load settings")?;
        let books = Books::from_snapshot(
            store.load_transactions()?,
            store.load_wage_history()?,
            settings.engine_options(),
        )
        .context("Load ledger snapshot")?;
        Ok(Self {
            store,
            settings,
            books,
        })
    }

    /// Persists a write locally, queueing it for the remote when one is configured.
    pub fn commit(&self, op: SyncOp) -> Result<()> {
        if self.settings.remote_url.is_some() {
            store::record(&self.store, &self.store, op)?;
        } else {
            debug!("no remote configured, {} stays local", op.describe());
            op.apply(&self.store)?;
        }
        Ok(())
    }
}

/// `--at`-style argument, defaulting to the current local time.
pub fn reference_instant(sub: &clap::ArgMatches, name: &str) -> Result<NaiveDateTime> {
    match sub.get_one::<String>(name) {
        Some(raw) => Ok(parse_timestamp(raw)?),
        None => Ok(now_local()),
    }
}
