// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, RwLock};

use crate::engine::{AggregationEngine, EngineOptions};
use crate::error::{Error, Result};
use crate::events::{ChangeEvent, ChangeSink};
use crate::ledger::TransactionLedger;
use crate::models::{Transaction, WageRecord};
use crate::wage::WageTimeline;

/// Owns one ledger and one wage timeline.
///
/// Every mutation holds the relevant write lock for its whole body, so
/// queries never see a half-applied wage insert. Locks are always taken
/// ledger first, then wages.
pub struct Books {
    ledger: RwLock<TransactionLedger>,
    wages: RwLock<WageTimeline>,
    sinks: RwLock<Vec<Arc<dyn ChangeSink>>>,
    options: EngineOptions,
}

impl Books {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            ledger: RwLock::new(TransactionLedger::new()),
            wages: RwLock::new(WageTimeline::new()),
            sinks: RwLock::new(Vec::new()),
            options,
        }
    }

    pub fn from_snapshot(
        transactions: Vec<Transaction>,
        wages: Vec<WageRecord>,
        options: EngineOptions,
    ) -> Result<Self> {
        let books = Self::new(options);
        books.load_snapshot(transactions, wages)?;
        Ok(books)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn subscribe(&self, sink: Arc<dyn ChangeSink>) -> Result<()> {
        self.sinks
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .push(sink);
        Ok(())
    }

    /// Replaces both collections with a freshly loaded snapshot.
    pub fn load_snapshot(&self, transactions: Vec<Transaction>, wages: Vec<WageRecord>) -> Result<()> {
        let ledger = TransactionLedger::from_transactions(transactions)?;
        let timeline = WageTimeline::from_records(wages);
        {
            let mut l = self.ledger.write().map_err(|_| Error::LockPoisoned)?;
            let mut w = self.wages.write().map_err(|_| Error::LockPoisoned)?;
            *l = ledger;
            *w = timeline;
        }
        self.emit(ChangeEvent::SnapshotLoaded);
        Ok(())
    }

    pub fn add_transaction(&self, tx: Transaction) -> Result<()> {
        let id = tx.id.clone();
        self.ledger
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .add(tx)?;
        self.emit(ChangeEvent::TransactionAdded { id });
        Ok(())
    }

    pub fn remove_transaction(&self, id: &str) -> Result<Transaction> {
        let removed = self
            .ledger
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .remove(id)?;
        self.emit(ChangeEvent::TransactionRemoved { id: id.to_string() });
        Ok(removed)
    }

    pub fn replace_transaction(&self, id: &str, tx: Transaction) -> Result<Transaction> {
        let previous = self
            .ledger
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .replace(id, tx)?;
        self.emit(ChangeEvent::TransactionReplaced { id: id.to_string() });
        Ok(previous)
    }

    /// Inserts a wage record; returns the records it closed so the caller can
    /// persist their new end dates alongside it.
    pub fn insert_wage(&self, record: WageRecord) -> Result<Vec<WageRecord>> {
        let id = record.id.clone();
        let closed = self
            .wages
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .insert(record)?;
        self.emit(ChangeEvent::WageInserted {
            id,
            closed: closed.iter().map(|r| r.id.clone()).collect(),
        });
        Ok(closed)
    }

    /// Runs `f` against a consistent view of the books.
    pub fn read<R>(&self, f: impl FnOnce(&AggregationEngine<'_>) -> R) -> Result<R> {
        let ledger = self.ledger.read().map_err(|_| Error::LockPoisoned)?;
        let wages = self.wages.read().map_err(|_| Error::LockPoisoned)?;
        let engine = AggregationEngine::with_options(&ledger, &wages, self.options.clone());
        Ok(f(&engine))
    }

    pub fn with_ledger<R>(&self, f: impl FnOnce(&TransactionLedger) -> R) -> Result<R> {
        let ledger = self.ledger.read().map_err(|_| Error::LockPoisoned)?;
        Ok(f(&ledger))
    }

    pub fn with_wages<R>(&self, f: impl FnOnce(&WageTimeline) -> R) -> Result<R> {
        let wages = self.wages.read().map_err(|_| Error::LockPoisoned)?;
        Ok(f(&wages))
    }

    fn emit(&self, event: ChangeEvent) {
        if let Ok(sinks) = self.sinks.read() {
            for sink in sinks.iter() {
                sink.emit(&event);
            }
        }
    }
}
