// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The store interface shared by the local and remote backends, and the
//! outbox that carries local writes to the remote.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::budget::CategoryBudgets;
use crate::error::{Error, Result};
use crate::models::{Transaction, WageRecord};

pub trait Store {
    fn load_transactions(&self) -> Result<Vec<Transaction>>;
    fn load_wage_history(&self) -> Result<Vec<WageRecord>>;
    fn load_budgets(&self) -> Result<CategoryBudgets>;
    /// Inserts or overwrites by id.
    fn put_transaction(&self, tx: &Transaction) -> Result<()>;
    fn delete_transaction(&self, id: &str) -> Result<()>;
    fn put_wage_record(&self, record: &WageRecord) -> Result<()>;
    fn put_budget(&self, category: &str, amount: Decimal) -> Result<()>;
    fn delete_budget(&self, category: &str) -> Result<()>;
}

/// A store write, as queued for replication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncOp {
    PutTransaction { transaction: Transaction },
    DeleteTransaction { id: String },
    PutWageRecord { record: WageRecord },
    PutBudget { category: String, amount: Decimal },
    DeleteBudget { category: String },
}

impl SyncOp {
    pub fn apply(&self, store: &dyn Store) -> Result<()> {
        match self {
            SyncOp::PutTransaction { transaction } => store.put_transaction(transaction),
            SyncOp::DeleteTransaction { id } => store.delete_transaction(id),
            SyncOp::PutWageRecord { record } => store.put_wage_record(record),
            SyncOp::PutBudget { category, amount } => store.put_budget(category, *amount),
            SyncOp::DeleteBudget { category } => store.delete_budget(category),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SyncOp::PutTransaction { transaction } => format!("put transaction {}", transaction.id),
            SyncOp::DeleteTransaction { id } => format!("delete transaction {}", id),
            SyncOp::PutWageRecord { record } => format!("put wage {}", record.id),
            SyncOp::PutBudget { category, .. } => format!("put budget {}", category),
            SyncOp::DeleteBudget { category } => format!("delete budget {}", category),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub id: i64,
    pub op: SyncOp,
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// Persisted FIFO of writes awaiting replication.
pub trait Outbox {
    fn enqueue(&self, op: &SyncOp) -> Result<()>;
    /// Entries in insertion order.
    fn pending(&self) -> Result<Vec<OutboxEntry>>;
    fn ack(&self, id: i64) -> Result<()>;
    fn nack(&self, id: i64, error: &str) -> Result<()>;
}

/// Applies `op` to the local store, then queues it for the remote.
pub fn record(local: &dyn Store, outbox: &dyn Outbox, op: SyncOp) -> Result<()> {
    op.apply(local)?;
    outbox.enqueue(&op)
}

#[derive(Default)]
pub struct MemoryOutbox {
    inner: Mutex<(i64, VecDeque<OutboxEntry>)>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Outbox for MemoryOutbox {
    fn enqueue(&self, op: &SyncOp) -> Result<()> {
        let mut guard = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        guard.0 += 1;
        let id = guard.0;
        guard.1.push_back(OutboxEntry {
            id,
            op: op.clone(),
            attempts: 0,
            last_error: None,
        });
        Ok(())
    }

    fn pending(&self) -> Result<Vec<OutboxEntry>> {
        let guard = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        Ok(guard.1.iter().cloned().collect())
    }

    fn ack(&self, id: i64) -> Result<()> {
        let mut guard = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        guard.1.retain(|e| e.id != id);
        Ok(())
    }

    fn nack(&self, id: i64, error: &str) -> Result<()> {
        let mut guard = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        if let Some(e) = guard.1.iter_mut().find(|e| e.id == id) {
            e.attempts += 1;
            e.last_error = Some(error.to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub sent: usize,
    pub failed: usize,
    pub dead: usize,
}

/// Drains an outbox into a remote store.
pub struct Replicator {
    pub max_attempts: u32,
}

impl Replicator {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Sends pending entries in order. Stops at the first failure so later
    /// writes never overtake an earlier one; entries that have used up
    /// their attempts are skipped and counted as dead.
    pub fn flush(&self, outbox: &dyn Outbox, remote: &dyn Store) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        for entry in outbox.pending()? {
            if entry.attempts >= self.max_attempts {
                report.dead += 1;
                continue;
            }
            match entry.op.apply(remote) {
                Ok(()) => {
                    debug!("replicated {}", entry.op.describe());
                    outbox.ack(entry.id)?;
                    report.sent += 1;
                }
                Err(err) => {
                    warn!(
                        "replicating {} failed (attempt {}): {}",
                        entry.op.describe(),
                        entry.attempts + 1,
                        err
                    );
                    outbox.nack(entry.id, &err.to_string())?;
                    report.failed += 1;
                    break;
                }
            }
        }
        Ok(report)
    }
}
