// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Change notifications emitted by [`crate::books::Books`] after a mutation
//! has been fully applied.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    TransactionAdded { id: String },
    TransactionRemoved { id: String },
    TransactionReplaced { id: String },
    /// A wage record was inserted; `closed` lists the records it ended.
    WageInserted { id: String, closed: Vec<String> },
    SnapshotLoaded,
}

/// Receives change events. Must not block; consumers re-query the books.
pub trait ChangeSink: Send + Sync {
    fn emit(&self, event: &ChangeEvent);
}

impl<F> ChangeSink for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn emit(&self, event: &ChangeEvent) {
        self(event)
    }
}

#[derive(Clone, Default)]
pub struct NoopSink;

impl ChangeSink for NoopSink {
    fn emit(&self, _event: &ChangeEvent) {}
}

/// Keeps every event it sees; handy for presentation tests.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl ChangeSink for RecordingSink {
    fn emit(&self, event: &ChangeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
