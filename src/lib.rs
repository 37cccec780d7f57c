// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod books;
pub mod budget;
pub mod category;
pub mod cli;
pub mod commands;
pub mod db;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod remote;
pub mod settings;
pub mod store;
pub mod utils;
pub mod wage;

pub use books::Books;
pub use budget::{BudgetStatus, BudgetTracker, CategoryBudgets};
pub use engine::{AggregationEngine, EngineOptions, WeekMatching, format_work_hours};
pub use error::{Error, Result};
pub use ledger::{DateRange, SortKey, TransactionFilter, TransactionLedger};
pub use models::{AggregationQuery, Bucket, Timeframe, Totals, Transaction, WageRecord};
pub use wage::WageTimeline;
