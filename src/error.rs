// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

/// Errors returned by the ledger, the wage timeline, budgets and the stores.
///
/// Zero wages and zero budgets are not errors: `work_hours_cost` and
/// `percent_of_budget` resolve them by policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No transaction (or wage record, or budget) with this id exists.
    #[error("'{0}' not found")]
    NotFound(String),

    #[error("a transaction with id '{0}' already exists")]
    DuplicateId(String),

    /// `replace` was given a transaction that carries a different id.
    #[error("replacement id '{found}' does not match '{expected}'")]
    IdMismatch { expected: String, found: String },

    /// Amounts and wages must be strictly positive, budgets non-negative.
    #[error("invalid amount {0}")]
    InvalidAmount(Decimal),

    #[error("end {end} is not after start {start}")]
    InvalidRange { start: String, end: String },

    #[error("at most {cap} budget categories may be active")]
    BudgetCapExceeded { cap: usize },

    #[error("invalid timestamp '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]")]
    InvalidTimestamp(String),

    #[error("a lock guarding the books was poisoned")]
    LockPoisoned,

    #[error("invalid stored value: {0}")]
    InvalidRecord(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("remote store error: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid setting: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
