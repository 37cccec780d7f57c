// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Half-open `[start, end)`; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    pub fn since(start: NaiveDateTime) -> Self {
        Self::new(Some(start), None)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at < e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub is_income: Option<bool>,
    pub range: Option<DateRange>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn income(mut self) -> Self {
        self.is_income = Some(true);
        self
    }

    pub fn expenses(mut self) -> Self {
        self.is_income = Some(false);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.category.as_deref().is_none_or(|c| tx.category == c)
            && self.is_income.is_none_or(|i| tx.is_income == i)
            && self.range.is_none_or(|r| r.contains(tx.date))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAscending,
    DateDescending,
    AmountDescending,
}

/// The flat set of transactions, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLedger {
    transactions: HashMap<String, Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self> {
        let mut ledger = Self::new();
        for tx in transactions {
            ledger.add(tx)?;
        }
        Ok(ledger)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> + Clone {
        self.transactions.values()
    }

    pub fn add(&mut self, tx: Transaction) -> Result<()> {
        tx.validate()?;
        if self.transactions.contains_key(&tx.id) {
            return Err(Error::DuplicateId(tx.id));
        }
        self.transactions.insert(tx.id.clone(), tx);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Transaction> {
        self.transactions
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Swaps in an edited transaction. The replacement must carry `id`;
    /// a mismatch is rejected and the ledger is left untouched.
    pub fn replace(&mut self, id: &str, tx: Transaction) -> Result<Transaction> {
        tx.validate()?;
        if tx.id != id {
            return Err(Error::IdMismatch {
                expected: id.to_string(),
                found: tx.id,
            });
        }
        match self.transactions.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, tx)),
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    /// Lazily yields matching transactions in no particular order. The
    /// iterator is `Clone`, so it can be restarted.
    pub fn filter<'a, 'f>(
        &'a self,
        filter: &'f TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + Clone + use<'a, 'f> {
        self.transactions.values().filter(move |tx| filter.matches(tx))
    }

    pub fn filter_sorted(&self, filter: &TransactionFilter, key: SortKey) -> Vec<&Transaction> {
        let mut out: Vec<&Transaction> = self.filter(filter).collect();
        match key {
            SortKey::DateAscending => out.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id))),
            SortKey::DateDescending => {
                out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)))
            }
            SortKey::AmountDescending => {
                out.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.id.cmp(&b.id)))
            }
        }
        out
    }

    pub fn category_total(&self, category: &str, exclude_income: bool) -> Decimal {
        self.transactions
            .values()
            .filter(|tx| tx.category == category && !(exclude_income && tx.is_income))
            .map(|tx| tx.amount)
            .sum()
    }
}
