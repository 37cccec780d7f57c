// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::WageRecord;

/// History of hourly wages, each effective over `[start_date, end_date)`.
///
/// At most one record is open (no end date) when records only enter through
/// [`WageTimeline::insert`]. Closed records inserted with past dates are not
/// checked against existing intervals; [`WageTimeline::overlaps`] reports
/// any that collide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WageTimeline {
    records: Vec<WageRecord>,
}

impl WageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a stored history as-is, without applying the closing rule.
    pub fn from_records(records: Vec<WageRecord>) -> Self {
        let mut t = Self { records };
        t.sort();
        t
    }

    pub fn records(&self) -> &[WageRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a record. An open record first closes every currently open one at
    /// its own start date, so it must start after all of them. Returns the
    /// records whose end date was changed.
    pub fn insert(&mut self, record: WageRecord) -> Result<Vec<WageRecord>> {
        if record.hourly_wage <= Decimal::ZERO {
            return Err(Error::InvalidAmount(record.hourly_wage));
        }
        if let Some(end) = record.end_date {
            if end <= record.start_date {
                return Err(Error::InvalidRange {
                    start: record.start_date.to_string(),
                    end: end.to_string(),
                });
            }
        }

        let mut closed = Vec::new();
        if record.is_open() {
            if let Some(open) = self
                .records
                .iter()
                .find(|r| r.is_open() && r.start_date >= record.start_date)
            {
                return Err(Error::InvalidRange {
                    start: open.start_date.to_string(),
                    end: record.start_date.to_string(),
                });
            }
            for existing in self.records.iter_mut().filter(|r| r.is_open()) {
                existing.end_date = Some(record.start_date);
                closed.push(existing.clone());
            }
        }
        self.records.push(record);
        self.sort();
        Ok(closed)
    }

    /// Wage in effect at `at`. Falls back to the latest-starting record when
    /// no interval covers `at`, and to zero for an empty timeline.
    pub fn effective_wage(&self, at: NaiveDateTime) -> Decimal {
        self.records
            .iter()
            .filter(|r| r.contains(at))
            .max_by_key(|r| r.start_date)
            .or_else(|| self.latest())
            .map(|r| r.hourly_wage)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn current_wage(&self) -> Decimal {
        self.records
            .iter()
            .filter(|r| r.is_open())
            .max_by_key(|r| r.start_date)
            .or_else(|| self.latest())
            .map(|r| r.hourly_wage)
            .unwrap_or(Decimal::ZERO)
    }

    /// Pairs of records whose intervals intersect.
    pub fn overlaps(&self) -> Vec<(&WageRecord, &WageRecord)> {
        let mut out = Vec::new();
        for (i, a) in self.records.iter().enumerate() {
            for b in &self.records[i + 1..] {
                let a_before_b_ends = b.end_date.is_none_or(|end| a.start_date < end);
                let b_before_a_ends = a.end_date.is_none_or(|end| b.start_date < end);
                if a_before_b_ends && b_before_a_ends {
                    out.push((a, b));
                }
            }
        }
        out
    }

    fn latest(&self) -> Option<&WageRecord> {
        self.records.iter().max_by_key(|r| r.start_date)
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|r| r.start_date);
    }
}
