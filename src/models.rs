// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, Months, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub is_income: bool,
    pub date: NaiveDateTime,
    pub category: String,
    pub note: Option<String>,
}

impl Transaction {
    /// Creates a transaction with a fresh id. The amount must be positive.
    pub fn new(
        amount: Decimal,
        is_income: bool,
        date: NaiveDateTime,
        category: impl Into<String>,
    ) -> Result<Self> {
        let tx = Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            is_income,
            date,
            category: category.into(),
            note: None,
        };
        tx.validate()?;
        Ok(tx)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(self.amount));
        }
        Ok(())
    }

    /// `+amount` for income, `-amount` for expenses.
    pub fn net(&self) -> Decimal {
        if self.is_income {
            self.amount
        } else {
            -self.amount
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageRecord {
    pub id: String,
    pub hourly_wage: Decimal,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
}

impl WageRecord {
    /// An open-ended record: the rate in effect from `start_date` onward.
    pub fn open(hourly_wage: Decimal, start_date: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            hourly_wage,
            start_date,
            end_date: None,
        }
    }

    pub fn closed(hourly_wage: Decimal, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            end_date: Some(end_date),
            ..Self::open(hourly_wage, start_date)
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Half-open containment: `start_date <= at < end_date`.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start_date && self.end_date.is_none_or(|end| at < end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// Start of the trailing window ending at `reference`.
    pub fn window_start(self, reference: NaiveDateTime) -> NaiveDateTime {
        match self {
            Timeframe::Day => reference - Duration::hours(24),
            Timeframe::Week => reference - Duration::days(7),
            Timeframe::Month => reference
                .checked_sub_months(Months::new(1))
                .unwrap_or(reference),
            Timeframe::Year => reference
                .checked_sub_months(Months::new(12))
                .unwrap_or(reference),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        };
        f.write_str(s)
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            other => Err(Error::Config(format!(
                "unknown timeframe '{}', expected day|week|month|year",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationQuery {
    pub timeframe: Timeframe,
    pub reference_instant: NaiveDateTime,
}

impl AggregationQuery {
    pub fn new(timeframe: Timeframe, reference_instant: NaiveDateTime) -> Self {
        Self {
            timeframe,
            reference_instant,
        }
    }

    pub fn window_start(&self) -> NaiveDateTime {
        self.timeframe.window_start(self.reference_instant)
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub net_amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}
