// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over a ledger and a wage timeline: chart series, category
//! totals and hours-of-work conversions. Nothing here mutates its inputs.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::category::CategorySet;
use crate::error::Error;
use crate::ledger::TransactionLedger;
use crate::models::{Bucket, Timeframe, Totals, Transaction};
use crate::wage::WageTimeline;

const DAY_OFFSETS_HOURS: [i64; 5] = [24, 18, 12, 6, 0];

/// How Month-timeframe weekly buckets pick up transactions.
///
/// `WeekOfYear` compares only the ISO week number, so a transaction from the
/// same week of an earlier year lands in the bucket too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekMatching {
    #[default]
    WeekOfYear,
    IsoYearAndWeek,
}

impl FromStr for WeekMatching {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "week-of-year" => Ok(WeekMatching::WeekOfYear),
            "iso-year-and-week" => Ok(WeekMatching::IsoYearAndWeek),
            other => Err(Error::Config(format!(
                "unknown week matching '{}', expected week-of-year|iso-year-and-week",
                other
            ))),
        }
    }
}

impl WeekMatching {
    pub fn as_str(self) -> &'static str {
        match self {
            WeekMatching::WeekOfYear => "week-of-year",
            WeekMatching::IsoYearAndWeek => "iso-year-and-week",
        }
    }

    fn same_week(self, a: NaiveDateTime, b: NaiveDateTime) -> bool {
        let (wa, wb) = (a.iso_week(), b.iso_week());
        match self {
            WeekMatching::WeekOfYear => wa.week() == wb.week(),
            WeekMatching::IsoYearAndWeek => wa == wb,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub categories: CategorySet,
    pub week_matching: WeekMatching,
}

pub struct AggregationEngine<'a> {
    ledger: &'a TransactionLedger,
    wages: &'a WageTimeline,
    options: EngineOptions,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(ledger: &'a TransactionLedger, wages: &'a WageTimeline) -> Self {
        Self::with_options(ledger, wages, EngineOptions::default())
    }

    pub fn with_options(
        ledger: &'a TransactionLedger,
        wages: &'a WageTimeline,
        options: EngineOptions,
    ) -> Self {
        Self {
            ledger,
            wages,
            options,
        }
    }

    pub fn ledger(&self) -> &'a TransactionLedger {
        self.ledger
    }

    pub fn wages(&self) -> &'a WageTimeline {
        self.wages
    }

    /// Chart series for `timeframe`, oldest bucket first.
    pub fn bucketed_net_series(
        &self,
        timeframe: Timeframe,
        reference: NaiveDateTime,
    ) -> Vec<Bucket> {
        match timeframe {
            Timeframe::Day => self.day_series(reference),
            Timeframe::Week => self.week_series(reference),
            Timeframe::Month => self.month_series(reference),
            Timeframe::Year => self.year_series(reference),
        }
    }

    /// Running totals: the bucket `h` hours back sums everything from its
    /// instant up to the reference, so the 24-hour bucket holds the others.
    fn day_series(&self, reference: NaiveDateTime) -> Vec<Bucket> {
        DAY_OFFSETS_HOURS
            .iter()
            .map(|&h| {
                let since = reference - Duration::hours(h);
                Bucket {
                    label: since.format("%-I %p").to_string(),
                    net_amount: self.net_where(|tx| tx.date >= since && tx.date <= reference),
                }
            })
            .collect()
    }

    fn week_series(&self, reference: NaiveDateTime) -> Vec<Bucket> {
        let today = reference.date();
        (0..7)
            .rev()
            .map(|back| {
                let day = today - Duration::days(back);
                Bucket {
                    label: day.format("%a").to_string(),
                    net_amount: self.net_where(|tx| tx.date.date() == day),
                }
            })
            .collect()
    }

    fn month_series(&self, reference: NaiveDateTime) -> Vec<Bucket> {
        let window_start = Timeframe::Month.window_start(reference);
        let matching = self.options.week_matching;
        let mut buckets = Vec::new();
        let mut start = reference;
        while start >= window_start {
            buckets.push(Bucket {
                label: start.format("%b %-d").to_string(),
                net_amount: self.net_where(|tx| matching.same_week(tx.date, start)),
            });
            start -= Duration::days(7);
        }
        buckets.reverse();
        buckets
    }

    fn year_series(&self, reference: NaiveDateTime) -> Vec<Bucket> {
        let this_month = first_of_month(reference.date());
        (0..12)
            .rev()
            .map(|back| {
                let month = this_month
                    .checked_sub_months(Months::new(back))
                    .unwrap_or(this_month);
                Bucket {
                    label: month.format("%b").to_string(),
                    net_amount: self.net_where(|tx| {
                        tx.date.year() == month.year() && tx.date.month() == month.month()
                    }),
                }
            })
            .collect()
    }

    /// Expense totals per known category since the window start. Every
    /// known category is present; unknown ones are folded into the fallback.
    pub fn category_totals(
        &self,
        timeframe: Timeframe,
        reference: NaiveDateTime,
    ) -> BTreeMap<String, Decimal> {
        let window_start = timeframe.window_start(reference);
        let categories = &self.options.categories;
        let mut totals: BTreeMap<String, Decimal> = categories
            .names()
            .iter()
            .map(|n| (n.clone(), Decimal::ZERO))
            .collect();
        for tx in self
            .ledger
            .iter()
            .filter(|tx| !tx.is_income && tx.date >= window_start)
        {
            *totals
                .entry(categories.resolve(&tx.category).to_string())
                .or_insert(Decimal::ZERO) += tx.amount;
        }
        totals
    }

    /// Income, expense and net since the window start.
    pub fn totals(&self, timeframe: Timeframe, reference: NaiveDateTime) -> Totals {
        let window_start = timeframe.window_start(reference);
        let mut t = Totals::default();
        for tx in self.ledger.iter().filter(|tx| tx.date >= window_start) {
            if tx.is_income {
                t.income += tx.amount;
            } else {
                t.expense += tx.amount;
            }
        }
        t.net = t.income - t.expense;
        t
    }

    /// `amount` expressed in hours of work at the wage effective at `at`.
    /// A zero wage yields zero hours.
    pub fn work_hours_cost(&self, amount: Decimal, at: NaiveDateTime) -> Decimal {
        hours_at_wage(amount, self.wages.effective_wage(at))
    }

    pub fn work_hours_cost_now(&self, amount: Decimal) -> Decimal {
        hours_at_wage(amount, self.wages.current_wage())
    }

    fn net_where<F>(&self, pred: F) -> Decimal
    where
        F: Fn(&Transaction) -> bool,
    {
        self.ledger
            .iter()
            .filter(|&tx| pred(tx))
            .map(Transaction::net)
            .sum()
    }
}

fn hours_at_wage(amount: Decimal, wage: Decimal) -> Decimal {
    if wage.is_zero() {
        return Decimal::ZERO;
    }
    amount.checked_div(wage).unwrap_or(Decimal::ZERO)
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Renders hours of work: minutes below one hour, one decimal below ten
/// hours, whole hours from ten upward.
///
/// The unit is picked after rounding, so 0.999 hours reads "1.0 hrs" rather
/// than "60 min".
pub fn format_work_hours(hours: Decimal) -> String {
    let round =
        |d: Decimal, dp: u32| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let minutes = round(
        hours.checked_mul(Decimal::from(60)).unwrap_or(Decimal::MAX),
        0,
    );
    if minutes < Decimal::from(60) {
        return format!("{:.0} min", minutes);
    }
    let tenths = round(hours, 1);
    if tenths < Decimal::TEN {
        format!("{:.1} hrs", tenths)
    } else {
        format!("{:.0} hrs", round(hours, 0))
    }
}
