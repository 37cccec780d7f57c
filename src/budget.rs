// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

pub const MAX_BUDGET_CATEGORIES: usize = 5;

const ON_TRACK_LIMIT: Decimal = Decimal::from_parts(75, 0, 0, false, 0);
const WARNING_LIMIT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Over,
}

impl BudgetStatus {
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over",
        }
    }
}

/// Per-category spending limits, capped at [`MAX_BUDGET_CATEGORIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudgets {
    limits: BTreeMap<String, Decimal>,
}

impl CategoryBudgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or updates a limit. Updating an existing category never hits the cap.
    pub fn set(&mut self, category: impl Into<String>, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }
        let category = category.into();
        if !self.limits.contains_key(&category) && self.limits.len() >= MAX_BUDGET_CATEGORIES {
            return Err(Error::BudgetCapExceeded {
                cap: MAX_BUDGET_CATEGORIES,
            });
        }
        self.limits.insert(category, amount);
        Ok(())
    }

    pub fn remove(&mut self, category: &str) -> Result<Decimal> {
        self.limits
            .remove(category)
            .ok_or_else(|| Error::NotFound(category.to_string()))
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.limits.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.limits.values().copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub percent: Decimal,
    pub status: BudgetStatus,
}

impl BudgetLine {
    fn new(category: impl Into<String>, spent: Decimal, limit: Decimal) -> Self {
        let percent = BudgetTracker::percent_of_budget(spent, limit);
        Self {
            category: category.into(),
            spent,
            limit,
            percent,
            status: BudgetTracker::status(percent),
        }
    }
}

pub struct BudgetTracker;

impl BudgetTracker {
    /// Share of the limit spent, clamped to `[0, 100]`. A zero limit reads
    /// as 100 once anything is spent and 0 otherwise.
    pub fn percent_of_budget(total_spent: Decimal, budget_limit: Decimal) -> Decimal {
        if total_spent <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        if budget_limit <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        // Overflow only happens far past the limit
        total_spent
            .checked_div(budget_limit)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
    }

    pub fn status(percent: Decimal) -> BudgetStatus {
        if percent <= ON_TRACK_LIMIT {
            BudgetStatus::OnTrack
        } else if percent <= WARNING_LIMIT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Over
        }
    }

    /// One line per budgeted category, then an `Overall` line comparing the
    /// summed spending of those categories with the summed limits.
    pub fn report(
        spent_by_category: &BTreeMap<String, Decimal>,
        budgets: &CategoryBudgets,
    ) -> Vec<BudgetLine> {
        let mut lines: Vec<BudgetLine> = budgets
            .iter()
            .map(|(cat, limit)| {
                let spent = spent_by_category.get(cat).copied().unwrap_or(Decimal::ZERO);
                BudgetLine::new(cat, spent, limit)
            })
            .collect();
        if !lines.is_empty() {
            let spent: Decimal = lines.iter().map(|l| l.spent).sum();
            lines.push(BudgetLine::new("Overall", spent, budgets.total()));
        }
        lines
    }
}
