// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{App, reference_instant};
use crate::budget::{BudgetLine, BudgetTracker};
use crate::ledger::{DateRange, TransactionFilter};
use crate::models::Timeframe;
use crate::store::{Store, SyncOp};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(app, sub)?,
        Some(("rm", sub)) => remove(app, sub)?,
        Some(("status", sub)) => status(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut budgets = app.store.load_budgets()?;
    budgets
        .set(cat.clone(), amount)
        .with_context(|| format!("Set budget for {}", cat))?;
    app.commit(SyncOp::PutBudget {
        category: cat.clone(),
        amount,
    })?;
    println!("Budget set for {} = {}", cat, fmt_money(&amount));
    Ok(())
}

fn remove(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap().trim().to_string();
    let mut budgets = app.store.load_budgets()?;
    budgets
        .remove(&cat)
        .with_context(|| format!("Remove budget for {}", cat))?;
    app.commit(SyncOp::DeleteBudget {
        category: cat.clone(),
    })?;
    println!("Removed budget for {}", cat);
    Ok(())
}

fn status(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let timeframe: Timeframe = sub.get_one::<String>("timeframe").unwrap().parse()?;
    let at = reference_instant(sub, "at")?;
    let lines = budget_status(app, timeframe, at)?;

    if !maybe_print_json(json_flag, jsonl_flag, &lines)? {
        let rows = lines
            .into_iter()
            .map(|l| {
                vec![
                    l.category,
                    fmt_money(&l.limit),
                    fmt_money(&l.spent),
                    format!("{:.0}%", l.percent.round_dp(0)),
                    l.status.label().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Used", "Status"], rows)
        );
    }
    Ok(())
}

/// Budget lines for spending in the trailing `timeframe` window. Spending is
/// matched on the raw category so budgets for unlisted categories still work.
pub fn budget_status(
    app: &App,
    timeframe: Timeframe,
    at: chrono::NaiveDateTime,
) -> Result<Vec<BudgetLine>> {
    let budgets = app.store.load_budgets()?;
    let window_start = timeframe.window_start(at);
    let spent: BTreeMap<String, Decimal> = app.books.with_ledger(|ledger| {
        budgets
            .iter()
            .map(|(cat, _)| {
                let filter = TransactionFilter::new()
                    .category(cat)
                    .expenses()
                    .range(DateRange::since(window_start));
                let total: Decimal = ledger.filter(&filter).map(|tx| tx.amount).sum();
                (cat.to_string(), total)
            })
            .collect()
    })?;
    Ok(BudgetTracker::report(&spent, &budgets))
}
