// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use super::{App, reference_instant};
use crate::category::category_color;
use crate::ledger::{DateRange, SortKey, TransactionFilter, TransactionLedger};
use crate::models::Transaction;
use crate::store::SyncOp;
use crate::utils::{
    fmt_money, fmt_timestamp, maybe_print_json, parse_decimal, parse_timestamp, pretty_table,
};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub)?,
        Some(("list", sub)) => list(app, sub)?,
        Some(("edit", sub)) => edit(app, sub)?,
        Some(("rm", sub)) => remove(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let is_income = sub.get_flag("income");
    let date = reference_instant(sub, "date")?;

    let mut tx = Transaction::new(amount, is_income, date, category)?;
    if let Some(note) = sub
        .get_one::<String>("note")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        tx = tx.with_note(note);
    }

    app.books.add_transaction(tx.clone())?;
    app.commit(SyncOp::PutTransaction {
        transaction: tx.clone(),
    })?;

    let hours = app.books.read(|e| e.work_hours_cost(tx.amount, tx.date))?;
    println!(
        "Recorded {} {} in {} on {} ({}) [{}]",
        if is_income { "income" } else { "expense" },
        fmt_money(&tx.amount),
        tx.category,
        fmt_timestamp(&tx.date),
        crate::format_work_hours(hours),
        tx.id
    );
    Ok(())
}

fn edit(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let current = app
        .books
        .with_ledger(|l| l.get(&id).cloned())?
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;

    let mut edited = current.clone();
    if let Some(raw) = sub.get_one::<String>("amount") {
        edited.amount = parse_decimal(raw)?;
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        edited.category = cat.trim().to_string();
    }
    if let Some(raw) = sub.get_one::<String>("date") {
        edited.date = parse_timestamp(raw)?;
    }
    if let Some(note) = sub.get_one::<String>("note") {
        let note = note.trim();
        edited.note = (!note.is_empty()).then(|| note.to_string());
    }
    if let Some(income) = sub.get_one::<bool>("income") {
        edited.is_income = *income;
    }

    app.books
        .replace_transaction(&id, edited.clone())
        .with_context(|| format!("Edit transaction '{}'", id))?;
    app.commit(SyncOp::PutTransaction {
        transaction: edited,
    })?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    app.books
        .remove_transaction(&id)
        .with_context(|| format!("Remove transaction '{}'", id))?;
    app.commit(SyncOp::DeleteTransaction { id: id.clone() })?;
    println!("Removed transaction {}", id);
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_args(sub)?;
    let limit = sub.get_one::<usize>("limit").copied();
    let data = app.books.read(|engine| {
        query_rows(engine.ledger(), &filter, limit, |tx| {
            crate::format_work_hours(engine.work_hours_cost(tx.amount, tx.date))
        })
    })?;

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.work_time.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Amount", "Category", "Work time", "Note", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::new();
    if let Some(cat) = sub.get_one::<String>("category") {
        filter = filter.category(cat.trim());
    }
    if sub.get_flag("income") {
        filter = filter.income();
    } else if sub.get_flag("expenses") {
        filter = filter.expenses();
    }
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_timestamp(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_timestamp(s))
        .transpose()?;
    if from.is_some() || to.is_some() {
        filter = filter.range(DateRange::new(from, to));
    }
    Ok(filter)
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub color: String,
    pub work_time: String,
    pub note: String,
}

/// Newest first, at most `limit` rows.
pub fn query_rows<F>(
    ledger: &TransactionLedger,
    filter: &TransactionFilter,
    limit: Option<usize>,
    work_time: F,
) -> Vec<TransactionRow>
where
    F: Fn(&Transaction) -> String,
{
    ledger
        .filter_sorted(filter, SortKey::DateDescending)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|tx| TransactionRow {
            id: tx.id.clone(),
            date: fmt_timestamp(&tx.date),
            kind: if tx.is_income { "income" } else { "expense" }.to_string(),
            amount: fmt_money(&tx.amount),
            category: tx.category.clone(),
            color: category_color(&tx.category).to_string(),
            work_time: work_time(tx),
            note: tx.note.clone().unwrap_or_default(),
        })
        .collect()
}
