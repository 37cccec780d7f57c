// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::{App, reference_instant};
use crate::category::category_color;
use crate::engine::format_work_hours;
use crate::models::Timeframe;
use crate::utils::{fmt_money, fmt_timestamp, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("series", sub)) => series(app, sub)?,
        Some(("categories", sub)) => categories(app, sub)?,
        Some(("hours", sub)) => hours(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn timeframe(sub: &clap::ArgMatches) -> Result<Timeframe> {
    let tf = sub.get_one::<String>("timeframe").unwrap().parse::<Timeframe>()?;
    Ok(tf)
}

fn series(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tf = timeframe(sub)?;
    let at = reference_instant(sub, "at")?;
    let buckets = app.books.read(|e| e.bucketed_net_series(tf, at))?;
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let rows = buckets
            .into_iter()
            .map(|b| vec![b.label, fmt_money(&b.net_amount)])
            .collect();
        println!("{}", pretty_table(&["Bucket", "Net"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    spent: String,
    color: String,
    work_time: String,
}

fn categories(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tf = timeframe(sub)?;
    let at = reference_instant(sub, "at")?;
    let (totals, summary, rows) = app.books.read(|e| {
        let totals = e.category_totals(tf, at);
        let rows: Vec<CategoryRow> = totals
            .iter()
            .map(|(cat, spent)| CategoryRow {
                category: cat.clone(),
                spent: fmt_money(spent),
                color: category_color(cat).to_string(),
                work_time: format_work_hours(e.work_hours_cost(*spent, at)),
            })
            .collect();
        (totals, e.totals(tf, at), rows)
    })?;

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let table_rows = rows
            .into_iter()
            .map(|r| vec![r.category, r.spent, r.work_time])
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Work time"], table_rows)
        );
        println!(
            "Since {} ({} categories): income {}, expenses {}, net {}",
            fmt_timestamp(&tf.window_start(at)),
            totals.len(),
            fmt_money(&summary.income),
            fmt_money(&summary.expense),
            fmt_money(&summary.net)
        );
    }
    Ok(())
}

fn hours(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let (hours, wage) = match sub.get_one::<String>("at") {
        Some(_) => {
            let at = reference_instant(sub, "at")?;
            app.books
                .read(|e| (e.work_hours_cost(amount, at), e.wages().effective_wage(at)))?
        }
        None => app
            .books
            .read(|e| (e.work_hours_cost_now(amount), e.wages().current_wage()))?,
    };
    if wage.is_zero() {
        println!("No hourly wage recorded; set one with `worthit wage set`");
    }
    println!(
        "{} = {} of work at {}/hr",
        fmt_money(&amount),
        format_work_hours(hours),
        fmt_money(&wage)
    );
    Ok(())
}
