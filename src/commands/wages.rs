// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::{App, reference_instant};
use crate::models::WageRecord;
use crate::store::SyncOp;
use crate::utils::{fmt_money, fmt_timestamp, maybe_print_json, parse_decimal, parse_timestamp, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(app, sub)?,
        Some(("list", sub)) => list(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let wage = parse_decimal(sub.get_one::<String>("hourly").unwrap())?;
    let from = reference_instant(sub, "from")?;
    let record = match sub.get_one::<String>("until") {
        Some(raw) => WageRecord::closed(wage, from, parse_timestamp(raw)?),
        None => WageRecord::open(wage, from),
    };

    let closed = app.books.insert_wage(record.clone())?;
    // Closed records carry new end dates and are persisted with the new one
    for c in &closed {
        app.commit(SyncOp::PutWageRecord { record: c.clone() })?;
        println!(
            "Closed wage {} at {}",
            fmt_money(&c.hourly_wage),
            c.end_date.as_ref().map(fmt_timestamp).unwrap_or_default()
        );
    }
    app.commit(SyncOp::PutWageRecord {
        record: record.clone(),
    })?;
    println!(
        "Hourly wage {} effective from {}",
        fmt_money(&record.hourly_wage),
        fmt_timestamp(&record.start_date)
    );
    Ok(())
}

#[derive(Serialize)]
struct WageRow {
    id: String,
    hourly_wage: String,
    start: String,
    end: String,
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data: Vec<WageRow> = app.books.with_wages(|w| {
        w.records()
            .iter()
            .map(|r| WageRow {
                id: r.id.clone(),
                hourly_wage: fmt_money(&r.hourly_wage),
                start: fmt_timestamp(&r.start_date),
                end: r
                    .end_date
                    .as_ref()
                    .map(fmt_timestamp)
                    .unwrap_or_else(|| "current".to_string()),
            })
            .collect()
    })?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.start, r.end, r.hourly_wage, r.id])
            .collect();
        println!("{}", pretty_table(&["From", "Until", "Hourly", "ID"], rows));
    }
    Ok(())
}
