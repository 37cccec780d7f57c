// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use std::path::Path;

use super::App;
use crate::ledger::{SortKey, TransactionFilter, TransactionLedger};
use crate::utils::fmt_timestamp;

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            app.books
                .with_ledger(|ledger| export_transactions(ledger, &fmt, Path::new(out)))??;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes every transaction, oldest first, as `csv` or `json`.
pub fn export_transactions(ledger: &TransactionLedger, fmt: &str, out: &Path) -> Result<()> {
    let filter = TransactionFilter::new();
    let rows = ledger.filter_sorted(&filter, SortKey::DateAscending);
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "kind", "amount", "category", "note"])?;
            for tx in rows {
                wtr.write_record([
                    tx.id.clone(),
                    fmt_timestamp(&tx.date),
                    if tx.is_income { "income" } else { "expense" }.to_string(),
                    tx.amount.to_string(),
                    tx.category.clone(),
                    tx.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(())
}
