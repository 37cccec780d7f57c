// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use tracing::info;

use super::App;
use crate::remote::HttpStore;
use crate::store::{Outbox, Replicator};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("push", _)) => push(app)?,
        Some(("status", sub)) => status(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn push(app: &App) -> Result<()> {
    let url = app
        .settings
        .remote_url
        .as_deref()
        .ok_or_else(|| anyhow!("No remote configured; run `worthit config set remote_url <url>`"))?;
    let remote = HttpStore::new(url)?;
    let report = Replicator::new(app.settings.sync_max_attempts).flush(&app.store, &remote)?;
    info!(
        "flushed outbox: {} sent, {} failed, {} dead",
        report.sent, report.failed, report.dead
    );
    println!(
        "Sent {} change(s); {} failed, {} given up after {} attempts",
        report.sent, report.failed, report.dead, app.settings.sync_max_attempts
    );
    Ok(())
}

fn status(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows: Vec<Vec<String>> = app
        .store
        .pending()?
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.op.describe(),
                e.attempts.to_string(),
                e.last_error.unwrap_or_default(),
            ]
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!(
            "{}",
            pretty_table(&["#", "Change", "Attempts", "Last error"], rows)
        );
    }
    Ok(())
}
