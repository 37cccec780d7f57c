// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::App;
use crate::settings::Settings;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            Settings::set(&app.store, key, value)?;
            println!("Set {} = {}", key, value.trim());
        }
        Some(("show", sub)) => show(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let s = &app.settings;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
        let rows = vec![
            vec!["categories".into(), s.categories.join(", ")],
            vec![
                "remote_url".into(),
                s.remote_url.clone().unwrap_or_else(|| "(none)".into()),
            ],
            vec!["sync_max_attempts".into(), s.sync_max_attempts.to_string()],
            vec!["week_matching".into(), s.week_matching.as_str().into()],
        ];
        println!("{}", pretty_table(&["Setting", "Value"], rows));
    }
    Ok(())
}
