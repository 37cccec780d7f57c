// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use worthit::{cli, commands, db, logging};

fn main() -> Result<()> {
    logging::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = db::db_path()?;
    let store = db::SqliteStore::open(&path)
        .with_context(|| format!("Open DB at {}", path.display()))?;
    let app = commands::App::load(store)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&app, sub)?,
        Some(("wage", sub)) => commands::wages::handle(&app, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&app, sub)?,
        Some(("report", sub)) => commands::reports::handle(&app, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&app, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&app, sub)?,
        Some(("config", sub)) => commands::config::handle(&app, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&app)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
