// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::App;
use crate::store::Outbox;
use crate::utils::{fmt_timestamp, pretty_table};

pub fn handle(app: &App) -> Result<()> {
    let rows = issues(app)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn issues(app: &App) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Wage intervals that overlap (backdated records are not checked on insert)
    app.books.with_wages(|w| {
        for (a, b) in w.overlaps() {
            rows.push(vec![
                "wage_overlap".into(),
                format!(
                    "{} from {} overlaps {} from {}",
                    a.hourly_wage,
                    fmt_timestamp(&a.start_date),
                    b.hourly_wage,
                    fmt_timestamp(&b.start_date)
                ),
            ]);
        }
        if w.records().iter().filter(|r| r.is_open()).count() > 1 {
            rows.push(vec![
                "multiple_open_wages".into(),
                "more than one wage record has no end date".into(),
            ]);
        }
        if w.is_empty() {
            rows.push(vec![
                "no_wage".into(),
                "work-hours costs read as zero until a wage is set".into(),
            ]);
        }
    })?;

    // 2) Categories that reports fold into the fallback bucket
    let known = &app.books.options().categories;
    let mut unknown: Vec<String> = app.books.with_ledger(|l| {
        l.iter()
            .filter(|tx| !tx.is_income && known.resolve(&tx.category) != tx.category)
            .map(|tx| tx.category.clone())
            .collect()
    })?;
    unknown.sort();
    unknown.dedup();
    for cat in unknown {
        rows.push(vec!["unlisted_category".into(), cat]);
    }

    // 3) Outbox entries stuck past the retry limit
    let max = app.settings.sync_max_attempts;
    for e in app.store.pending()? {
        if e.attempts >= max {
            rows.push(vec![
                "sync_dead_letter".into(),
                format!("{}: {}", e.op.describe(), e.last_error.unwrap_or_default()),
            ]);
        }
    }
    Ok(rows)
}
