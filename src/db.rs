// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::budget::CategoryBudgets;
use crate::error::{Error, Result};
use crate::models::{Transaction, WageRecord};
use crate::store::{Outbox, OutboxEntry, Store, SyncOp};
use crate::utils::{fmt_timestamp, parse_timestamp};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Worthit", "worthit"));

pub const DB_ENV: &str = "WORTHIT_DB";

/// `$WORTHIT_DB` if set, otherwise `worthit.sqlite` in the platform data dir.
pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::Config("could not determine platform data dir".into()))?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("worthit.sqlite"))
}

/// The local backend: one SQLite database holding the ledger, the wage
/// history, budgets, settings and the outbox.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        info!("opening database at {}", path.display());
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        amount TEXT NOT NULL,
        is_income INTEGER NOT NULL,
        date TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS wage_records(
        id TEXT PRIMARY KEY,
        hourly_wage TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT
    );

    CREATE TABLE IF NOT EXISTS budgets(
        category TEXT PRIMARY KEY,
        amount TEXT NOT NULL
    );

    -- Writes waiting to be replicated to the remote store
    CREATE TABLE IF NOT EXISTS outbox(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        payload TEXT NOT NULL,
        attempts INTEGER NOT NULL DEFAULT 0,
        last_error TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

fn decimal_column(raw: &str, what: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| Error::InvalidRecord(format!("{} '{}'", what, raw)))
}

impl Store for SqliteStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, is_income, date, category, note FROM transactions ORDER BY date",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, bool>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, Option<String>>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, amount, is_income, date, category, note) = row?;
            out.push(Transaction {
                amount: decimal_column(&amount, "amount")?,
                date: parse_timestamp(&date)?,
                id,
                is_income,
                category,
                note,
            });
        }
        debug!("loaded {} transactions", out.len());
        Ok(out)
    }

    fn load_wage_history(&self) -> Result<Vec<WageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, hourly_wage, start_date, end_date FROM wage_records ORDER BY start_date",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, wage, start, end) = row?;
            out.push(WageRecord {
                id,
                hourly_wage: decimal_column(&wage, "hourly wage")?,
                start_date: parse_timestamp(&start)?,
                end_date: end.as_deref().map(parse_timestamp).transpose()?,
            });
        }
        Ok(out)
    }

    fn load_budgets(&self) -> Result<CategoryBudgets> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, amount FROM budgets ORDER BY category")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        let mut budgets = CategoryBudgets::new();
        for row in rows {
            let (category, amount) = row?;
            budgets.set(category, decimal_column(&amount, "budget")?)?;
        }
        Ok(budgets)
    }

    fn put_transaction(&self, tx: &Transaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO transactions(id, amount, is_income, date, category, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET amount=excluded.amount, is_income=excluded.is_income,
                 date=excluded.date, category=excluded.category, note=excluded.note",
            params![
                tx.id,
                tx.amount.to_string(),
                tx.is_income,
                fmt_timestamp(&tx.date),
                tx.category,
                tx.note
            ],
        )?;
        Ok(())
    }

    fn delete_transaction(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        Ok(())
    }

    fn put_wage_record(&self, record: &WageRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO wage_records(id, hourly_wage, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET hourly_wage=excluded.hourly_wage,
                 start_date=excluded.start_date, end_date=excluded.end_date",
            params![
                record.id,
                record.hourly_wage.to_string(),
                fmt_timestamp(&record.start_date),
                record.end_date.as_ref().map(fmt_timestamp)
            ],
        )?;
        Ok(())
    }

    fn put_budget(&self, category: &str, amount: Decimal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO budgets(category, amount) VALUES (?1, ?2)
             ON CONFLICT(category) DO UPDATE SET amount=excluded.amount",
            params![category, amount.to_string()],
        )?;
        Ok(())
    }

    fn delete_budget(&self, category: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM budgets WHERE category=?1", params![category])?;
        Ok(())
    }
}

impl Outbox for SqliteStore {
    fn enqueue(&self, op: &SyncOp) -> Result<()> {
        let payload = serde_json::to_string(op)?;
        self.conn
            .execute("INSERT INTO outbox(payload) VALUES (?1)", params![payload])?;
        Ok(())
    }

    fn pending(&self) -> Result<Vec<OutboxEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload, attempts, last_error FROM outbox ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, u32>(2)?,
                r.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, payload, attempts, last_error) = row?;
            out.push(OutboxEntry {
                id,
                op: serde_json::from_str(&payload)?,
                attempts,
                last_error,
            });
        }
        Ok(out)
    }

    fn ack(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM outbox WHERE id=?1", params![id])?;
        Ok(())
    }

    fn nack(&self, id: i64, error: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE outbox SET attempts=attempts+1, last_error=?2 WHERE id=?1",
            params![id, error],
        )?;
        Ok(())
    }
}
