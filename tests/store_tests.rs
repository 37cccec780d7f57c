// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::{Cell, RefCell};
use worthit::budget::CategoryBudgets;
use worthit::db::SqliteStore;
use worthit::settings::Settings;
use worthit::store::{self, MemoryOutbox, Outbox, Replicator, Store, SyncOp};
use worthit::{Error, Transaction, WageRecord, WageTimeline, WeekMatching};

fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Remote double that refuses the first `failures` writes.
#[derive(Default)]
struct FlakyRemote {
    failures: Cell<usize>,
    transactions: RefCell<Vec<Transaction>>,
    deleted: RefCell<Vec<String>>,
}

impl FlakyRemote {
    fn failing(n: usize) -> Self {
        Self {
            failures: Cell::new(n),
            ..Self::default()
        }
    }

    fn gate(&self) -> worthit::Result<()> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(Error::Config("remote unavailable".into()));
        }
        Ok(())
    }
}

impl Store for FlakyRemote {
    fn load_transactions(&self) -> worthit::Result<Vec<Transaction>> {
        Ok(self.transactions.borrow().clone())
    }
    fn load_wage_history(&self) -> worthit::Result<Vec<WageRecord>> {
        Ok(Vec::new())
    }
    fn load_budgets(&self) -> worthit::Result<CategoryBudgets> {
        Ok(CategoryBudgets::new())
    }
    fn put_transaction(&self, tx: &Transaction) -> worthit::Result<()> {
        self.gate()?;
        self.transactions.borrow_mut().push(tx.clone());
        Ok(())
    }
    fn delete_transaction(&self, id: &str) -> worthit::Result<()> {
        self.gate()?;
        self.deleted.borrow_mut().push(id.to_string());
        Ok(())
    }
    fn put_wage_record(&self, _record: &WageRecord) -> worthit::Result<()> {
        self.gate()
    }
    fn put_budget(&self, _category: &str, _amount: Decimal) -> worthit::Result<()> {
        self.gate()
    }
    fn delete_budget(&self, _category: &str) -> worthit::Result<()> {
        self.gate()
    }
}

fn sample_tx(id: &str, amount: Decimal) -> Transaction {
    Transaction::new(amount, false, ts(2025, 3, 5, 18, 30), "Food")
        .unwrap()
        .with_id(id)
}

#[test]
fn sqlite_round_trips_transactions() {
    let db = SqliteStore::open_in_memory().unwrap();
    let a = sample_tx("a", dec!(12.34)).with_note("lunch");
    let b = Transaction::new(dec!(2000), true, ts(2025, 3, 1, 9, 0), "Salary")
        .unwrap()
        .with_id("b");
    db.put_transaction(&a).unwrap();
    db.put_transaction(&b).unwrap();

    let loaded = db.load_transactions().unwrap();
    assert_eq!(loaded, vec![b.clone(), a.clone()]);

    // Upsert by id
    let mut a2 = a.clone();
    a2.amount = dec!(15);
    db.put_transaction(&a2).unwrap();
    db.delete_transaction("b").unwrap();
    assert_eq!(db.load_transactions().unwrap(), vec![a2]);
}

#[test]
fn sqlite_round_trips_wage_history_and_budgets() {
    let db = SqliteStore::open_in_memory().unwrap();
    let mut timeline = WageTimeline::new();
    let first = WageRecord::open(dec!(20), ts(2025, 1, 1, 0, 0));
    let second = WageRecord::open(dec!(30), ts(2025, 6, 1, 0, 0));
    timeline.insert(first.clone()).unwrap();
    let closed = timeline.insert(second.clone()).unwrap();

    db.put_wage_record(&first).unwrap();
    for c in &closed {
        db.put_wage_record(c).unwrap();
    }
    db.put_wage_record(&second).unwrap();

    let loaded = WageTimeline::from_records(db.load_wage_history().unwrap());
    assert_eq!(loaded, timeline);
    assert_eq!(loaded.effective_wage(ts(2025, 3, 1, 0, 0)), dec!(20));

    db.put_budget("Food", dec!(400)).unwrap();
    db.put_budget("Rent", dec!(1000)).unwrap();
    db.put_budget("Food", dec!(450)).unwrap();
    db.delete_budget("Rent").unwrap();
    let budgets = db.load_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets.get("Food"), Some(dec!(450)));
}

#[test]
fn record_applies_locally_then_queues() {
    let db = SqliteStore::open_in_memory().unwrap();
    let tx = sample_tx("a", dec!(9.99));
    store::record(
        &db,
        &db,
        SyncOp::PutTransaction {
            transaction: tx.clone(),
        },
    )
    .unwrap();
    store::record(&db, &db, SyncOp::DeleteTransaction { id: "a".into() }).unwrap();

    assert!(db.load_transactions().unwrap().is_empty());
    let pending = db.pending().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].op, SyncOp::PutTransaction { transaction: tx });
    assert_eq!(pending[1].op, SyncOp::DeleteTransaction { id: "a".into() });
    assert!(pending[0].id < pending[1].id);
    assert_eq!(pending[0].attempts, 0);
}

#[test]
fn flush_stops_at_first_failure_and_retries_in_order() {
    let outbox = MemoryOutbox::new();
    for id in ["a", "b", "c"] {
        outbox
            .enqueue(&SyncOp::PutTransaction {
                transaction: sample_tx(id, dec!(1)),
            })
            .unwrap();
    }
    let remote = FlakyRemote::failing(1);
    let replicator = Replicator::new(5);

    let report = replicator.flush(&outbox, &remote).unwrap();
    assert_eq!((report.sent, report.failed, report.dead), (0, 1, 0));
    let pending = outbox.pending().unwrap();
    assert_eq!(pending.len(), 3);
    assert_eq!(pending[0].attempts, 1);
    assert_eq!(pending[0].last_error.as_deref(), Some("invalid setting: remote unavailable"));

    let report = replicator.flush(&outbox, &remote).unwrap();
    assert_eq!((report.sent, report.failed, report.dead), (3, 0, 0));
    assert!(outbox.pending().unwrap().is_empty());
    let ids: Vec<String> = remote
        .transactions
        .borrow()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn exhausted_entries_become_dead_letters() {
    let db = SqliteStore::open_in_memory().unwrap();
    db.enqueue(&SyncOp::DeleteTransaction { id: "x".into() })
        .unwrap();
    db.enqueue(&SyncOp::DeleteTransaction { id: "y".into() })
        .unwrap();
    let remote = FlakyRemote::failing(1);
    let replicator = Replicator::new(1);

    let first = replicator.flush(&db, &remote).unwrap();
    assert_eq!((first.sent, first.failed, first.dead), (0, 1, 0));

    // "x" is out of attempts; it is skipped and "y" goes through
    let second = replicator.flush(&db, &remote).unwrap();
    assert_eq!((second.sent, second.failed, second.dead), (1, 0, 1));
    assert_eq!(*remote.deleted.borrow(), vec!["y".to_string()]);

    let pending = db.pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].op, SyncOp::DeleteTransaction { id: "x".into() });
    assert_eq!(pending[0].attempts, 1);
}

#[test]
fn sync_ops_serialize_with_an_op_tag() {
    let op = SyncOp::PutBudget {
        category: "Food".into(),
        amount: dec!(400),
    };
    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(json["op"], "put_budget");
    assert_eq!(json["category"], "Food");
    let back: SyncOp = serde_json::from_value(json).unwrap();
    assert_eq!(back, op);
    assert_eq!(op.describe(), "put budget Food");
}

#[test]
fn settings_default_and_validate() {
    let db = SqliteStore::open_in_memory().unwrap();
    let s = Settings::load(&db).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.categories, vec!["Rent", "Food", "Transportation", "Other"]);
    assert_eq!(s.sync_max_attempts, 5);
    assert!(s.remote_url.is_none());

    Settings::set(&db, "categories", " Books, Games ,,Books").unwrap();
    Settings::set(&db, "week_matching", "iso-year-and-week").unwrap();
    Settings::set(&db, "sync_max_attempts", "3").unwrap();
    Settings::set(&db, "remote_url", "https://example.test/api").unwrap();

    let s = Settings::load(&db).unwrap();
    assert_eq!(s.categories, vec!["Books", "Games", "Books"]);
    assert_eq!(s.week_matching, WeekMatching::IsoYearAndWeek);
    assert_eq!(s.sync_max_attempts, 3);
    assert_eq!(s.remote_url.as_deref(), Some("https://example.test/api"));
    let names = s.engine_options().categories.names().to_vec();
    assert_eq!(names, vec!["Books", "Games", "Other"]);

    assert!(matches!(
        Settings::set(&db, "sync_max_attempts", "0"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Settings::set(&db, "week_matching", "monthly"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Settings::set(&db, "colour", "blue"),
        Err(Error::Config(_))
    ));
}

#[test]
fn file_backed_store_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("worthit.sqlite");
    {
        let db = SqliteStore::open(&path).unwrap();
        db.put_transaction(&sample_tx("keep", dec!(3))).unwrap();
        db.enqueue(&SyncOp::DeleteTransaction { id: "old".into() })
            .unwrap();
    }
    let db = SqliteStore::open(&path).unwrap();
    assert_eq!(db.load_transactions().unwrap().len(), 1);
    assert_eq!(db.pending().unwrap().len(), 1);
}
