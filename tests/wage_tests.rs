// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use worthit::{Error, WageRecord, WageTimeline};

fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    ts(y, m, d, 0, 0, 0)
}

#[test]
fn each_open_insert_leaves_exactly_one_open_record() {
    let mut timeline = WageTimeline::new();
    for (i, wage) in [dec!(18), dec!(20), dec!(22.5), dec!(25), dec!(30)]
        .into_iter()
        .enumerate()
    {
        let record = WageRecord::open(wage, day(2024, 1 + i as u32, 1));
        let id = record.id.clone();
        timeline.insert(record).unwrap();

        let open: Vec<_> = timeline.records().iter().filter(|r| r.is_open()).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, id);
    }
    assert_eq!(timeline.current_wage(), dec!(30));
}

#[test]
fn closing_sets_end_to_new_start() {
    let mut timeline = WageTimeline::new();
    let first = WageRecord::open(dec!(20), day(2025, 1, 1));
    let first_id = first.id.clone();
    timeline.insert(first).unwrap();

    let closed = timeline
        .insert(WageRecord::open(dec!(30), day(2025, 6, 1)))
        .unwrap();

    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, first_id);
    assert_eq!(closed[0].end_date, Some(day(2025, 6, 1)));
    let stored = timeline
        .records()
        .iter()
        .find(|r| r.id == first_id)
        .unwrap();
    assert_eq!(stored.end_date, Some(day(2025, 6, 1)));
}

#[test]
fn wage_switches_exactly_at_the_boundary() {
    let mut timeline = WageTimeline::new();
    timeline
        .insert(WageRecord::open(dec!(20), day(2025, 1, 1)))
        .unwrap();
    timeline
        .insert(WageRecord::open(dec!(30), day(2025, 6, 1)))
        .unwrap();

    assert_eq!(timeline.effective_wage(day(2025, 3, 15)), dec!(20));
    assert_eq!(timeline.effective_wage(ts(2025, 5, 31, 23, 59, 59)), dec!(20));
    assert_eq!(timeline.effective_wage(day(2025, 6, 1)), dec!(30));
    assert_eq!(timeline.effective_wage(day(2026, 1, 1)), dec!(30));
}

#[test]
fn uncovered_instants_fall_back_to_latest_record() {
    let mut timeline = WageTimeline::new();
    timeline
        .insert(WageRecord::closed(dec!(15), day(2024, 1, 1), day(2024, 6, 1)))
        .unwrap();
    timeline
        .insert(WageRecord::closed(dec!(17), day(2024, 9, 1), day(2024, 12, 1)))
        .unwrap();

    // Before all, in the gap, and after all
    assert_eq!(timeline.effective_wage(day(2023, 1, 1)), dec!(17));
    assert_eq!(timeline.effective_wage(day(2024, 7, 15)), dec!(17));
    assert_eq!(timeline.effective_wage(day(2025, 1, 1)), dec!(17));
    // No open record: current is the latest started
    assert_eq!(timeline.current_wage(), dec!(17));
}

#[test]
fn empty_timeline_has_zero_wage() {
    let timeline = WageTimeline::new();
    assert_eq!(timeline.effective_wage(day(2025, 1, 1)), Decimal::ZERO);
    assert_eq!(timeline.current_wage(), Decimal::ZERO);
}

#[test]
fn backdated_closed_record_is_accepted_and_reported_as_overlap() {
    let mut timeline = WageTimeline::new();
    timeline
        .insert(WageRecord::open(dec!(20), day(2025, 1, 1)))
        .unwrap();
    let closed = timeline
        .insert(WageRecord::closed(dec!(15), day(2025, 2, 1), day(2025, 3, 1)))
        .unwrap();

    // A closed insert never closes the open record
    assert!(closed.is_empty());
    assert_eq!(timeline.current_wage(), dec!(20));
    // Inside both intervals the later-starting record wins
    assert_eq!(timeline.effective_wage(day(2025, 2, 15)), dec!(15));
    assert_eq!(timeline.effective_wage(day(2025, 3, 1)), dec!(20));
    assert_eq!(timeline.overlaps().len(), 1);
}

#[test]
fn consecutive_records_do_not_overlap() {
    let mut timeline = WageTimeline::new();
    timeline
        .insert(WageRecord::open(dec!(20), day(2025, 1, 1)))
        .unwrap();
    timeline
        .insert(WageRecord::open(dec!(30), day(2025, 6, 1)))
        .unwrap();
    assert!(timeline.overlaps().is_empty());
}

#[test]
fn rejects_non_positive_wage_and_inverted_range() {
    let mut timeline = WageTimeline::new();
    let err = timeline
        .insert(WageRecord::open(Decimal::ZERO, day(2025, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));

    let err = timeline
        .insert(WageRecord::closed(dec!(20), day(2025, 2, 1), day(2025, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
    assert!(timeline.is_empty());
}

#[test]
fn from_records_keeps_history_as_stored() {
    let a = WageRecord::open(dec!(20), day(2025, 1, 1));
    let b = WageRecord::open(dec!(25), day(2024, 1, 1));
    let timeline = WageTimeline::from_records(vec![a, b]);

    // Both stay open; records come back sorted by start
    assert_eq!(timeline.records().iter().filter(|r| r.is_open()).count(), 2);
    assert_eq!(timeline.records()[0].hourly_wage, dec!(25));
    assert_eq!(timeline.current_wage(), dec!(20));
}

#[test]
fn open_record_must_start_after_the_current_one() {
    let mut timeline = WageTimeline::new();
    timeline
        .insert(WageRecord::open(dec!(30), day(2025, 6, 1)))
        .unwrap();

    let err = timeline
        .insert(WageRecord::open(dec!(20), day(2025, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
    let err = timeline
        .insert(WageRecord::open(dec!(25), day(2025, 6, 1)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));

    // The existing rate is untouched
    assert_eq!(timeline.records().len(), 1);
    assert!(timeline.records()[0].is_open());
    assert_eq!(timeline.effective_wage(day(2025, 7, 1)), dec!(30));

    // Earlier rates go in as closed records
    timeline
        .insert(WageRecord::closed(dec!(20), day(2025, 1, 1), day(2025, 6, 1)))
        .unwrap();
    assert_eq!(timeline.effective_wage(day(2025, 3, 1)), dec!(20));
    assert_eq!(timeline.effective_wage(day(2025, 7, 1)), dec!(30));
    assert!(timeline.overlaps().is_empty());
}
