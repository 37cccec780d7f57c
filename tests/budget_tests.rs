// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use worthit::budget::MAX_BUDGET_CATEGORIES;
use worthit::{BudgetStatus, BudgetTracker, CategoryBudgets, Error};

#[test]
fn percent_of_budget_is_clamped() {
    assert_eq!(BudgetTracker::percent_of_budget(dec!(1500), dec!(2000)), dec!(75));
    assert_eq!(BudgetTracker::percent_of_budget(dec!(2500), dec!(2000)), dec!(100));
    assert_eq!(BudgetTracker::percent_of_budget(dec!(0), dec!(2000)), dec!(0));
}

#[test]
fn zero_limit_reads_as_full_once_anything_is_spent() {
    assert_eq!(BudgetTracker::percent_of_budget(dec!(50), dec!(0)), dec!(100));
    assert_eq!(BudgetTracker::percent_of_budget(dec!(0), dec!(0)), dec!(0));
}

#[test]
fn huge_spending_clamps_instead_of_overflowing() {
    assert_eq!(
        BudgetTracker::percent_of_budget(Decimal::MAX, dec!(0.5)),
        dec!(100)
    );
    assert_eq!(
        BudgetTracker::percent_of_budget(Decimal::MAX, dec!(0.0000001)),
        dec!(100)
    );
    assert_eq!(
        BudgetTracker::status(BudgetTracker::percent_of_budget(Decimal::MAX, Decimal::ONE)),
        BudgetStatus::Over
    );
}

#[test]
fn percent_stays_in_range() {
    for spent in [dec!(0), dec!(0.01), dec!(10), dec!(999), dec!(1000000)] {
        for limit in [dec!(0), dec!(1), dec!(250), dec!(1000)] {
            let p = BudgetTracker::percent_of_budget(spent, limit);
            assert!(p >= Decimal::ZERO && p <= dec!(100), "{spent}/{limit} -> {p}");
        }
    }
}

#[test]
fn status_thresholds() {
    assert_eq!(BudgetTracker::status(dec!(75)), BudgetStatus::OnTrack);
    assert_eq!(BudgetTracker::status(dec!(75.5)), BudgetStatus::Warning);
    assert_eq!(BudgetTracker::status(dec!(90)), BudgetStatus::Warning);
    assert_eq!(BudgetTracker::status(dec!(90.1)), BudgetStatus::Over);
    assert_eq!(BudgetStatus::Over.label(), "over");
}

#[test]
fn at_most_five_categories() {
    let mut b = CategoryBudgets::new();
    for (i, cat) in ["Rent", "Food", "Transportation", "Fun", "Health"]
        .into_iter()
        .enumerate()
    {
        b.set(cat, Decimal::from(100 * (i + 1))).unwrap();
    }
    assert_eq!(b.len(), MAX_BUDGET_CATEGORIES);

    let err = b.set("Travel", dec!(50)).unwrap_err();
    assert!(matches!(err, Error::BudgetCapExceeded { cap: 5 }));
    assert!(b.get("Travel").is_none());

    // Updating an existing category is fine at the cap
    b.set("Food", dec!(450)).unwrap();
    assert_eq!(b.get("Food"), Some(dec!(450)));

    // Removing frees a slot
    b.remove("Fun").unwrap();
    b.set("Travel", dec!(50)).unwrap();
    assert_eq!(b.len(), 5);
}

#[test]
fn negative_limits_and_unknown_removals_fail() {
    let mut b = CategoryBudgets::new();
    assert!(matches!(
        b.set("Food", dec!(-1)),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(b.remove("Food"), Err(Error::NotFound(_))));
    b.set("Food", dec!(0)).unwrap();
    assert!(!b.is_empty());
}

#[test]
fn report_lists_budgeted_categories_then_overall() {
    let mut b = CategoryBudgets::new();
    b.set("Food", dec!(400)).unwrap();
    b.set("Rent", dec!(1000)).unwrap();
    b.set("Fun", dec!(0)).unwrap();

    let spent: BTreeMap<String, Decimal> = [
        ("Food".to_string(), dec!(380)),
        ("Rent".to_string(), dec!(1000)),
        ("Transportation".to_string(), dec!(75)),
    ]
    .into_iter()
    .collect();

    let lines = BudgetTracker::report(&spent, &b);
    let cats: Vec<&str> = lines.iter().map(|l| l.category.as_str()).collect();
    assert_eq!(cats, vec!["Food", "Fun", "Rent", "Overall"]);

    assert_eq!(lines[0].percent, dec!(95));
    assert_eq!(lines[0].status, BudgetStatus::Over);
    // Nothing spent against a zero limit
    assert_eq!(lines[1].percent, dec!(0));
    assert_eq!(lines[1].status, BudgetStatus::OnTrack);
    assert_eq!(lines[2].percent, dec!(100));

    let overall = &lines[3];
    assert_eq!(overall.spent, dec!(1380));
    assert_eq!(overall.limit, dec!(1400));
    assert_eq!(overall.status, BudgetStatus::Over);
}

#[test]
fn empty_budgets_give_an_empty_report() {
    let lines = BudgetTracker::report(&BTreeMap::new(), &CategoryBudgets::new());
    assert!(lines.is_empty());
}
