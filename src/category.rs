// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Known categories and their display palette.
//!
//! Transaction categories are free-form. Anything outside the configured
//! list is reported under [`FALLBACK_CATEGORY`] and drawn in [`DEFAULT_COLOR`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const FALLBACK_CATEGORY: &str = "Other";

pub const DEFAULT_CATEGORIES: [&str; 4] = ["Rent", "Food", "Transportation", FALLBACK_CATEGORY];

pub const DEFAULT_COLOR: &str = "#95A5A6";

static PALETTE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Rent", "#FF6B6B"),
        ("Food", "#4ECDC4"),
        ("Transportation", "#45B7D1"),
        ("Entertainment", "#96CEB4"),
        ("Shopping", "#FFEAA7"),
        ("Utilities", "#DDA0DD"),
        ("Health", "#98D8C8"),
        ("Salary", "#2ECC71"),
    ])
});

pub fn category_color(name: &str) -> &'static str {
    PALETTE.get(name).copied().unwrap_or(DEFAULT_COLOR)
}

/// The ordered set of categories reports are broken down by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// Builds a set from `names`, dropping blanks and duplicates. The fallback
    /// category is always present and always last.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for n in names {
            let n = n.as_ref().trim();
            if n.is_empty() || n == FALLBACK_CATEGORY || out.iter().any(|o| o == n) {
                continue;
            }
            out.push(n.to_string());
        }
        out.push(FALLBACK_CATEGORY.to_string());
        Self { names: out }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Maps a free-form category onto a known one.
    pub fn resolve<'a>(&'a self, category: &str) -> &'a str {
        self.names
            .iter()
            .find(|n| n.as_str() == category)
            .map(|n| n.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES)
    }
}
