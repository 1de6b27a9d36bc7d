//! Reordering of the category list before layout.
//!
//! Both functions return a new list; the provider's ordering is never modified.

use crate::matrix::{Category, Item};
use crate::selector::ItemTable;
use crate::{Error, Result};
use std::cmp::Ordering;

/// Item order within each column (navigator `sorting` values 0–3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    NameAscending,
    NameDescending,
    ScoreAscending,
    ScoreDescending,
}

impl TryFrom<i64> for SortMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(SortMode::NameAscending),
            1 => Ok(SortMode::NameDescending),
            2 => Ok(SortMode::ScoreAscending),
            3 => Ok(SortMode::ScoreDescending),
            other => Err(Error::InvalidLayer {
                message: format!("unknown sorting mode {other}"),
            }),
        }
    }
}

fn by_name(a: &Item, b: &Item) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
}

/// Sorts the items of every category. Unscored items sort as score `0`; ties fall back to name
/// order so the result is fully deterministic.
pub fn reorder(categories: &[Category], mode: SortMode, scores: &ItemTable<f64>) -> Vec<Category> {
    categories
        .iter()
        .map(|category| {
            let mut out = category.clone();
            let key = category.key();
            let score = |item: &Item| scores.get(key, &item.id).copied().unwrap_or(0.0);
            match mode {
                SortMode::NameAscending => out.items.sort_by(by_name),
                SortMode::NameDescending => out.items.sort_by(|a, b| by_name(b, a)),
                SortMode::ScoreAscending => out
                    .items
                    .sort_by(|a, b| score(a).total_cmp(&score(b)).then_with(|| by_name(a, b))),
                SortMode::ScoreDescending => out
                    .items
                    .sort_by(|a, b| score(b).total_cmp(&score(a)).then_with(|| by_name(a, b))),
            }
            out
        })
        .collect()
}

/// Moves the categories named in `keys` to the front, in that order. Unknown keys are ignored
/// and the remaining categories keep their relative order.
pub fn order_columns(categories: &[Category], keys: &[String]) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::with_capacity(categories.len());
    for key in keys {
        if out.iter().any(|c| c.key() == key) {
            continue;
        }
        if let Some(c) = categories.iter().find(|c| c.key() == key) {
            out.push(c.clone());
        }
    }
    for c in categories {
        if !out.iter().any(|o| o.key() == c.key()) {
            out.push(c.clone());
        }
    }
    out
}
