//! Aggregate views over the token table.
//!
//! All three views (abstract lengths, per-category word frequencies,
//! per-category TF-IDF) are recomputed fully from the token table each run.
//! TF-IDF treats the outcome category as the document unit, so with two
//! categories it is a coarse, exploratory signal rather than a rigorous one.

use crate::models::{AbstractLength, Accepted, FrequencyRow, JoinedAbstract, TfIdfRow, Token};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Per-abstract token counts tagged with the outcome category.
///
/// Joined abstracts whose cleaned text produced no tokens are kept with a
/// count of zero so the length distribution reflects them.
#[must_use]
pub fn abstract_lengths(joined: &[JoinedAbstract], tokens: &[Token]) -> Vec<AbstractLength> {
    let mut counts: HashMap<u32, u64> = HashMap::new();
    for token in tokens {
        *counts.entry(token.abstract_id).or_insert(0) += 1;
    }

    joined
        .iter()
        .map(|row| AbstractLength {
            abstract_id: row.abstract_id,
            accepted: row.accepted,
            words: counts.get(&row.abstract_id).copied().unwrap_or(0),
        })
        .collect()
}

/// Occurrence counts per (category, word), over the category's pooled text.
///
/// Rows are ordered by category (`Accepted::ALL` order), count descending,
/// then word ascending, so output is deterministic.
#[must_use]
pub fn word_frequencies(joined: &[JoinedAbstract], tokens: &[Token]) -> Vec<FrequencyRow> {
    let category_of: HashMap<u32, Accepted> = joined
        .iter()
        .map(|row| (row.abstract_id, row.accepted))
        .collect();

    let mut counts: BTreeMap<(usize, String), u64> = BTreeMap::new();
    for token in tokens {
        let Some(accepted) = category_of.get(&token.abstract_id) else {
            continue;
        };
        let category_rank = Accepted::ALL
            .iter()
            .position(|c| c == accepted)
            .unwrap_or(Accepted::ALL.len());
        *counts
            .entry((category_rank, token.word.clone()))
            .or_insert(0) += 1;
    }

    let mut rows: Vec<FrequencyRow> = counts
        .into_iter()
        .map(|((category_rank, word), count)| FrequencyRow {
            accepted: Accepted::ALL[category_rank],
            word,
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        let rank = |r: &FrequencyRow| {
            Accepted::ALL
                .iter()
                .position(|c| *c == r.accepted)
                .unwrap_or(Accepted::ALL.len())
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.word.cmp(&b.word))
    });
    rows
}

/// Keep the `n` highest-count rows of each category
#[must_use]
pub fn top_frequencies(rows: &[FrequencyRow], n: usize) -> Vec<FrequencyRow> {
    let mut taken: HashMap<Accepted, usize> = HashMap::new();
    let mut top = Vec::new();
    for row in rows {
        let seen = taken.entry(row.accepted).or_insert(0);
        if *seen < n {
            top.push(row.clone());
            *seen += 1;
        }
    }
    top
}

/// TF-IDF per (category, word) with the category as the document unit.
///
/// `tf` is the word's count divided by the category's total token count;
/// `idf` is `ln(categories / categories containing the word)` over the
/// categories present in the data. A word appearing in every category
/// scores exactly zero.
#[must_use]
pub fn tf_idf(rows: &[FrequencyRow]) -> Vec<TfIdfRow> {
    let mut category_totals: HashMap<Accepted, u64> = HashMap::new();
    let mut word_categories: HashMap<&str, HashSet<Accepted>> = HashMap::new();
    for row in rows {
        *category_totals.entry(row.accepted).or_insert(0) += row.count;
        word_categories
            .entry(row.word.as_str())
            .or_default()
            .insert(row.accepted);
    }

    let n_categories = category_totals.len() as f64;

    let mut scored: Vec<TfIdfRow> = rows
        .iter()
        .map(|row| {
            let total = category_totals.get(&row.accepted).copied().unwrap_or(0);
            let tf = if total == 0 {
                0.0
            } else {
                row.count as f64 / total as f64
            };
            let containing = word_categories
                .get(row.word.as_str())
                .map_or(0, HashSet::len) as f64;
            let idf = if containing == 0.0 {
                0.0
            } else {
                (n_categories / containing).ln()
            };
            TfIdfRow {
                accepted: row.accepted,
                word: row.word.clone(),
                count: row.count,
                tf,
                idf,
                tf_idf: tf * idf,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        let rank = |r: &TfIdfRow| {
            Accepted::ALL
                .iter()
                .position(|c| *c == r.accepted)
                .unwrap_or(Accepted::ALL.len())
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| b.tf_idf.partial_cmp(&a.tf_idf).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.word.cmp(&b.word))
    });
    scored
}

/// Keep the `n` highest-scoring rows of each category
#[must_use]
pub fn top_tf_idf(rows: &[TfIdfRow], n: usize) -> Vec<TfIdfRow> {
    let mut taken: HashMap<Accepted, usize> = HashMap::new();
    let mut top = Vec::new();
    for row in rows {
        let seen = taken.entry(row.accepted).or_insert(0);
        if *seen < n {
            top.push(row.clone());
            *seen += 1;
        }
    }
    top
}
