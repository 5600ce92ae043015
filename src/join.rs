//! Acceptance table loading and the acceptance join.
//!
//! The acceptance CSV is an independently sourced table with columns
//! `Title` and `Accepted`. Its titles run through the same normalizer as the
//! extracted titles, so the join key is consistent on both sides by
//! construction. The join is a deterministic inner join; extracted records
//! without a match are dropped and counted.

use crate::error::{AbstractError, Result};
use crate::extract::title_short;
use crate::models::{AbstractRecord, AcceptanceRecord, Accepted, JoinedAbstract};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the acceptance CSV as written by the programme committee
#[derive(Debug, Deserialize)]
struct AcceptanceRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Accepted")]
    accepted: String,
}

/// The acceptance table, keyed by normalized truncated title
#[derive(Debug, Clone)]
pub struct AcceptanceTable {
    by_title_short: HashMap<String, AcceptanceRecord>,
}

impl AcceptanceTable {
    /// Build a table from records, checking key consistency.
    ///
    /// Duplicate keys that agree on the outcome are collapsed with a
    /// warning; duplicate keys that disagree make the join outcome
    /// arbitrary and are rejected.
    pub fn new(records: Vec<AcceptanceRecord>) -> Result<Self> {
        let mut by_title_short: HashMap<String, AcceptanceRecord> = HashMap::new();
        for record in records {
            if record.title_short.is_empty() {
                return Err(AbstractError::AcceptanceTable(format!(
                    "title {:?} normalizes to an empty join key",
                    record.title
                )));
            }
            if let Some(existing) = by_title_short.get(&record.title_short) {
                if existing.accepted == record.accepted {
                    warn!(
                        title_short = %record.title_short,
                        "Duplicate acceptance rows with the same outcome, collapsing"
                    );
                    continue;
                }
                return Err(AbstractError::AcceptanceTable(format!(
                    "conflicting outcomes for truncated title {:?} ({:?} vs {:?})",
                    record.title_short, existing.title, record.title
                )));
            }
            by_title_short.insert(record.title_short.clone(), record);
        }
        Ok(Self { by_title_short })
    }

    /// Load the acceptance CSV and normalize its titles into join keys
    pub fn load(path: &Path, title_short_len: usize) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let row: AcceptanceRow = row?;
            let accepted = Accepted::parse(&row.accepted).ok_or_else(|| {
                AbstractError::AcceptanceTable(format!(
                    "unrecognized Accepted value {:?} for title {:?}",
                    row.accepted, row.title
                ))
            })?;
            let key = title_short(&row.title, title_short_len);
            records.push(AcceptanceRecord {
                title: row.title,
                title_short: key,
                accepted,
            });
        }
        info!(rows = records.len(), path = %path.display(), "Loaded acceptance table");
        Self::new(records)
    }

    /// Number of distinct join keys in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_title_short.len()
    }

    /// True when the table holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_title_short.is_empty()
    }

    /// Look up the outcome for a join key
    #[must_use]
    pub fn outcome(&self, title_short: &str) -> Option<Accepted> {
        self.by_title_short.get(title_short).map(|r| r.accepted)
    }
}

/// Result of joining extracted records with the acceptance table
#[derive(Debug, Default)]
pub struct JoinResult {
    /// Records that matched an acceptance row
    pub joined: Vec<JoinedAbstract>,
    /// Count of records dropped for lack of a match
    pub unmatched: usize,
}

/// Inner-join extracted records with the acceptance table on `title_short`.
///
/// Records whose join key is empty never match. Duplicate join keys among
/// the extracted records are allowed; each joins independently.
#[must_use]
pub fn join_abstracts(records: Vec<AbstractRecord>, table: &AcceptanceTable) -> JoinResult {
    let mut seen_keys: HashMap<String, u32> = HashMap::new();
    let mut result = JoinResult::default();

    for record in records {
        if let Some(previous) = seen_keys.get(&record.title_short) {
            warn!(
                title_short = %record.title_short,
                first_abstract_id = previous,
                abstract_id = record.abstract_id,
                "Truncated titles collide across submissions"
            );
        } else {
            seen_keys.insert(record.title_short.clone(), record.abstract_id);
        }

        match table.outcome(&record.title_short) {
            Some(accepted) if !record.title_short.is_empty() => {
                result.joined.push(JoinedAbstract::new(record, accepted));
            }
            _ => {
                debug!(
                    abstract_id = record.abstract_id,
                    title_short = %record.title_short,
                    "No acceptance match, dropping record"
                );
                result.unmatched += 1;
            }
        }
    }

    info!(
        joined = result.joined.len(),
        unmatched = result.unmatched,
        "Joined extracted records with acceptance table"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, title: &str, body: &str) -> AbstractRecord {
        AbstractRecord {
            abstract_id: id,
            title: title.to_string(),
            title_short: title_short(title, 15),
            abstract_text: body.to_string(),
        }
    }

    fn table(rows: &[(&str, Accepted)]) -> AcceptanceTable {
        let records = rows
            .iter()
            .map(|(title, accepted)| AcceptanceRecord {
                title: (*title).to_string(),
                title_short: title_short(title, 15),
                accepted: *accepted,
            })
            .collect();
        AcceptanceTable::new(records).expect("acceptance table")
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let table = table(&[("Tidy Evaluation Explained", Accepted::Yes)]);
        let records = vec![
            record(1, "Tidy Evaluation Explained", "Body one."),
            record(2, "Something Entirely Different", "Body two."),
        ];
        let result = join_abstracts(records, &table);
        assert_eq!(result.joined.len(), 1);
        assert_eq!(result.unmatched, 1);
        assert_eq!(result.joined[0].accepted, Accepted::Yes);
    }

    #[test]
    fn test_join_containment() {
        let table = table(&[
            ("Alpha Methods", Accepted::Yes),
            ("Beta Methods", Accepted::No),
        ]);
        let records = vec![
            record(1, "Alpha Methods", "a"),
            record(2, "Beta Methods", "b"),
            record(3, "Gamma Methods", "c"),
        ];
        let result = join_abstracts(records, &table);
        // Every joined row's key must exist in the acceptance table.
        for joined in &result.joined {
            assert!(table.outcome(&joined.title_short).is_some());
        }
    }

    #[test]
    fn test_empty_key_never_joins() {
        let table = table(&[("Alpha Methods", Accepted::Yes)]);
        let records = vec![record(1, "?!", "punctuation-only title")];
        let result = join_abstracts(records, &table);
        assert!(result.joined.is_empty());
        assert_eq!(result.unmatched, 1);
    }

    #[test]
    fn test_conflicting_duplicates_rejected() {
        let records = vec![
            AcceptanceRecord {
                title: "Same Short Title A".to_string(),
                title_short: "same short tit".to_string(),
                accepted: Accepted::Yes,
            },
            AcceptanceRecord {
                title: "Same Short Title B".to_string(),
                title_short: "same short tit".to_string(),
                accepted: Accepted::No,
            },
        ];
        assert!(AcceptanceTable::new(records).is_err());
    }

    #[test]
    fn test_agreeing_duplicates_collapse() {
        let records = vec![
            AcceptanceRecord {
                title: "Same Short Title A".to_string(),
                title_short: "same short tit".to_string(),
                accepted: Accepted::Yes,
            },
            AcceptanceRecord {
                title: "Same Short Title B".to_string(),
                title_short: "same short tit".to_string(),
                accepted: Accepted::Yes,
            },
        ];
        let table = AcceptanceTable::new(records).expect("table");
        assert_eq!(table.len(), 1);
    }
}
