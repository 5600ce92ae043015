//! Integration tests for acceptance-table loading and the join

use abstract_insights::extract::title_short;
use abstract_insights::join::{join_abstracts, AcceptanceTable};
use abstract_insights::models::{AbstractRecord, Accepted};
use std::io::Write;

fn write_csv(rows: &[(&str, &str)]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("acceptance.csv");
    let mut file = std::fs::File::create(&path).expect("create csv");
    writeln!(file, "Title,Accepted").expect("header");
    for (title, accepted) in rows {
        writeln!(file, "\"{title}\",{accepted}").expect("row");
    }
    (dir, path)
}

fn record(id: u32, title: &str) -> AbstractRecord {
    AbstractRecord {
        abstract_id: id,
        title: title.to_string(),
        title_short: title_short(title, 15),
        abstract_text: "Body text.".to_string(),
    }
}

#[test]
fn test_load_acceptance_csv() {
    let (_dir, path) = write_csv(&[
        ("Functional Programming Patterns", "yes"),
        ("Dashboards Nobody Asked For", "no"),
    ]);
    let table = AcceptanceTable::load(&path, 15).expect("load");
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.outcome(&title_short("Functional Programming Patterns", 15)),
        Some(Accepted::Yes)
    );
    assert_eq!(
        table.outcome(&title_short("Dashboards Nobody Asked For", 15)),
        Some(Accepted::No)
    );
}

#[test]
fn test_load_accepts_mixed_case_outcomes() {
    let (_dir, path) = write_csv(&[("Mixed Case Outcome", "Yes")]);
    let table = AcceptanceTable::load(&path, 15).expect("load");
    assert_eq!(
        table.outcome(&title_short("Mixed Case Outcome", 15)),
        Some(Accepted::Yes)
    );
}

#[test]
fn test_load_rejects_unknown_outcome() {
    let (_dir, path) = write_csv(&[("Strange Outcome Value", "waitlisted")]);
    assert!(AcceptanceTable::load(&path, 15).is_err());
}

#[test]
fn test_join_containment_property() {
    let (_dir, path) = write_csv(&[
        ("Spatial Models of City Growth", "yes"),
        ("Time Series for Retail", "no"),
    ]);
    let table = AcceptanceTable::load(&path, 15).expect("load");
    let records = vec![
        record(1, "Spatial Models of City Growth"),
        record(2, "Time Series for Retail"),
        record(3, "A Submission Nobody Reviewed"),
    ];
    let result = join_abstracts(records, &table);
    assert_eq!(result.joined.len(), 2);
    assert_eq!(result.unmatched, 1);
    for joined in &result.joined {
        assert!(
            table.outcome(&joined.title_short).is_some(),
            "joined row {} has a key absent from the acceptance table",
            joined.abstract_id
        );
    }
}

#[test]
fn test_join_key_tolerates_punctuation_differences() {
    // The committee's spreadsheet lost the punctuation the form kept.
    let (_dir, path) = write_csv(&[("Large Scale ML with R", "yes")]);
    let table = AcceptanceTable::load(&path, 15).expect("load");
    let records = vec![record(1, "Large-Scale ML, with R!")];
    let result = join_abstracts(records, &table);
    assert_eq!(result.joined.len(), 1);
}

#[test]
fn test_conflicting_duplicate_keys_fail_loading() {
    // Both titles truncate to the same join key but disagree on the outcome.
    let (_dir, path) = write_csv(&[
        ("Deep Learning Adventures in Biology", "yes"),
        ("Deep Learning Adventures in Finance", "no"),
    ]);
    assert!(AcceptanceTable::load(&path, 15).is_err());
}
