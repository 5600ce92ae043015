//! End-to-end pipeline tests over converted text fixtures.
//!
//! These exercise everything downstream of the external converter:
//! extraction, the acceptance join, tokenization, aggregation, and report
//! rendering, against files laid out in a temporary directory.

use abstract_insights::analyze::{
    abstract_lengths, tf_idf, top_frequencies, top_tf_idf, word_frequencies,
};
use abstract_insights::extract::{title_short, FieldExtractor, MarkerSet};
use abstract_insights::join::{join_abstracts, AcceptanceTable};
use abstract_insights::models::{AbstractRecord, JoinedAbstract, RunSummary};
use abstract_insights::report::render_report;
use abstract_insights::tokenize::Tokenizer;
use std::fs;
use std::io::Write;
use std::path::Path;

const TITLE_SHORT_LEN: usize = 15;

fn extractor() -> FieldExtractor {
    let markers = MarkerSet::new(
        "submission-form-v1",
        "Title:",
        "Abstract:",
        vec![
            "Title:".to_string(),
            "Name:".to_string(),
            "Abstract:".to_string(),
            "Keywords:".to_string(),
        ],
    )
    .expect("marker set");
    FieldExtractor::new(markers)
}

fn write_submission(dir: &Path, name: &str, title: Option<&str>, body: Option<&str>) {
    let mut text = String::new();
    text.push_str("Name: A. Presenter\n");
    if let Some(title) = title {
        text.push_str(&format!("Title: {title}\n"));
    }
    if let Some(body) = body {
        text.push_str(&format!("Abstract: {body}\n"));
    }
    text.push_str("Keywords: testing\n");
    fs::write(dir.join(format!("{name}.pdf.txt")), text).expect("write submission");
}

fn write_acceptance(dir: &Path, rows: &[(&str, &str)]) -> std::path::PathBuf {
    let path = dir.join("acceptance.csv");
    let mut file = fs::File::create(&path).expect("create csv");
    writeln!(file, "Title,Accepted").expect("header");
    for (title, accepted) in rows {
        writeln!(file, "\"{title}\",{accepted}").expect("row");
    }
    path
}

/// Run everything downstream of the converter and return the joined rows
fn run_pipeline(txt_dir: &Path, acceptance_csv: &Path) -> Vec<JoinedAbstract> {
    let extractor = extractor();
    let mut txt_paths: Vec<_> = fs::read_dir(txt_dir)
        .expect("read txt dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    txt_paths.sort();

    let mut records = Vec::new();
    let mut next_id = 1u32;
    for path in &txt_paths {
        let extracted = extractor.extract_file(path).expect("extract");
        if !extracted.is_complete() {
            continue;
        }
        let title = extracted.title.unwrap_or_default();
        records.push(AbstractRecord {
            abstract_id: next_id,
            title_short: title_short(&title, TITLE_SHORT_LEN),
            title,
            abstract_text: extracted.abstract_text.unwrap_or_default(),
        });
        next_id += 1;
    }

    let table = AcceptanceTable::load(acceptance_csv, TITLE_SHORT_LEN).expect("acceptance");
    join_abstracts(records, &table).joined
}

#[test]
fn test_full_pipeline_produces_report_artifacts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let txt_dir = tmp.path().join("txt");
    fs::create_dir_all(&txt_dir).expect("txt dir");

    write_submission(
        &txt_dir,
        "a",
        Some("Bayesian Models of Survey Data"),
        Some("We fit Bayesian models in R and compare them against baselines."),
    );
    write_submission(
        &txt_dir,
        "b",
        Some("Visualizing Uncertainty at Scale"),
        Some("Uncertainty visualization helps audiences reason about models."),
    );
    let acceptance = write_acceptance(
        tmp.path(),
        &[
            ("Bayesian Models of Survey Data", "yes"),
            ("Visualizing Uncertainty at Scale", "no"),
        ],
    );

    let joined = run_pipeline(&txt_dir, &acceptance);
    assert_eq!(joined.len(), 2);

    let tokenizer = Tokenizer::english(vec!["r"]).expect("tokenizer");
    let tokens = tokenizer.tokenize_abstracts(&joined);
    assert!(!tokens.is_empty());

    let lengths = abstract_lengths(&joined, &tokens);
    let frequencies = word_frequencies(&joined, &tokens);
    let top_freq = top_frequencies(&frequencies, 20);
    let top_scored = top_tf_idf(&tf_idf(&frequencies), 10);

    let out_dir = tmp.path().join("report");
    let summary = RunSummary {
        text_files_read: 2,
        records_extracted: 2,
        records_joined: 2,
        token_count: tokens.len(),
        ..RunSummary::default()
    };
    let artifacts = render_report(
        &out_dir,
        (900, 500),
        &summary,
        &lengths,
        &top_freq,
        &top_scored,
    )
    .expect("render report");

    for artifact in &artifacts {
        assert!(artifact.is_file(), "missing artifact {}", artifact.display());
    }
    assert!(out_dir.join("report.md").is_file());
    assert!(out_dir.join("summary.json").is_file());
    assert!(out_dir.join("length_density.svg").is_file());
    assert!(out_dir.join("word_frequency.svg").is_file());
    assert!(out_dir.join("tf_idf.svg").is_file());

    let report = fs::read_to_string(out_dir.join("report.md")).expect("read report");
    assert!(report.contains("## Most frequent words"));
    assert!(report.contains("## Highest TF-IDF words"));
}

#[test]
fn test_missing_abstract_marker_drops_exactly_one_row() {
    let acceptance_rows: &[(&str, &str)] = &[
        ("Topic Modeling the News", "yes"),
        ("Survival Analysis in Production", "no"),
        ("Teaching Statistics with Games", "yes"),
    ];

    // Run A: every submission is well-formed.
    let tmp_a = tempfile::tempdir().expect("tempdir");
    let txt_a = tmp_a.path().join("txt");
    fs::create_dir_all(&txt_a).expect("txt dir");
    write_submission(&txt_a, "1", Some("Topic Modeling the News"), Some("Body one."));
    write_submission(
        &txt_a,
        "2",
        Some("Survival Analysis in Production"),
        Some("Body two."),
    );
    write_submission(
        &txt_a,
        "3",
        Some("Teaching Statistics with Games"),
        Some("Body three."),
    );
    let acceptance_a = write_acceptance(tmp_a.path(), acceptance_rows);
    let joined_a = run_pipeline(&txt_a, &acceptance_a);

    // Run B: identical, except one file lost its Abstract: marker.
    let tmp_b = tempfile::tempdir().expect("tempdir");
    let txt_b = tmp_b.path().join("txt");
    fs::create_dir_all(&txt_b).expect("txt dir");
    write_submission(&txt_b, "1", Some("Topic Modeling the News"), Some("Body one."));
    write_submission(&txt_b, "2", Some("Survival Analysis in Production"), None);
    write_submission(
        &txt_b,
        "3",
        Some("Teaching Statistics with Games"),
        Some("Body three."),
    );
    let acceptance_b = write_acceptance(tmp_b.path(), acceptance_rows);
    let joined_b = run_pipeline(&txt_b, &acceptance_b);

    assert_eq!(joined_a.len(), 3);
    assert_eq!(joined_b.len(), joined_a.len() - 1);
}

#[test]
fn test_empty_joined_table_is_a_report_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out_dir = tmp.path().join("report");
    let summary = RunSummary::default();
    let result = render_report(&out_dir, (900, 500), &summary, &[], &[], &[]);
    assert!(result.is_err());
}
