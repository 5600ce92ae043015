//! Data models for the abstract analysis pipeline
//!
//! This module contains all data structures flowing through the pipeline:
//! extracted submission records, acceptance outcomes, the joined table,
//! word tokens, and the derived aggregate rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Acceptance outcome for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accepted {
    /// The submission was accepted
    Yes,
    /// The submission was rejected
    No,
}

impl Accepted {
    /// Both outcome categories, in reporting order
    pub const ALL: [Self; 2] = [Self::Yes, Self::No];

    /// Parse the CSV value, case-insensitively
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    /// Label used in charts and report tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Accepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One successfully extracted submission
///
/// `abstract_id` is sequential and stable only within a single run.
#[derive(Debug, Clone, Serialize)]
pub struct AbstractRecord {
    /// Sequential identifier assigned in file order
    pub abstract_id: u32,
    /// Title text as extracted
    pub title: String,
    /// Normalized, truncated title used as the join key
    pub title_short: String,
    /// Abstract body text as extracted
    pub abstract_text: String,
}

/// Acceptance outcome row as loaded from the external CSV
#[derive(Debug, Clone)]
pub struct AcceptanceRecord {
    /// Title as it appears in the acceptance table
    pub title: String,
    /// Normalized, truncated title used as the join key
    pub title_short: String,
    /// Acceptance outcome
    pub accepted: Accepted,
}

/// An extracted record joined with its acceptance outcome
#[derive(Debug, Clone, Serialize)]
pub struct JoinedAbstract {
    /// Sequential identifier of the underlying record
    pub abstract_id: u32,
    /// Title text as extracted
    pub title: String,
    /// Join key shared with the acceptance table
    pub title_short: String,
    /// Abstract body text
    pub abstract_text: String,
    /// Acceptance outcome from the joined table
    pub accepted: Accepted,
}

impl JoinedAbstract {
    /// Combine an extracted record with its matched outcome
    #[must_use]
    pub fn new(record: AbstractRecord, accepted: Accepted) -> Self {
        Self {
            abstract_id: record.abstract_id,
            title: record.title,
            title_short: record.title_short,
            abstract_text: record.abstract_text,
            accepted,
        }
    }
}

/// One cleaned word occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Identifier of the abstract the word came from
    pub abstract_id: u32,
    /// The word itself, lowercased
    pub word: String,
}

/// Token count for one abstract, tagged with its outcome category
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AbstractLength {
    /// Identifier of the abstract
    pub abstract_id: u32,
    /// Acceptance outcome of the abstract
    pub accepted: Accepted,
    /// Number of cleaned tokens in the abstract
    pub words: u64,
}

/// Occurrence count of a word within one outcome category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    /// Outcome category the count belongs to
    pub accepted: Accepted,
    /// The counted word
    pub word: String,
    /// Number of occurrences in the category's pooled text
    pub count: u64,
}

/// Frequency row extended with TF-IDF scores
///
/// The category is the document unit: `tf` is the word's share of the
/// category's tokens, `idf` is `ln(categories / categories containing the
/// word)`.
#[derive(Debug, Clone, Serialize)]
pub struct TfIdfRow {
    /// Outcome category the score belongs to
    pub accepted: Accepted,
    /// The scored word
    pub word: String,
    /// Number of occurrences in the category's pooled text
    pub count: u64,
    /// Term frequency within the category
    pub tf: f64,
    /// Inverse document frequency across categories
    pub idf: f64,
    /// Product of `tf` and `idf`
    pub tf_idf: f64,
}

/// Result of one external conversion attempt
#[derive(Debug, Clone)]
pub enum ConversionStatus {
    /// The converter produced the expected text file
    Converted,
    /// A text file already existed and the conversion was skipped
    Skipped,
    /// The converter process could not be launched
    LaunchFailed(String),
    /// The converter exited with a non-zero status
    ExitFailure(String),
    /// The converter reported success but produced no output file
    MissingOutput,
}

/// Per-file record of a conversion attempt
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Source PDF path
    pub pdf: PathBuf,
    /// Target text path
    pub txt: PathBuf,
    /// What happened
    pub status: ConversionStatus,
}

impl ConversionOutcome {
    /// True when a usable text file exists after the attempt
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self.status,
            ConversionStatus::Converted | ConversionStatus::Skipped
        )
    }
}

/// Aggregate counts over a batch of conversion attempts
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConversionSummary {
    /// PDFs found in the input directory
    pub attempted: usize,
    /// Conversions that produced (or already had) a text file
    pub converted: usize,
    /// Conversions that failed in any way
    pub failed: usize,
}

impl ConversionSummary {
    /// Summarize a batch of outcomes
    #[must_use]
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let converted = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            attempted: outcomes.len(),
            converted,
            failed: outcomes.len() - converted,
        }
    }
}

/// Run statistics written to `summary.json` and the report header
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// When the report was generated (RFC 3339)
    pub generated_at: String,
    /// Conversion counts, absent when only `analyze` ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionSummary>,
    /// Converted text files read
    pub text_files_read: usize,
    /// Records with both fields extracted
    pub records_extracted: usize,
    /// Records dropped for missing or empty fields
    pub records_incomplete: usize,
    /// Records that matched an acceptance row
    pub records_joined: usize,
    /// Records dropped for lack of an acceptance match
    pub records_unmatched: usize,
    /// Cleaned tokens across all joined abstracts
    pub token_count: usize,
    /// Joined abstracts per category, in `Accepted::ALL` order
    pub abstracts_per_category: Vec<(String, usize)>,
}
