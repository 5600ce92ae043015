//! Marker-based field extraction from converted submission text.
//!
//! The submission form renders each field behind a labelled marker
//! ("Title:", "Abstract:", ...). The marker vocabulary is one specific form
//! layout's rendering, so it is carried as a versioned [`MarkerSet`] built
//! from configuration rather than hardcoded.

use crate::config::ExtractionConfig;
use crate::error::{AbstractError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Versioned marker vocabulary of one submission-form layout
#[derive(Debug, Clone)]
pub struct MarkerSet {
    version: String,
    title_marker: String,
    abstract_marker: String,
    terminators: Vec<String>,
}

impl MarkerSet {
    /// Build a marker set. The title and abstract markers are always part of
    /// the terminator list, whether or not the caller included them.
    pub fn new(
        version: &str,
        title_marker: &str,
        abstract_marker: &str,
        terminators: Vec<String>,
    ) -> Result<Self> {
        if title_marker.trim().is_empty() || abstract_marker.trim().is_empty() {
            return Err(AbstractError::InvalidConfig(
                "field markers cannot be empty".to_string(),
            ));
        }
        let mut terminators = terminators;
        for marker in [title_marker, abstract_marker] {
            if !terminators.iter().any(|t| t == marker) {
                terminators.push(marker.to_string());
            }
        }
        Ok(Self {
            version: version.to_string(),
            title_marker: title_marker.to_string(),
            abstract_marker: abstract_marker.to_string(),
            terminators,
        })
    }

    /// Build the marker set described by the extraction configuration
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(
            &config.form_version,
            &config.title_marker,
            &config.abstract_marker,
            config.terminators.clone(),
        )
    }

    /// Version label of the form layout
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Earliest marker occurring in the line, with the text after it
    fn match_line<'a>(&self, line: &'a str) -> Option<(&str, &'a str)> {
        self.terminators
            .iter()
            .filter_map(|marker| line.find(marker.as_str()).map(|pos| (pos, marker)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(pos, marker)| (marker.as_str(), &line[pos + marker.len()..]))
    }
}

/// Fields pulled out of one converted submission file
///
/// A `None` field means its marker was absent or malformed; such records are
/// dropped before the acceptance join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSubmission {
    /// Text following the title marker, if the marker was found
    pub title: Option<String>,
    /// Text following the abstract marker, if the marker was found
    pub abstract_text: Option<String>,
}

impl ExtractedSubmission {
    /// True when both fields were found and are non-empty
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let filled = |field: &Option<String>| {
            field.as_deref().is_some_and(|text| !text.trim().is_empty())
        };
        filled(&self.title) && filled(&self.abstract_text)
    }
}

/// Which field a scanned line currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Abstract,
}

/// Extracts title and abstract fields from converted submission text
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    markers: MarkerSet,
}

impl FieldExtractor {
    /// Create an extractor for the given marker set
    #[must_use]
    pub fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    /// The marker set in use
    #[must_use]
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Extract fields from the ordered lines of one converted file.
    ///
    /// A field starts on the line containing its marker (the text after the
    /// marker is included) and runs until a line containing any other known
    /// marker, or end of input. Only the first occurrence of each extracted
    /// field's marker opens a capture; later occurrences merely terminate
    /// whatever field was open.
    #[must_use]
    pub fn extract_text(&self, text: &str) -> ExtractedSubmission {
        let mut title: Option<Vec<String>> = None;
        let mut abstract_text: Option<Vec<String>> = None;
        let mut current = Field::None;

        for line in text.lines() {
            if let Some((marker, rest)) = self.markers.match_line(line) {
                current = if marker == self.markers.title_marker && title.is_none() {
                    title = Some(Vec::new());
                    Field::Title
                } else if marker == self.markers.abstract_marker && abstract_text.is_none() {
                    abstract_text = Some(Vec::new());
                    Field::Abstract
                } else {
                    Field::None
                };
                let rest = rest.trim();
                if !rest.is_empty() {
                    match current {
                        Field::Title => {
                            if let Some(lines) = title.as_mut() {
                                lines.push(rest.to_string());
                            }
                        }
                        Field::Abstract => {
                            if let Some(lines) = abstract_text.as_mut() {
                                lines.push(rest.to_string());
                            }
                        }
                        Field::None => {}
                    }
                }
                continue;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match current {
                Field::Title => {
                    if let Some(lines) = title.as_mut() {
                        lines.push(line.to_string());
                    }
                }
                Field::Abstract => {
                    if let Some(lines) = abstract_text.as_mut() {
                        lines.push(line.to_string());
                    }
                }
                Field::None => {}
            }
        }

        ExtractedSubmission {
            title: title.map(|lines| lines.join(" ")),
            abstract_text: abstract_text.map(|lines| lines.join(" ")),
        }
    }

    /// Extract fields from a converted file on disk
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedSubmission> {
        let text = fs::read_to_string(path)?;
        let extracted = self.extract_text(&text);
        if !extracted.is_complete() {
            debug!(
                file = %path.display(),
                form_version = self.markers.version(),
                "Markers missing or empty, record will be dropped"
            );
        }
        Ok(extracted)
    }
}

fn punctuation_regex() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]").unwrap_or_else(|_| unreachable!()))
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap_or_else(|_| unreachable!()))
}

/// Derive the join key from a title.
///
/// Both sides of the acceptance join must use this exact normalization:
/// Unicode NFC, punctuation replaced by spaces, whitespace collapse,
/// lowercasing, then truncation to the first `len` characters. Replacing
/// rather than deleting punctuation keeps "Large-Scale" and "Large Scale"
/// on the same key.
#[must_use]
pub fn title_short(title: &str, len: usize) -> String {
    let normalized: String = title.nfc().collect();
    let no_punct = punctuation_regex().replace_all(&normalized, " ");
    let collapsed = whitespace_regex().replace_all(&no_punct, " ");
    let lowered = collapsed.trim().to_lowercase();
    let truncated: String = lowered.chars().take(len).collect();
    truncated.trim_end().to_string()
}
