//! Abstract Insights - Conference Submission Analysis
//!
//! A Rust library for analyzing conference-abstract submissions: converting
//! PDF submissions to text, joining them with acceptance outcomes, and
//! producing token-level descriptive statistics and charts.
//!
//! # Pipeline
//!
//! - Convert PDFs to text with an external converter (`pdftotext -layout`)
//! - Extract title and abstract fields from the converted text
//! - Inner-join extracted records with the acceptance table
//! - Tokenize and clean abstract text (stop words, numbers)
//! - Aggregate word counts, frequencies, and TF-IDF per outcome category
//! - Render charts and a markdown report

/// Frequency and TF-IDF aggregation
pub mod analyze;
/// Configuration management
pub mod config;
/// External PDF-to-text conversion
pub mod convert;
/// Error types
pub mod error;
/// Marker-based field extraction
pub mod extract;
/// Acceptance table loading and joining
pub mod join;
/// Logging setup and utilities
pub mod logging;
/// Data models and structures
pub mod models;
/// Chart and report rendering
pub mod report;
/// Tokenization and cleaning
pub mod tokenize;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use convert::PdfConverter;
pub use extract::{FieldExtractor, MarkerSet};
pub use join::AcceptanceTable;
pub use models::{AbstractRecord, Accepted, JoinedAbstract, Token};
pub use tokenize::Tokenizer;
