//! Tokenization and cleaning of abstract text.
//!
//! The stop-word table and keep-list are explicit inputs to the tokenizer,
//! passed in at construction rather than read from ambient state. The
//! default English stop list comes from the `stop-words` crate; the default
//! keep-list retains "r", which reads as noise to a stop list but is the
//! language most of these abstracts are about.

use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::models::{JoinedAbstract, Token};

/// Splits abstract text into cleaned, lowercased word tokens
pub struct Tokenizer {
    stopwords: HashSet<String>,
    keep: HashSet<String>,
    special_chars_regex: Regex,
}

impl Tokenizer {
    /// Create a tokenizer with explicit stop-word and keep-list tables
    pub fn new(stopwords: HashSet<String>, keep: HashSet<String>) -> Result<Self> {
        let special_chars_regex = Regex::new(r"[^\w\s']")
            .map_err(|e| anyhow::anyhow!("Failed to compile special chars regex: {e}"))?;
        Ok(Self {
            stopwords,
            keep,
            special_chars_regex,
        })
    }

    /// Create a tokenizer with the standard English stop list and the given
    /// keep-list
    pub fn english<I>(keep_words: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(ToString::to_string)
            .collect();
        let keep = keep_words.into_iter().map(|w| w.to_string()).collect();
        Self::new(stopwords, keep)
    }

    /// Tokenize one text into cleaned words.
    ///
    /// The text is NFC-normalized and lowercased, split on anything that is
    /// not a word character or apostrophe, then filtered: stop words are
    /// dropped unless kept, and tokens that parse fully as numbers are
    /// dropped.
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfc().collect::<String>().to_lowercase();
        let no_special = self.special_chars_regex.replace_all(&normalized, " ");

        no_special
            .split_whitespace()
            .map(|word| word.trim_matches('\''))
            .filter(|word| !word.is_empty())
            .filter(|word| self.keep.contains(*word) || !self.stopwords.contains(*word))
            .filter(|word| word.parse::<f64>().is_err())
            .map(ToString::to_string)
            .collect()
    }

    /// Tokenize all joined abstracts into a flat token table
    #[must_use]
    pub fn tokenize_abstracts(&self, joined: &[JoinedAbstract]) -> Vec<Token> {
        let mut tokens = Vec::new();
        for abstract_row in joined {
            for word in self.tokens(&abstract_row.abstract_text) {
                tokens.push(Token {
                    abstract_id: abstract_row.abstract_id,
                    word,
                });
            }
        }
        tokens
    }
}
