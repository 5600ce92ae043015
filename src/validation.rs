use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the PDF input directory
    pub fn validate_pdf_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!("PDF directory does not exist: {}", path.display()));
        }
        if !path.is_dir() {
            return Err(anyhow!("PDF path is not a directory: {}", path.display()));
        }
        Ok(())
    }

    /// Validate the converted-text directory
    pub fn validate_txt_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(anyhow!("Text path is not a directory: {}", path.display()));
        }
        Ok(())
    }

    /// Validate the acceptance CSV path
    pub fn validate_acceptance_csv(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!(
                "Acceptance table does not exist: {}",
                path.display()
            ));
        }
        if !path.is_file() {
            return Err(anyhow!(
                "Acceptance table is not a file: {}",
                path.display()
            ));
        }
        Ok(())
    }

    /// Validate the report output directory target
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(anyhow!(
                "Output path exists and is not a directory: {}",
                path.display()
            ));
        }
        Ok(())
    }

    /// Validate the stop-word keep-list
    pub fn validate_keep_words(keep_words: &[String]) -> Result<()> {
        for word in keep_words {
            if word.trim().is_empty() {
                return Err(anyhow!("keep_words entries cannot be empty"));
            }
            if word.chars().any(char::is_whitespace) {
                return Err(anyhow!(
                    "keep_words entry contains whitespace: {:?}",
                    word
                ));
            }
            if word.chars().any(char::is_uppercase) {
                return Err(anyhow!(
                    "keep_words entry must be lowercase (tokens are lowercased): {:?}",
                    word
                ));
            }
        }
        Ok(())
    }
}
