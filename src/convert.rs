//! External PDF-to-text conversion.
//!
//! Each PDF in the input directory is handed to the configured converter
//! binary with its layout-preserving flag. Invocations are synchronous and
//! every file gets an explicit outcome; failures never abort the batch.

use crate::config::ConverterConfig;
use crate::error::{AbstractError, Result};
use crate::models::{ConversionOutcome, ConversionStatus, ConversionSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Runs the external converter over a directory of PDF submissions
#[derive(Debug, Clone)]
pub struct PdfConverter {
    binary: String,
    layout_flag: String,
}

impl PdfConverter {
    /// Create a converter for the given binary and layout flag
    #[must_use]
    pub fn new(binary: &str, layout_flag: &str) -> Self {
        Self {
            binary: binary.to_string(),
            layout_flag: layout_flag.to_string(),
        }
    }

    /// Create a converter from application configuration
    #[must_use]
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(&config.binary, &config.layout_flag)
    }

    /// Check that the converter binary is available on PATH
    pub fn ensure_available(&self) -> Result<()> {
        which::which(&self.binary).map_err(|_| {
            AbstractError::Converter(format!(
                "{} is not available on PATH",
                self.binary
            ))
        })?;
        Ok(())
    }

    /// Convert a single PDF, writing the text next to the given path
    pub fn convert_file(&self, pdf_path: &Path, txt_path: &Path) -> ConversionStatus {
        let status = match Command::new(&self.binary)
            .arg(&self.layout_flag)
            .arg(pdf_path)
            .arg(txt_path)
            .status()
        {
            Ok(status) => status,
            Err(err) => return ConversionStatus::LaunchFailed(err.to_string()),
        };

        if !status.success() {
            return ConversionStatus::ExitFailure(status.to_string());
        }
        if !txt_path.is_file() {
            return ConversionStatus::MissingOutput;
        }
        ConversionStatus::Converted
    }

    /// Convert every PDF in `pdf_dir`, writing `<name>.pdf.txt` files into
    /// `txt_dir`. Files whose text output already exists are skipped, so
    /// re-runs only convert what is missing.
    pub fn convert_dir(&self, pdf_dir: &Path, txt_dir: &Path) -> Result<Vec<ConversionOutcome>> {
        self.ensure_available()?;

        if !txt_dir.exists() {
            fs::create_dir_all(txt_dir)?;
        }

        let mut pdf_paths = list_pdfs(pdf_dir)?;
        pdf_paths.sort();
        info!(count = pdf_paths.len(), dir = %pdf_dir.display(), "Converting PDF submissions");

        let mut outcomes = Vec::with_capacity(pdf_paths.len());
        for pdf_path in pdf_paths {
            let txt_path = text_path_for(&pdf_path, txt_dir);

            if txt_path.is_file() {
                debug!(txt = %txt_path.display(), "Text already exists, skipping");
                outcomes.push(ConversionOutcome {
                    pdf: pdf_path,
                    txt: txt_path,
                    status: ConversionStatus::Skipped,
                });
                continue;
            }

            let status = self.convert_file(&pdf_path, &txt_path);
            match &status {
                ConversionStatus::Converted => {
                    debug!(pdf = %pdf_path.display(), "Converted");
                }
                ConversionStatus::LaunchFailed(err) => {
                    warn!(pdf = %pdf_path.display(), error = %err, "Failed to launch converter");
                }
                ConversionStatus::ExitFailure(code) => {
                    warn!(pdf = %pdf_path.display(), status = %code, "Converter failed");
                }
                ConversionStatus::MissingOutput => {
                    warn!(pdf = %pdf_path.display(), "Converter produced no output file");
                }
                ConversionStatus::Skipped => {}
            }
            outcomes.push(ConversionOutcome {
                pdf: pdf_path,
                txt: txt_path,
                status,
            });
        }

        Ok(outcomes)
    }

    /// Convert a directory and log the aggregate summary
    pub fn convert_dir_with_summary(
        &self,
        pdf_dir: &Path,
        txt_dir: &Path,
    ) -> Result<(Vec<ConversionOutcome>, ConversionSummary)> {
        let outcomes = self.convert_dir(pdf_dir, txt_dir)?;
        let summary = ConversionSummary::from_outcomes(&outcomes);
        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                attempted = summary.attempted,
                "Some PDF conversions failed"
            );
        } else {
            info!(
                converted = summary.converted,
                attempted = summary.attempted,
                "All PDF conversions succeeded"
            );
        }
        Ok((outcomes, summary))
    }
}

/// List the PDF files in a directory, non-recursively
fn list_pdfs(pdf_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(pdf_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Text output path for a PDF: `<txt_dir>/<file name>.txt`
fn text_path_for(pdf_path: &Path, txt_dir: &Path) -> PathBuf {
    let file_name = pdf_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown.pdf".to_string());
    txt_dir.join(format!("{file_name}.txt"))
}
