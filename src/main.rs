//! Command-line entry point for abstract-insights.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use abstract_insights::analyze;
use abstract_insights::config::AppConfig;
use abstract_insights::convert::PdfConverter;
use abstract_insights::extract::{title_short, FieldExtractor, MarkerSet};
use abstract_insights::join::{join_abstracts, AcceptanceTable};
use abstract_insights::logging::{init_logging, StageTimer};
use abstract_insights::models::{AbstractRecord, Accepted, ConversionSummary, RunSummary};
use abstract_insights::report::render_report;
use abstract_insights::tokenize::Tokenizer;
use abstract_insights::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF submissions to text with the external converter
    Convert {
        /// Directory containing the PDF submissions
        #[arg(short, long)]
        pdf_dir: Option<PathBuf>,

        /// Directory receiving the converted text files
        #[arg(short, long)]
        txt_dir: Option<PathBuf>,
    },
    /// Analyze already-converted text files and render the report
    Analyze {
        /// Directory containing the converted text files
        #[arg(short, long)]
        txt_dir: Option<PathBuf>,

        /// Acceptance-outcome CSV (columns Title, Accepted)
        #[arg(short, long)]
        acceptance: Option<PathBuf>,

        /// Directory receiving charts and the report
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the full pipeline: convert, analyze, report
    Run {
        /// Directory containing the PDF submissions
        #[arg(short, long)]
        pdf_dir: Option<PathBuf>,

        /// Directory receiving the converted text files
        #[arg(short, long)]
        txt_dir: Option<PathBuf>,

        /// Acceptance-outcome CSV (columns Title, Accepted)
        #[arg(short, long)]
        acceptance: Option<PathBuf>,

        /// Directory receiving charts and the report
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(
        Some(&config.log_level()),
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    info!("Starting abstract-insights");

    // Parse command line arguments
    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert { pdf_dir, txt_dir } => {
            let pdf_dir = resolve_path(pdf_dir, &config.converter.pdf_dir);
            let txt_dir = resolve_path(txt_dir, &config.converter.txt_dir);
            convert_submissions(&config, &pdf_dir, &txt_dir)?;
        }
        Commands::Analyze {
            txt_dir,
            acceptance,
            output_dir,
        } => {
            let txt_dir = resolve_path(txt_dir, &config.converter.txt_dir);
            let acceptance = resolve_path(acceptance, &config.analysis.acceptance_csv);
            let output_dir = resolve_path(output_dir, &config.report.output_dir);
            analyze_submissions(&config, &txt_dir, &acceptance, &output_dir, None)?;
        }
        Commands::Run {
            pdf_dir,
            txt_dir,
            acceptance,
            output_dir,
        } => {
            let pdf_dir = resolve_path(pdf_dir, &config.converter.pdf_dir);
            let txt_dir = resolve_path(txt_dir, &config.converter.txt_dir);
            let acceptance = resolve_path(acceptance, &config.analysis.acceptance_csv);
            let output_dir = resolve_path(output_dir, &config.report.output_dir);
            let summary = convert_submissions(&config, &pdf_dir, &txt_dir)?;
            analyze_submissions(&config, &txt_dir, &acceptance, &output_dir, Some(summary))?;
        }
    }

    Ok(())
}

/// CLI override wins over the configured path
fn resolve_path(cli_value: &Option<PathBuf>, configured: &str) -> PathBuf {
    cli_value
        .clone()
        .unwrap_or_else(|| PathBuf::from(configured))
}

/// Convert every PDF submission in `pdf_dir` to text
fn convert_submissions(
    config: &AppConfig,
    pdf_dir: &Path,
    txt_dir: &Path,
) -> Result<ConversionSummary> {
    InputValidator::validate_pdf_dir(pdf_dir)?;
    InputValidator::validate_txt_dir(txt_dir)?;

    let timer = StageTimer::new("convert");
    let converter = PdfConverter::from_config(&config.converter);
    let (_, summary) = converter
        .convert_dir_with_summary(pdf_dir, txt_dir)
        .context("PDF conversion failed")?;
    timer.finish();

    Ok(summary)
}

/// Extract, join, tokenize, aggregate, and render the report
fn analyze_submissions(
    config: &AppConfig,
    txt_dir: &Path,
    acceptance_csv: &Path,
    output_dir: &Path,
    conversion: Option<ConversionSummary>,
) -> Result<()> {
    InputValidator::validate_txt_dir(txt_dir)?;
    InputValidator::validate_acceptance_csv(acceptance_csv)?;
    InputValidator::validate_output_dir(output_dir)?;
    InputValidator::validate_keep_words(&config.analysis.keep_words)?;

    let mut summary = RunSummary {
        conversion,
        ..RunSummary::default()
    };

    // Extract title/abstract fields from every converted file
    let timer = StageTimer::new("extract");
    let markers = MarkerSet::from_config(&config.extraction)?;
    let extractor = FieldExtractor::new(markers);
    let txt_paths = list_text_files(txt_dir)?;
    summary.text_files_read = txt_paths.len();
    info!(files = txt_paths.len(), dir = %txt_dir.display(), "Extracting fields");

    let mut records = Vec::new();
    let mut next_id: u32 = 1;
    for path in &txt_paths {
        let extracted = extractor
            .extract_file(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if !extracted.is_complete() {
            summary.records_incomplete += 1;
            continue;
        }
        let title = extracted.title.unwrap_or_default();
        let abstract_text = extracted.abstract_text.unwrap_or_default();
        records.push(AbstractRecord {
            abstract_id: next_id,
            title_short: title_short(&title, config.analysis.title_short_len),
            title,
            abstract_text,
        });
        next_id += 1;
    }
    summary.records_extracted = records.len();
    if summary.records_incomplete > 0 {
        warn!(
            dropped = summary.records_incomplete,
            "Some files were missing title or abstract markers"
        );
    }
    timer.finish();

    // Join with the acceptance table
    let timer = StageTimer::new("join");
    let table = AcceptanceTable::load(acceptance_csv, config.analysis.title_short_len)?;
    let join_result = join_abstracts(records, &table);
    summary.records_joined = join_result.joined.len();
    summary.records_unmatched = join_result.unmatched;
    timer.finish();

    // Tokenize and clean
    let timer = StageTimer::new("tokenize");
    let tokenizer = Tokenizer::english(config.analysis.keep_words.clone())?;
    let tokens = tokenizer.tokenize_abstracts(&join_result.joined);
    summary.token_count = tokens.len();
    info!(tokens = tokens.len(), "Tokenized joined abstracts");
    timer.finish();

    // Aggregate and render
    let timer = StageTimer::new("report");
    let lengths = analyze::abstract_lengths(&join_result.joined, &tokens);
    for accepted in Accepted::ALL {
        let count = lengths.iter().filter(|l| l.accepted == accepted).count();
        summary
            .abstracts_per_category
            .push((accepted.label().to_string(), count));
    }
    let frequencies = analyze::word_frequencies(&join_result.joined, &tokens);
    let top_frequencies = analyze::top_frequencies(&frequencies, config.analysis.frequency_top_n);
    let scored = analyze::tf_idf(&frequencies);
    let top_scored = analyze::top_tf_idf(&scored, config.analysis.tfidf_top_n);

    let artifacts = render_report(
        output_dir,
        (config.report.chart_width, config.report.chart_height),
        &summary,
        &lengths,
        &top_frequencies,
        &top_scored,
    )?;
    for artifact in &artifacts {
        info!(file = %artifact.display(), "Wrote report artifact");
    }
    timer.finish();

    info!("Analysis complete");
    Ok(())
}

/// List converted text files, sorted so abstract ids are stable per run
fn list_text_files(txt_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(txt_dir)
        .with_context(|| format!("Failed to read text dir {}", txt_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if is_txt {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
