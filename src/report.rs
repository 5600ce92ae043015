//! Chart and report rendering.
//!
//! The report directory is the single user-facing artifact of a run: three
//! SVG charts, a markdown report embedding them alongside the aggregate
//! tables, and a machine-readable `summary.json`.

use crate::error::{AbstractError, Result};
use crate::models::{AbstractLength, Accepted, FrequencyRow, RunSummary, TfIdfRow};
use chrono::Local;
use plotters::prelude::*;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const DENSITY_CHART: &str = "length_density.svg";
const FREQUENCY_CHART: &str = "word_frequency.svg";
const TFIDF_CHART: &str = "tf_idf.svg";
const REPORT_FILE: &str = "report.md";
const SUMMARY_FILE: &str = "summary.json";

/// Grid resolution of the density curves
const KDE_GRID_POINTS: usize = 200;

const fn category_color(accepted: Accepted) -> RGBColor {
    match accepted {
        Accepted::Yes => RGBColor(31, 119, 180),
        Accepted::No => RGBColor(214, 39, 40),
    }
}

/// Render every report artifact into `output_dir` and return their paths.
///
/// `frequencies` and `tfidf` are expected to already be the per-category
/// top-N tables, ordered by category and rank.
pub fn render_report(
    output_dir: &Path,
    chart_size: (u32, u32),
    summary: &RunSummary,
    lengths: &[AbstractLength],
    frequencies: &[FrequencyRow],
    tfidf: &[TfIdfRow],
) -> Result<Vec<PathBuf>> {
    if lengths.is_empty() {
        return Err(AbstractError::EmptyCorpus(
            "no joined abstracts to report on".to_string(),
        ));
    }

    create_dir_all(output_dir)?;

    let density_path = output_dir.join(DENSITY_CHART);
    let frequency_path = output_dir.join(FREQUENCY_CHART);
    let tfidf_path = output_dir.join(TFIDF_CHART);
    let report_path = output_dir.join(REPORT_FILE);
    let summary_path = output_dir.join(SUMMARY_FILE);

    render_density_chart(&density_path, chart_size, lengths)?;
    render_bar_chart(
        &frequency_path,
        chart_size,
        "Most frequent words by outcome",
        "count",
        &frequencies
            .iter()
            .map(|row| (row.accepted, row.word.clone(), row.count as f64))
            .collect::<Vec<_>>(),
    )?;
    render_bar_chart(
        &tfidf_path,
        chart_size,
        "Highest TF-IDF words by outcome",
        "tf-idf",
        &tfidf
            .iter()
            .map(|row| (row.accepted, row.word.clone(), row.tf_idf))
            .collect::<Vec<_>>(),
    )?;

    let mut stamped = summary.clone();
    stamped.generated_at = Local::now().to_rfc3339();

    write_markdown_report(&report_path, &stamped, lengths, frequencies, tfidf)?;
    write_summary_json(&summary_path, &stamped)?;

    info!(dir = %output_dir.display(), "Report rendered");
    Ok(vec![
        density_path,
        frequency_path,
        tfidf_path,
        report_path,
        summary_path,
    ])
}

/// Gaussian kernel density estimate of `samples` evaluated over `grid`
fn gaussian_kde(samples: &[f64], grid: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return vec![0.0; grid.len()];
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    // Silverman's rule of thumb, floored so identical samples still spread
    let bandwidth = (1.06 * variance.sqrt() * n.powf(-0.2)).max(1.0);

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|x| {
            samples
                .iter()
                .map(|s| {
                    let z = (x - s) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

fn render_density_chart(
    path: &Path,
    size: (u32, u32),
    lengths: &[AbstractLength],
) -> Result<()> {
    let chart_err = |e: String| AbstractError::Chart(format!("{}: {e}", path.display()));

    let max_words = lengths.iter().map(|l| l.words).max().unwrap_or(0) as f64;
    let x_max = (max_words * 1.15).max(10.0);
    let grid: Vec<f64> = (0..KDE_GRID_POINTS)
        .map(|i| x_max * i as f64 / (KDE_GRID_POINTS - 1) as f64)
        .collect();

    let mut curves = Vec::new();
    let mut y_max = 0.0f64;
    for accepted in Accepted::ALL {
        let samples: Vec<f64> = lengths
            .iter()
            .filter(|l| l.accepted == accepted)
            .map(|l| l.words as f64)
            .collect();
        if samples.is_empty() {
            continue;
        }
        let density = gaussian_kde(&samples, &grid);
        y_max = density.iter().copied().fold(y_max, f64::max);
        curves.push((accepted, density));
    }
    let y_max = (y_max * 1.1).max(1e-6);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Abstract length by outcome", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(|e| chart_err(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("words per abstract")
        .y_desc("density")
        .draw()
        .map_err(|e| chart_err(e.to_string()))?;

    for (accepted, density) in curves {
        let color = category_color(accepted);
        chart
            .draw_series(LineSeries::new(
                grid.iter().copied().zip(density),
                color.stroke_width(2),
            ))
            .map_err(|e| chart_err(e.to_string()))?
            .label(format!("accepted = {}", accepted.label()))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| chart_err(e.to_string()))?;

    root.present().map_err(|e| chart_err(e.to_string()))?;
    Ok(())
}

/// One horizontal-bar panel per category, drawn into a single SVG
fn render_bar_chart(
    path: &Path,
    size: (u32, u32),
    title: &str,
    value_label: &str,
    rows: &[(Accepted, String, f64)],
) -> Result<()> {
    let chart_err = |e: String| AbstractError::Chart(format!("{}: {e}", path.display()));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(e.to_string()))?;
    let root = root
        .titled(title, ("sans-serif", 20))
        .map_err(|e| chart_err(e.to_string()))?;

    let panels = root.split_evenly((1, Accepted::ALL.len()));
    for (panel, accepted) in panels.iter().zip(Accepted::ALL) {
        // Bars ascend bottom-to-top, so reverse the ranked rows to put the
        // top-ranked word at the top of the panel.
        let panel_rows: Vec<&(Accepted, String, f64)> = rows
            .iter()
            .filter(|(cat, _, _)| *cat == accepted)
            .rev()
            .collect();
        let words: Vec<String> = panel_rows.iter().map(|(_, word, _)| word.clone()).collect();
        let x_max = panel_rows
            .iter()
            .map(|(_, _, value)| *value)
            .fold(0.0f64, f64::max)
            .max(1e-6)
            * 1.05;
        let n = panel_rows.len().max(1);

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("accepted = {}", accepted.label()),
                ("sans-serif", 16),
            )
            .margin(10)
            .x_label_area_size(36)
            .y_label_area_size(110)
            .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())
            .map_err(|e| chart_err(e.to_string()))?;

        let label_words = words.clone();
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(value_label)
            .y_labels(n)
            .y_label_formatter(&move |seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    label_words.get(*i).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(|e| chart_err(e.to_string()))?;

        let color = category_color(accepted);
        chart
            .draw_series(panel_rows.iter().enumerate().map(|(i, (_, _, value))| {
                Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(i)),
                        (*value, SegmentValue::Exact(i + 1)),
                    ],
                    color.mix(0.85).filled(),
                )
            }))
            .map_err(|e| chart_err(e.to_string()))?;
    }

    root.present().map_err(|e| chart_err(e.to_string()))?;
    Ok(())
}

fn write_markdown_report(
    path: &Path,
    summary: &RunSummary,
    lengths: &[AbstractLength],
    frequencies: &[FrequencyRow],
    tfidf: &[TfIdfRow],
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Abstract submissions: accepted vs. rejected")?;
    writeln!(writer)?;
    writeln!(writer, "Generated: {}", summary.generated_at)?;
    writeln!(writer)?;

    writeln!(writer, "## Pipeline summary")?;
    writeln!(writer)?;
    if let Some(conversion) = &summary.conversion {
        writeln!(
            writer,
            "- PDFs converted: {} of {} ({} failed)",
            conversion.converted, conversion.attempted, conversion.failed
        )?;
    }
    writeln!(writer, "- Text files read: {}", summary.text_files_read)?;
    writeln!(
        writer,
        "- Records extracted: {} ({} dropped for missing fields)",
        summary.records_extracted, summary.records_incomplete
    )?;
    writeln!(
        writer,
        "- Records joined with acceptance table: {} ({} unmatched)",
        summary.records_joined, summary.records_unmatched
    )?;
    writeln!(writer, "- Tokens after cleaning: {}", summary.token_count)?;
    for (label, count) in &summary.abstracts_per_category {
        writeln!(writer, "- Abstracts with accepted = {label}: {count}")?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Abstract length")?;
    writeln!(writer)?;
    for accepted in Accepted::ALL {
        let words: Vec<u64> = lengths
            .iter()
            .filter(|l| l.accepted == accepted)
            .map(|l| l.words)
            .collect();
        if words.is_empty() {
            continue;
        }
        let total: u64 = words.iter().sum();
        let mean = total as f64 / words.len() as f64;
        writeln!(
            writer,
            "- accepted = {}: {} abstracts, mean {:.1} words",
            accepted.label(),
            words.len(),
            mean
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "![Abstract length by outcome]({DENSITY_CHART})")?;
    writeln!(writer)?;

    writeln!(writer, "## Most frequent words")?;
    writeln!(writer)?;
    writeln!(writer, "| accepted | word | count |")?;
    writeln!(writer, "|----------|------|-------|")?;
    for row in frequencies {
        writeln!(
            writer,
            "| {} | {} | {} |",
            row.accepted.label(),
            row.word,
            row.count
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "![Most frequent words]({FREQUENCY_CHART})")?;
    writeln!(writer)?;

    writeln!(writer, "## Highest TF-IDF words")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "With only two categories the TF-IDF signal is coarse: a word used in"
    )?;
    writeln!(
        writer,
        "both categories scores exactly zero, so the table surfaces words"
    )?;
    writeln!(writer, "exclusive to one outcome.")?;
    writeln!(writer)?;
    writeln!(writer, "| accepted | word | count | tf | idf | tf-idf |")?;
    writeln!(writer, "|----------|------|-------|----|----|--------|")?;
    for row in tfidf {
        writeln!(
            writer,
            "| {} | {} | {} | {:.5} | {:.3} | {:.5} |",
            row.accepted.label(),
            row.word,
            row.count,
            row.tf,
            row.idf,
            row.tf_idf
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "![Highest TF-IDF words]({TFIDF_CHART})")?;

    writer.flush()?;
    Ok(())
}

fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kde_integrates_to_roughly_one() {
        let samples = vec![40.0, 45.0, 50.0, 55.0, 60.0, 80.0];
        let grid: Vec<f64> = (0..=400).map(|i| i as f64 * 0.5).collect();
        let density = gaussian_kde(&samples, &grid);
        let integral: f64 = density.iter().sum::<f64>() * 0.5;
        assert!((integral - 1.0).abs() < 0.05, "integral was {integral}");
    }

    #[test]
    fn test_kde_handles_identical_samples() {
        let samples = vec![50.0; 10];
        let grid: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let density = gaussian_kde(&samples, &grid);
        assert!(density.iter().all(|d| d.is_finite()));
        assert!(density[50] > density[0]);
    }

    #[test]
    fn test_kde_empty_samples() {
        let grid = vec![0.0, 1.0, 2.0];
        let density = gaussian_kde(&[], &grid);
        assert_eq!(density, vec![0.0, 0.0, 0.0]);
    }
}
