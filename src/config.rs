use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub converter: ConverterConfig,
    pub extraction: ExtractionConfig,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// External PDF-to-text converter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Converter binary, looked up on PATH
    pub binary: String,
    /// Flag that preserves the submission form's layout in the text output
    pub layout_flag: String,
    /// Directory containing the PDF submissions
    pub pdf_dir: String,
    /// Directory receiving the converted text files
    pub txt_dir: String,
}

/// Marker vocabulary of the submission form, treated as a versioned
/// parsing contract rather than hardcoded constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Version label of the form layout these markers describe
    pub form_version: String,
    /// Marker introducing the title field
    pub title_marker: String,
    /// Marker introducing the abstract field
    pub abstract_marker: String,
    /// All field markers of the form; any of them ends the preceding field
    pub terminators: Vec<String>,
}

/// Join and tokenization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Path of the acceptance-outcome CSV (columns Title, Accepted)
    pub acceptance_csv: String,
    /// Characters kept when truncating normalized titles into join keys
    pub title_short_len: usize,
    /// Stop words retained despite appearing in the stop list
    pub keep_words: Vec<String>,
    /// Words shown per category in the frequency chart
    pub frequency_top_n: usize,
    /// Words shown per category in the TF-IDF chart
    pub tfidf_top_n: usize,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving charts, report.md and summary.json
    pub output_dir: String,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            converter: ConverterConfig {
                binary: "pdftotext".to_string(),
                layout_flag: "-layout".to_string(),
                pdf_dir: "data/abstracts".to_string(),
                txt_dir: "data/abstracts".to_string(),
            },
            extraction: ExtractionConfig {
                form_version: "submission-form-v1".to_string(),
                title_marker: "Title:".to_string(),
                abstract_marker: "Abstract:".to_string(),
                terminators: vec![
                    "Title:".to_string(),
                    "Name:".to_string(),
                    "Affiliation:".to_string(),
                    "Email:".to_string(),
                    "Keywords:".to_string(),
                    "Abstract:".to_string(),
                ],
            },
            analysis: AnalysisConfig {
                acceptance_csv: "data/acceptance.csv".to_string(),
                title_short_len: 15,
                keep_words: vec!["r".to_string()],
                frequency_top_n: 20,
                tfidf_top_n: 10,
            },
            report: ReportConfig {
                output_dir: "report".to_string(),
                chart_width: 900,
                chart_height: 500,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        // Start with default values
        for (key, value) in AppConfig::default() {
            builder = builder
                .set_default(key.as_str(), value)
                .map_err(|e| anyhow::anyhow!("Failed to set default: {}", e))?;
        }

        let config = builder
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("ABSTRACT_INSIGHTS").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate converter config
        if self.converter.binary.trim().is_empty() {
            return Err(anyhow::anyhow!("converter.binary cannot be empty"));
        }

        // Validate extraction config
        if self.extraction.title_marker.trim().is_empty() {
            return Err(anyhow::anyhow!("extraction.title_marker cannot be empty"));
        }
        if self.extraction.abstract_marker.trim().is_empty() {
            return Err(anyhow::anyhow!("extraction.abstract_marker cannot be empty"));
        }
        if self.extraction.terminators.is_empty() {
            return Err(anyhow::anyhow!("extraction.terminators cannot be empty"));
        }

        // Validate analysis config
        if self.analysis.title_short_len == 0 {
            return Err(anyhow::anyhow!("title_short_len must be greater than 0"));
        }
        if self.analysis.frequency_top_n == 0 {
            return Err(anyhow::anyhow!("frequency_top_n must be greater than 0"));
        }
        if self.analysis.tfidf_top_n == 0 {
            return Err(anyhow::anyhow!("tfidf_top_n must be greater than 0"));
        }

        // Validate report config
        if self.report.chart_width == 0 || self.report.chart_height == 0 {
            return Err(anyhow::anyhow!("chart dimensions must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, config::Value>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = std::collections::HashMap::new();

        // Flatten the configuration into key-value pairs
        map.insert(
            "converter.binary".to_string(),
            config::Value::from(self.converter.binary),
        );
        map.insert(
            "converter.layout_flag".to_string(),
            config::Value::from(self.converter.layout_flag),
        );
        map.insert(
            "converter.pdf_dir".to_string(),
            config::Value::from(self.converter.pdf_dir),
        );
        map.insert(
            "converter.txt_dir".to_string(),
            config::Value::from(self.converter.txt_dir),
        );

        map.insert(
            "extraction.form_version".to_string(),
            config::Value::from(self.extraction.form_version),
        );
        map.insert(
            "extraction.title_marker".to_string(),
            config::Value::from(self.extraction.title_marker),
        );
        map.insert(
            "extraction.abstract_marker".to_string(),
            config::Value::from(self.extraction.abstract_marker),
        );
        map.insert(
            "extraction.terminators".to_string(),
            config::Value::from(self.extraction.terminators),
        );

        map.insert(
            "analysis.acceptance_csv".to_string(),
            config::Value::from(self.analysis.acceptance_csv),
        );
        map.insert(
            "analysis.title_short_len".to_string(),
            config::Value::from(self.analysis.title_short_len as u64),
        );
        map.insert(
            "analysis.keep_words".to_string(),
            config::Value::from(self.analysis.keep_words),
        );
        map.insert(
            "analysis.frequency_top_n".to_string(),
            config::Value::from(self.analysis.frequency_top_n as u64),
        );
        map.insert(
            "analysis.tfidf_top_n".to_string(),
            config::Value::from(self.analysis.tfidf_top_n as u64),
        );

        map.insert(
            "report.output_dir".to_string(),
            config::Value::from(self.report.output_dir),
        );
        map.insert(
            "report.chart_width".to_string(),
            config::Value::from(self.report.chart_width as u64),
        );
        map.insert(
            "report.chart_height".to_string(),
            config::Value::from(self.report.chart_height as u64),
        );

        map.insert(
            "logging.level".to_string(),
            config::Value::from(self.logging.level),
        );
        if let Some(file_path) = self.logging.file_path {
            map.insert("logging.file_path".to_string(), config::Value::from(file_path));
        }
        map.insert(
            "logging.format".to_string(),
            config::Value::from(self.logging.format),
        );

        map.into_iter()
    }
}
