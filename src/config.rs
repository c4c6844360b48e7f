//! Configuration for postdex

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured connection string
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Main configuration, deserialized from a TOML file. Every section
/// defaults, so a missing file yields a fully working configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store connection
    #[serde(default)]
    pub store: StoreConfig,
    /// Loader pipeline
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Report pipeline
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.store.uri.trim().is_empty() {
            errors.push("store uri must not be empty".to_string());
        }
        if self.store.database.is_empty() {
            errors.push("store database must not be empty".to_string());
        }
        if self.store.collection.is_empty() {
            errors.push("store collection must not be empty".to_string());
        }

        if self.loader.posts_path.as_os_str().is_empty() {
            errors.push("posts_path must not be empty".to_string());
        }
        if self.loader.top_n == 0 {
            errors.push("top_n must be positive".to_string());
        }

        if self.report.output_dir.as_os_str().is_empty() {
            errors.push("output_dir must not be empty".to_string());
        }
        if self.report.above_average_file.is_empty() {
            errors.push("above_average_file must not be empty".to_string());
        }
        if self.report.keyword_file.is_empty() {
            errors.push("keyword_file must not be empty".to_string());
        }
        if self.report.keywords.is_empty() {
            errors.push("keywords must not be empty".to_string());
        }
        if self.report.keywords.iter().any(|k| k.trim().is_empty()) {
            errors.push("keywords must not contain blank entries".to_string());
        }

        if self.logging.dir.as_os_str().is_empty() {
            errors.push("log dir must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string; the MONGODB_URI environment variable takes
    /// precedence when set
    #[serde(default = "default_uri")]
    pub uri: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "stackexchange_db".to_string()
}

fn default_collection() -> String {
    "questions".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl StoreConfig {
    /// Connection string with the environment override applied
    pub fn resolved_uri(&self) -> String {
        resolve_uri(&self.uri, std::env::var(MONGODB_URI_ENV).ok())
    }
}

/// The environment value wins when set and non-blank
fn resolve_uri(configured: &str, env_value: Option<String>) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ => configured.to_string(),
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Loader pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Path to the posts XML export
    #[serde(default = "default_posts_path")]
    pub posts_path: PathBuf,
    /// How many records to keep, ranked by view count
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_posts_path() -> PathBuf {
    PathBuf::from("data/Posts.xml")
}

fn default_top_n() -> usize {
    10_000
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            posts_path: default_posts_path(),
            top_n: default_top_n(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Report pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the rendered PDFs are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name for the above-average-view-count report
    #[serde(default = "default_above_average_file")]
    pub above_average_file: String,
    /// File name for the keyword report
    #[serde(default = "default_keyword_file")]
    pub keyword_file: String,
    /// Keywords matched (case-insensitive) against question titles
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/out")
}

fn default_above_average_file() -> String {
    "above_average.pdf".to_string()
}

fn default_keyword_file() -> String {
    "keyword_titles.pdf".to_string()
}

fn default_keywords() -> Vec<String> {
    ["pug", "wig", "yak", "nap", "jig", "mug", "zap", "gag", "oaf", "elf"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            above_average_file: default_above_average_file(),
            keyword_file: default_keyword_file(),
            keywords: default_keywords(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Log severity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory the log file is written to
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    /// Log level (overridden by -v flags and RUST_LOG)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("data/logs")
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}
