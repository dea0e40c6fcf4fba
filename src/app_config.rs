use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Throughput preset for the translation pipeline
    #[serde(default)]
    pub speed: SpeedPreset,

    /// Translation backend config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Subtitle search/download config
    #[serde(default)]
    pub download: DownloadConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translate endpoint
    #[default]
    Google,
    // @provider: LibreTranslate server
    LibreTranslate,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::LibreTranslate => "LibreTranslate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::LibreTranslate => "libretranslate".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "libretranslate" => Ok(Self::LibreTranslate),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Throughput preset: batch size and inter-batch delay.
///
/// Nothing else in the pipeline depends on the exact values; smaller
/// batches survive backend failures more cheaply, larger batches are
/// faster but lean harder on the alignment fallback.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
    Turbo,
}

impl SpeedPreset {
    /// Maximum entries per translation batch
    pub fn batch_size(&self) -> usize {
        match self {
            Self::Slow => 3,
            Self::Normal => 5,
            Self::Fast => 8,
            Self::Turbo => 12,
        }
    }

    /// Pause between batches, rate-limiting courtesy to the backend
    pub fn batch_delay(&self) -> Duration {
        let ms = match self {
            Self::Slow => 200,
            Self::Normal => 100,
            Self::Fast => 50,
            Self::Turbo => 20,
        };
        Duration::from_millis(ms)
    }
}

impl std::fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Turbo => "turbo",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SpeedPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            "turbo" => Ok(Self::Turbo),
            _ => Err(anyhow!("Invalid speed preset: {}", s)),
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Backend to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service endpoint URL (empty means the provider default)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key, for providers that take one
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retry attempts for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in milliseconds for exponential backoff
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl TranslationConfig {
    /// Resolved endpoint: configured value, or the provider default
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::LibreTranslate => default_libretranslate_endpoint(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Subtitle search and download configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadConfig {
    /// Search endpoint URL
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    /// User agent sent to subtitle catalogs
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum ranked candidates to keep
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_download_timeout_secs(),
            max_results: default_max_results(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            speed: SpeedPreset::default(),
            translation: TranslationConfig::default(),
            download: DownloadConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .with_context(|| format!("Invalid source language: {}", self.source_language))?;

        language_utils::validate_language_code(&self.target_language)
            .with_context(|| format!("Invalid target language: {}", self.target_language))?;

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {}",
                self.source_language
            ));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be greater than zero"));
        }

        if self.download.max_results == 0 {
            return Err(anyhow!("download.max_results must be greater than zero"));
        }

        Ok(())
    }
}

// Default values, referenced from the serde attributes above

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "tr".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_libretranslate_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_search_endpoint() -> String {
    "https://rest.opensubtitles.org".to_string()
}

fn default_user_agent() -> String {
    "subtran v1.1".to_string()
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_max_results() -> usize {
    15
}
