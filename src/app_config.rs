use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::translation::GatewayOptions;
use crate::translation::gateway::DEFAULT_CALL_TIMEOUT;
use crate::xliff::TranslatorOptions;

/// Application configuration module
/// This module handles loading and validating the optional JSON
/// configuration file. Every field has a default, so a missing file or a
/// partial one is fine.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file receiving a copy of every log line
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Translate web endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
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
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (Ollama only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: HTTP timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Minimum delay in milliseconds between consecutive backend calls
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Upper bound in seconds for one translation, retries included
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Retry count for failed requests (Ollama)
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Keep the source text and mark units translated when the backend fails
    #[serde(default = "default_true")]
    pub mark_failed_as_translated: bool,

    /// Memoize translations for the duration of a run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// File extensions identifying XLIFF documents
    #[serde(default = "default_xliff_extensions")]
    pub xliff_extensions: Vec<String>,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            call_timeout_secs: default_call_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            mark_failed_as_translated: true,
            cache_enabled: true,
            xliff_extensions: default_xliff_extensions(),
        }
    }
}

impl TranslationCommonConfig {
    /// Gateway settings derived from this configuration
    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            min_interval: Duration::from_millis(self.rate_limit_delay_ms),
            call_timeout: Duration::from_secs(self.call_timeout_secs),
            cache_enabled: self.cache_enabled,
        }
    }

    /// Translator settings derived from this configuration
    pub fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            mark_failed_as_translated: self.mark_failed_as_translated,
        }
    }
}

/// Log verbosity level
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

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ollama_timeout_secs() -> u64 {
    60
}

fn default_call_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT.as_secs()
}

fn default_rate_limit_delay_ms() -> u64 {
    200
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_true() -> bool {
    true
}

fn default_xliff_extensions() -> Vec<String> {
    vec!["xliff".to_string()]
}

fn default_google_endpoint() -> String {
    crate::providers::google::DEFAULT_GOOGLE_ENDPOINT.to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

impl Config {
    /// Load the configuration at `path`, falling back to defaults when the
    /// file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let common = &self.translation.common;
        if common.xliff_extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(anyhow!("At least one XLIFF file extension must be configured"));
        }
        if common.call_timeout_secs == 0 {
            return Err(anyhow!("call_timeout_secs must be greater than zero"));
        }

        for provider in &self.translation.available_providers {
            if !provider.endpoint.is_empty() {
                Url::parse(&provider.endpoint).with_context(|| {
                    format!("Invalid endpoint for provider '{}': {}", provider.provider_type, provider.endpoint)
                })?;
            }
        }

        if self.translation.provider == TranslationProvider::Ollama {
            if let Some(provider) = self.translation.get_active_provider_config() {
                if provider.model.trim().is_empty() {
                    return Err(anyhow!("A model is required for the Ollama provider"));
                }
            }
        }

        Ok(())
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type.eq_ignore_ascii_case(&provider_str))
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) => provider_config.model.clone(),
            None => ProviderConfig::new(self.provider).model,
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        ProviderConfig::new(self.provider).endpoint
    }

    /// Get the HTTP timeout for the active provider
    pub fn get_timeout(&self) -> Duration {
        let secs = self
            .get_active_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(|| ProviderConfig::new(self.provider).timeout_secs);
        Duration::from_secs(secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
