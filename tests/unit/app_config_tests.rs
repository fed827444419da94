/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;

use xcloc_translate::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use xcloc_translate::translation::GatewayOptions;
use crate::common;

#[test]
fn test_default_config_shouldUseGoogleAndOriginalDefaults() -> Result<()> {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 200);
    assert!(config.translation.common.mark_failed_as_translated);
    assert!(config.translation.common.cache_enabled);
    assert_eq!(config.translation.common.xliff_extensions, vec!["xliff".to_string()]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.log_file.is_none());
    config.validate()?;
    Ok(())
}

#[test]
fn test_gateway_options_shouldReflectCommonSettings() {
    let mut config = Config::default();
    config.translation.common.rate_limit_delay_ms = 50;
    config.translation.common.call_timeout_secs = 7;
    config.translation.common.cache_enabled = false;

    let options = config.translation.common.gateway_options();
    assert_eq!(options.min_interval, Duration::from_millis(50));
    assert_eq!(options.call_timeout, Duration::from_secs(7));
    assert!(!options.cache_enabled);
}

#[test]
fn test_default_call_timeout_shouldMatchGatewayDefault() {
    let from_config = Config::default().translation.common.gateway_options();
    assert_eq!(from_config.call_timeout, GatewayOptions::default().call_timeout);
    assert_eq!(from_config.call_timeout, Duration::from_secs(120));
}

#[test]
fn test_from_str_withProviderNames_shouldParseCaseInsensitively() {
    assert_eq!(TranslationProvider::from_str("google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str("Ollama").unwrap(), TranslationProvider::Ollama);
    assert!(TranslationProvider::from_str("deepl").is_err());
    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
}

#[test]
fn test_load_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load(temp_dir.path().join("missing.json"))?;
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    Ok(())
}

#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "translation": {
                "provider": "ollama",
                "available_providers": [
                    {"type": "ollama", "endpoint": "http://127.0.0.1:11434", "model": "mistral"}
                ],
                "common": {"mark_failed_as_translated": false, "xliff_extensions": ["xliff", "xlf"]}
            },
            "log_level": "debug",
            "log_file": "run.log"
        }"#,
    )?;

    let config = Config::load(&path)?;
    config.validate()?;

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.get_endpoint(), "http://127.0.0.1:11434");
    assert_eq!(config.translation.get_timeout(), Duration::from_secs(30));
    assert!(!config.translation.common.mark_failed_as_translated);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 200);
    assert_eq!(config.translation.common.xliff_extensions.len(), 2);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_file.as_deref(), Some(std::path::Path::new("run.log")));
    Ok(())
}

#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withEmptyExtensions_shouldFail() {
    let mut config = Config::default();
    config.translation.common.xliff_extensions = vec![];
    assert!(config.validate().is_err());

    config.translation.common.xliff_extensions = vec![".".to_string()];
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.available_providers[0].endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOllamaWithoutModel_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.available_providers = vec![ProviderConfig {
        model: String::new(),
        ..ProviderConfig::new(TranslationProvider::Ollama)
    }];
    assert!(config.validate().is_err());
}

#[test]
fn test_get_endpoint_withoutProviderEntry_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_model(), "llama3.2:3b");
}

#[test]
fn test_log_level_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
