use anyhow::Result;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::{Config, TranslationProvider};
use crate::bundle::{BundleOptions, BundleOrchestrator, BundleReport};
use crate::errors::BundleError;
use crate::providers::google::GoogleTranslate;
use crate::providers::ollama::Ollama;
use crate::providers::Provider;
use crate::translation::TranslationGateway;

// @module: Application controller for bundle translation

/// Main application controller for bundle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation backend
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a new controller with the backend named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let provider = Self::build_provider(&config);
        Ok(Self { config, provider })
    }

    /// Create a controller around an existing backend
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn build_provider(config: &Config) -> Arc<dyn Provider> {
        let translation = &config.translation;
        match translation.provider {
            TranslationProvider::Google => Arc::new(GoogleTranslate::new(
                translation.get_endpoint(),
                translation.get_timeout(),
            )),
            TranslationProvider::Ollama => Arc::new(Ollama::new(
                translation.get_endpoint(),
                translation.get_model(),
                translation.get_timeout(),
                translation.common.retry_count,
                translation.common.retry_backoff_ms,
            )),
        }
    }

    /// Translate the bundle at `input` into `output` for `target_locale`.
    ///
    /// Each run gets a fresh gateway, so the cache and throttle never leak
    /// between runs.
    pub async fn run(&self, input: PathBuf, output: PathBuf, target_locale: &str) -> Result<BundleReport, BundleError> {
        let common = &self.config.translation.common;
        info!(
            "Translating {:?} -> {:?} ({}) with {}",
            input,
            output,
            target_locale,
            self.config.translation.provider.display_name()
        );
        debug!("Gateway options: {:?}", common.gateway_options());

        let gateway = Arc::new(TranslationGateway::new(
            Arc::clone(&self.provider),
            common.gateway_options(),
        ));

        let options = BundleOptions {
            input,
            output,
            target_locale: target_locale.to_string(),
            translator: common.translator_options(),
            xliff_extensions: common.xliff_extensions.clone(),
        };

        BundleOrchestrator::new(gateway, options).process().await
    }
}
