/*!
 * Translation gateway.
 *
 * Wraps a backend with memoization, format-specifier masking, backend
 * locale remapping, a shared throttle and a per-call timeout. A backend
 * failure never reaches the caller as an error: the original text comes
 * back with a `Degraded` status instead.
 */

use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::errors::ProviderError;
use crate::language_utils::map_backend_locale;
use crate::providers::{Provider, TranslationRequest};
use super::cache::{truncate_text, TranslationCache};
use super::placeholders;

/// Default pause between real backend calls
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Default upper bound for one backend call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// How a translation result was obtained
#[derive(Debug)]
pub enum TranslationStatus {
    /// Empty, whitespace-only or placeholder-only input; backend not called
    Skipped,
    /// Served from the cache
    Cached,
    /// Fresh backend translation
    Translated,
    /// Backend failed; the original text was returned
    Degraded(ProviderError),
}

/// Result of one gateway call
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Text to store as the translation
    pub text: String,
    /// Where the text came from
    pub status: TranslationStatus,
}

impl TranslationOutcome {
    fn new(text: impl Into<String>, status: TranslationStatus) -> Self {
        Self { text: text.into(), status }
    }

    /// Whether the backend failed for this call
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, TranslationStatus::Degraded(_))
    }
}

/// Gateway tuning
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Minimum spacing between real backend calls
    pub min_interval: Duration,
    /// Timeout applied to each backend call
    pub call_timeout: Duration,
    /// Whether results are memoized
    pub cache_enabled: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            cache_enabled: true,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    /// Calls that reached the backend
    pub backend_calls: usize,
    /// Calls answered from the cache
    pub cache_hits: usize,
    /// Backend calls that failed
    pub degraded: usize,
}

/// Spaces backend calls at least `interval` apart, across all callers
#[derive(Debug)]
struct Throttle {
    interval: Duration,
    next_allowed: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self { interval, next_allowed: Mutex::new(None) }
    }

    /// Run `call` once the previous call's cool-down has passed
    async fn run<F, T>(&self, call: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let mut next_allowed = self.next_allowed.lock().await;
        if let Some(deadline) = *next_allowed {
            tokio::time::sleep_until(deadline.into()).await;
        }

        let result = call.await;
        *next_allowed = Some(Instant::now() + self.interval);
        result
    }
}

/// Entry point for every translation the pipeline performs
#[derive(Debug)]
pub struct TranslationGateway {
    provider: Arc<dyn Provider>,
    cache: TranslationCache,
    throttle: Throttle,
    call_timeout: Duration,
    backend_calls: AtomicUsize,
    degraded: AtomicUsize,
}

impl TranslationGateway {
    /// Create a gateway over `provider`
    pub fn new(provider: Arc<dyn Provider>, options: GatewayOptions) -> Self {
        Self {
            provider,
            cache: TranslationCache::new(options.cache_enabled),
            throttle: Throttle::new(options.min_interval),
            call_timeout: options.call_timeout,
            backend_calls: AtomicUsize::new(0),
            degraded: AtomicUsize::new(0),
        }
    }

    /// The cache backing this gateway
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Counters so far
    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            backend_calls: self.backend_calls.load(Ordering::Relaxed),
            cache_hits: self.cache.stats().0,
            degraded: self.degraded.load(Ordering::Relaxed),
        }
    }

    /// Translate `text` from `source_locale` to `target_locale`.
    ///
    /// Locales are the bundle's own identifiers; remapping for the backend
    /// happens here and nowhere else.
    pub async fn translate(&self, text: &str, source_locale: &str, target_locale: &str) -> TranslationOutcome {
        if text.trim().is_empty() {
            return TranslationOutcome::new(text, TranslationStatus::Skipped);
        }

        if let Some(cached) = self.cache.get(text, source_locale, target_locale) {
            return TranslationOutcome::new(cached, TranslationStatus::Cached);
        }

        let (masked, placeholder_map) = placeholders::extract(text);
        if placeholders::is_placeholder_only(&masked, &placeholder_map) {
            debug!("Skipping placeholder-only text '{}'", truncate_text(text, 40));
            return TranslationOutcome::new(text, TranslationStatus::Skipped);
        }

        let request = TranslationRequest::new(
            masked,
            map_backend_locale(source_locale),
            map_backend_locale(target_locale),
        );

        self.backend_calls.fetch_add(1, Ordering::Relaxed);
        let result = self.throttle.run(self.call_backend(&request)).await;

        match result {
            Ok(translated) => {
                let restored = placeholders::restore(&translated, &placeholder_map);
                self.cache.store(text, source_locale, target_locale, &restored);
                TranslationOutcome::new(restored, TranslationStatus::Translated)
            }
            Err(e) => {
                self.degraded.fetch_add(1, Ordering::Relaxed);
                error!("Translation failed for text '{}' via {}: {}",
                       truncate_text(text, 60), self.provider.name(), e);
                TranslationOutcome::new(text, TranslationStatus::Degraded(e))
            }
        }
    }

    async fn call_backend(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.call_timeout, self.provider.translate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.call_timeout.as_millis() as u64)),
        }
    }
}
