/*!
 * Tests for translation cache functionality
 */

use std::sync::Arc;
use xcloc_translate::translation::cache::TranslationCache;

#[test]
fn test_cache_new_withDisabled_shouldNeverReturnEntries() {
    let cache = TranslationCache::new(false);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "en", "fr").is_none());
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_store_withEnabledCache_shouldStoreTranslation() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert_eq!(cache.get("hello", "en", "fr"), Some("bonjour".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_get_withDifferentLanguages_shouldReturnNone() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "de", "fr").is_none());
    assert!(cache.get("hello", "en", "es").is_none());
}

#[test]
fn test_cache_get_withUnmappedLocales_shouldKeyOnExactIdentifiers() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "zh-Hans", "你好");

    assert_eq!(cache.get("hello", "en", "zh-Hans"), Some("你好".to_string()));
    assert!(cache.get("hello", "en", "zh-cn").is_none());
}

#[test]
fn test_cache_get_withWhitespaceDifference_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello ", "en", "fr").is_none());
}

#[test]
fn test_cache_stats_afterHitsAndMisses_shouldCountBoth() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    let _ = cache.get("hello", "en", "fr");
    let _ = cache.get("hello", "en", "fr");
    let _ = cache.get("goodbye", "en", "fr");

    assert_eq!(cache.stats(), (2, 1));
}

#[test]
fn test_cache_clone_shouldShareEntries() {
    let cache = TranslationCache::default();
    let clone = cache.clone();
    clone.store("hello", "en", "fr", "bonjour");

    assert_eq!(cache.get("hello", "en", "fr"), Some("bonjour".to_string()));
}

#[tokio::test]
async fn test_cache_concurrentAccess_shouldKeepAllEntries() {
    let cache = Arc::new(TranslationCache::new(true));
    let mut handles = Vec::new();

    for i in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for j in 0..25 {
                let text = format!("text {} {}", i, j);
                cache.store(&text, "en", "fr", &format!("texte {} {}", i, j));
                assert!(cache.get(&text, "en", "fr").is_some());
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len(), 200);
}
