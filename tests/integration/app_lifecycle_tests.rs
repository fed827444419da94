/*!
 * Full app lifecycle tests: configuration through controller run
 */

use anyhow::Result;
use std::sync::Arc;

use xcloc_translate::app_config::{Config, TranslationProvider};
use xcloc_translate::errors::BundleError;
use xcloc_translate::providers::mock::MockProvider;
use xcloc_translate::Controller;
use crate::common::{self, Unit};

fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.common.rate_limit_delay_ms = 0;
    config
}

#[test]
fn test_with_config_withDefaults_shouldBuildGoogleController() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().translation.provider, TranslationProvider::Google);
    Ok(())
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.translation.common.xliff_extensions.clear();
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_withMockProvider_shouldTranslateBundle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_bundle(
        temp_dir.path(),
        r#"{"developmentRegion": "en", "targetLocale": "en"}"#,
        &[(
            "Localized Contents/en.xliff",
            common::xliff_document(&[(
                "Localizable.strings",
                "en",
                vec![
                    Unit::new("a", "Hello %@"),
                    Unit::new("b", "Hello %@"),
                    Unit::new("c", "Bye").with_target("Tschüss", Some("translated")),
                ],
            )]),
        )],
    )?;
    let output = temp_dir.path().join("de.xcloc");
    let provider = MockProvider::working();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone()));

    let report = controller.run(input, output.clone(), "de").await?;

    assert!(report.success);
    assert_eq!(provider.request_count(), 1);
    let stats = report.documents[0].result.as_ref().unwrap();
    assert_eq!(stats.total_units, 3);
    assert_eq!(stats.translated_units, 2);

    let document = common::read(&output.join("Localized Contents/en.xliff"));
    assert_eq!(document.matches("<target state=\"translated\">[de] Hello %@</target>").count(), 2);
    assert!(document.contains("<target state=\"translated\">Tschüss</target>"));
    Ok(())
}

#[tokio::test]
async fn test_run_withNoMarkingConfigured_shouldLeaveFailedUnitsOpen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_bundle(
        temp_dir.path(),
        r#"{"developmentRegion": "en"}"#,
        &[(
            "en.xliff",
            common::xliff_document(&[("Localizable.strings", "fr", vec![Unit::new("a", "Hello")])]),
        )],
    )?;
    let output = temp_dir.path().join("de.xcloc");
    let mut config = test_config();
    config.translation.common.mark_failed_as_translated = false;
    let controller = Controller::with_provider(config, Arc::new(MockProvider::failing()));

    let report = controller.run(input, output.clone(), "de").await?;

    assert!(report.success);
    let document = common::read(&output.join("en.xliff"));
    assert!(document.contains("target-language=\"de\""));
    assert!(!document.contains("state=\"translated\""));
    Ok(())
}

#[tokio::test]
async fn test_run_eachRun_shouldUseFreshCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_bundle(
        temp_dir.path(),
        r#"{"developmentRegion": "en"}"#,
        &[(
            "en.xliff",
            common::xliff_document(&[("Localizable.strings", "fr", vec![Unit::new("a", "Hello")])]),
        )],
    )?;
    let provider = MockProvider::working();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone()));

    controller.run(input.clone(), temp_dir.path().join("one"), "de").await?;
    controller.run(input, temp_dir.path().join("two"), "de").await?;

    assert_eq!(provider.request_count(), 2);
    Ok(())
}

#[test]
fn test_run_withMissingInput_shouldReturnBundleError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_provider(test_config(), Arc::new(MockProvider::working()));

    let result = tokio_test::block_on(async {
        controller
            .run(temp_dir.path().join("missing"), temp_dir.path().join("out"), "de")
            .await
    });

    assert!(matches!(result, Err(BundleError::InputNotFound(_))));
}
