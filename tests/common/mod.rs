/*!
 * Common test utilities for the xcloc-translate test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use xcloc_translate::providers::Provider;
use xcloc_translate::translation::{GatewayOptions, TranslationGateway};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// One trans-unit for [`xliff_document`]
pub struct Unit<'a> {
    pub id: &'a str,
    pub source: &'a str,
    /// Target text and optional state; `None` means no target element
    pub target: Option<(&'a str, Option<&'a str>)>,
}

impl<'a> Unit<'a> {
    pub fn new(id: &'a str, source: &'a str) -> Self {
        Self { id, source, target: None }
    }

    pub fn with_target(mut self, text: &'a str, state: Option<&'a str>) -> Self {
        self.target = Some((text, state));
        self
    }
}

/// Builds an Xcode-style XLIFF 1.2 document with one `file` section per entry
pub fn xliff_document(sections: &[(&str, &str, Vec<Unit<'_>>)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <xliff xmlns=\"urn:oasis:names:tc:xliff:document:1.2\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" version=\"1.2\">\n",
    );

    for (original, target_language, units) in sections {
        xml.push_str(&format!(
            "  <file original=\"{}\" source-language=\"en\" target-language=\"{}\" datatype=\"plaintext\">\n",
            original, target_language
        ));
        xml.push_str("    <header>\n      <tool tool-id=\"com.apple.dt.xcode\" tool-name=\"Xcode\" tool-version=\"15.0\" build-num=\"15A240d\"/>\n    </header>\n");
        xml.push_str("    <body>\n");
        for unit in units {
            xml.push_str(&format!("      <trans-unit id=\"{}\" xml:space=\"preserve\">\n", unit.id));
            xml.push_str(&format!("        <source>{}</source>\n", unit.source));
            match unit.target {
                Some((text, Some(state))) => {
                    xml.push_str(&format!("        <target state=\"{}\">{}</target>\n", state, text))
                }
                Some((text, None)) => xml.push_str(&format!("        <target>{}</target>\n", text)),
                None => {}
            }
            xml.push_str(&format!("        <note>{} note</note>\n", unit.id));
            xml.push_str("      </trans-unit>\n");
        }
        xml.push_str("    </body>\n  </file>\n");
    }

    xml.push_str("</xliff>\n");
    xml
}

/// Writes an exported-bundle layout: manifest, documents and an unrelated resource
pub fn create_bundle(dir: &Path, manifest: &str, documents: &[(&str, String)]) -> Result<PathBuf> {
    let bundle = dir.join("en.xcloc");
    create_test_file(&bundle, "contents.json", manifest)?;
    for (relative_path, content) in documents {
        create_test_file(&bundle, relative_path, content)?;
    }
    create_test_file(&bundle, "Source Contents/App/en.lproj/Localizable.strings", "\"hello\" = \"Hello\";\n")?;
    Ok(bundle)
}

/// Gateway without throttling, for tests that do not measure timing
pub fn fast_gateway(provider: Arc<dyn Provider>) -> Arc<TranslationGateway> {
    Arc::new(TranslationGateway::new(
        provider,
        GatewayOptions {
            min_interval: Duration::ZERO,
            call_timeout: Duration::from_secs(5),
            cache_enabled: true,
        },
    ))
}

/// Reads a file to a string, panicking with the path on failure
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}
