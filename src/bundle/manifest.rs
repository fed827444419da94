/*!
 * The bundle manifest (`contents.json`).
 *
 * Only `developmentRegion` and `targetLocale` are interpreted; every other
 * field is carried along untouched, in its original order.
 */

use serde_json::{Map, Value};
use std::path::Path;

use crate::errors::BundleError;
use crate::file_utils::FileManager;

/// File name of the manifest at the bundle root
pub const MANIFEST_FILE_NAME: &str = "contents.json";

const DEVELOPMENT_REGION_KEY: &str = "developmentRegion";
const TARGET_LOCALE_KEY: &str = "targetLocale";

/// A parsed manifest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest JSON; the top level must be an object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self { fields })
    }

    /// Read and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let content = FileManager::read_to_string(path).map_err(|e| BundleError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&content).map_err(|e| BundleError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize as 2-space indented JSON with non-ASCII text kept as is
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.fields)
    }

    /// Write the manifest to `path`
    pub fn save(&self, path: &Path) -> Result<(), BundleError> {
        let json = self.to_json().map_err(|e| BundleError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        FileManager::write_atomic(path, json.as_bytes()).map_err(|e| BundleError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The source locale; an empty value counts as missing
    pub fn development_region(&self) -> Option<&str> {
        self.string_field(DEVELOPMENT_REGION_KEY).filter(|region| !region.is_empty())
    }

    pub fn target_locale(&self) -> Option<&str> {
        self.string_field(TARGET_LOCALE_KEY)
    }

    /// Set `targetLocale`, returning the previous value if there was one.
    /// An existing key keeps its position.
    pub fn set_target_locale(&mut self, locale: &str) -> Option<String> {
        self.fields
            .insert(TARGET_LOCALE_KEY.to_string(), Value::String(locale.to_string()))
            .map(|previous| match previous {
                Value::String(s) => s,
                other => other.to_string(),
            })
    }

    /// Raw access to any field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
