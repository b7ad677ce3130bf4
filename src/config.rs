//! Project configuration: attribute naming and directory scan filters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const RC_FILES: [&str; 2] = [".reselectorrc", ".reselectorrc.json"];
const PACKAGE_KEY: &str = "reselector";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Attribute prefix for emitted markers.
    pub prefix: String,
    /// Attribute name, appended to `prefix`.
    pub attribute: String,
    /// File extensions picked up by directory scans.
    pub extensions: Vec<String>,
    /// Directory names skipped by directory scans.
    pub ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "data-".to_string(),
            attribute: "tid".to_string(),
            extensions: ["js", "jsx", "ts", "tsx", "mjs", "cjs"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            ignore: vec!["node_modules".to_string()],
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn attribute_name(&self) -> String {
        format!("{}{}", self.prefix, self.attribute)
    }

    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }

    /// Searches `dir` and its ancestors for an rc file or a `"reselector"`
    /// entry in `package.json`. Nothing found yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        for candidate in dir.ancestors() {
            if let Some(config) = Self::load_from(candidate)? {
                return Ok(config);
            }
        }
        tracing::debug!("no reselector config above {}", dir.display());
        Ok(Self::default())
    }

    fn load_from(dir: &Path) -> Result<Option<Self>> {
        for name in RC_FILES {
            let path = dir.join(name);
            if path.is_file() {
                let source = read(&path)?;
                let config = Self::from_json(&source).map_err(|e| invalid(&path, e))?;
                tracing::debug!("loaded config from {}", path.display());
                return Ok(Some(config));
            }
        }

        let package = dir.join("package.json");
        if package.is_file() {
            let source = read(&package)?;
            let value: serde_json::Value =
                serde_json::from_str(&source).map_err(|e| invalid(&package, e))?;
            if let Some(section) = value.get(PACKAGE_KEY) {
                let config =
                    Self::deserialize(section).map_err(|e| invalid(&package, e))?;
                tracing::debug!("loaded config from {}", package.display());
                return Ok(Some(config));
            }
        }

        Ok(None)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn invalid(path: &Path, e: serde_json::Error) -> Error {
    Error::Config {
        path: PathBuf::from(path),
        reason: e.to_string(),
    }
}
