use crate::types::SourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIGS_DIR: &str = "configs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub jurisdiction: String,
    pub region: String,
    pub doc_type: String,
    pub citation_prefix: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub sources: HashMap<SourceKind, SourceConfig>,
}

impl SourcesConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read sources.json: {e}"))?;
        let config: SourcesConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse sources.json: {e}"))?;
        Ok(config)
    }

    /// Reads `sources.json` from `$CONFIGS_PATH`, or `configs/` when unset.
    pub fn load_default() -> Result<Self, String> {
        let dir = std::env::var("CONFIGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIGS_DIR));
        Self::load_from_file(dir.join("sources.json"))
    }

    pub fn get(&self, source: SourceKind) -> Option<&SourceConfig> {
        self.sources.get(&source)
    }
}
