//! Tunable heuristics of the pipeline.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! { "facet_column_limit": 80, "search_keywords": ["name", "sku"] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Schemas with this many columns or more get no number/currency facets.
pub const DEFAULT_FACET_COLUMN_LIMIT: usize = 50;

/// Rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Substrings marking a string column as good free-text search material.
pub const DEFAULT_SEARCH_KEYWORDS: [&str; 7] = [
    "name",
    "title",
    "description",
    "company",
    "city",
    "country",
    "address",
];

/// Substring marking identifier columns, which make poor search targets.
pub const DEFAULT_ID_MARKER: &str = "id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Keywords matched case-insensitively against column keys and labels.
    pub search_keywords: Vec<String>,

    /// Columns whose key or label contain this are skipped as search fallback.
    pub id_marker: String,

    /// Number/currency columns are faceted only below this column count.
    pub facet_column_limit: usize,

    pub page_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_keywords: DEFAULT_SEARCH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            id_marker: DEFAULT_ID_MARKER.to_string(),
            facet_column_limit: DEFAULT_FACET_COLUMN_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Config file if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
