use serde::{Deserialize, Serialize};

use crate::autocomplete::Suggestion;

/// Configuration loaded from one or more TOML files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub address: String,

    /// Path to the word,frequency CSV file.
    #[serde(default)]
    pub data_file: String,

    /// 0 = unlimited.
    #[serde(default)]
    pub max_suggestions: Option<usize>,

    #[serde(default)]
    pub enable_site: Option<bool>,
}

/// Autocomplete query params.
#[derive(Debug, Deserialize, Default)]
pub struct SuggestQuery {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub limit: usize,
}

/// Plain word suggestions, in rank order.
#[derive(Debug, Serialize)]
pub struct SuggestResults {
    pub suggestions: Vec<String>,
}

/// Suggestions with their scores, in rank order.
#[derive(Debug, Serialize)]
pub struct ScoredResults {
    pub suggestions: Vec<Suggestion>,
}

/// Index stats.
#[derive(Debug, Serialize)]
pub struct Stats {
    pub words: usize,
    pub nodes: usize,
}
