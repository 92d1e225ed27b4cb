use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Engine configuration, fixed at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Field name -> relevance multiplier. Only fields listed here are
    /// indexed; everything else on a document is stored verbatim but never
    /// tokenized.
    pub field_weights: HashMap<String, f64>,
    pub normalizer: NormalizerConfig,
    pub cache: CacheConfig,
    /// Results per page when a search does not specify one.
    pub default_page_size: usize,
    pub suggestions: SuggestionConfig,
}

/// Toggles for each stage of the normalization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub lowercase: bool,
    pub strip_accents: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub enabled: bool,
    pub max_suggestions: usize,
    /// Maximum Levenshtein distance for "did you mean" candidates.
    pub max_distance: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let field_weights = [
            ("name", 10.0),
            ("description", 5.0),
            ("category", 8.0),
            ("tags", 7.0),
            ("ingredients", 6.0),
            ("flavor", 7.0),
            ("occasion", 4.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        SearchConfig {
            field_weights,
            normalizer: NormalizerConfig::default(),
            cache: CacheConfig::default(),
            default_page_size: 12,
            suggestions: SuggestionConfig::default(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            lowercase: true,
            strip_accents: true,
            remove_stopwords: true,
            stem: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            max_entries: 100,
            ttl_secs: 3600,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            enabled: true,
            max_suggestions: 5,
            max_distance: 2,
        }
    }
}
