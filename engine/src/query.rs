use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-attribute filter value.
///
/// Untagged: `{"min": 20, "max": 80}` is a range, `["lemon","party"]` an
/// intersection filter, and bare scalars are exact-match filters. A JSON
/// `null` deserializes to `Null`, which never excludes anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Values(Vec<String>),
    Flag(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Secondary sort: applied only inside the score-tie epsilon band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Search options. Filters ride in a `BTreeMap` so two semantically
/// identical option sets always serialize to the same cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    /// 1-indexed page; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// A matching document together with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// The full response of one search call. Never mutated after creation;
/// cached responses are returned as clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<ScoredDocument>,
    /// Matching documents across all pages, after filtering.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub elapsed_ms: u64,
    /// The normalized query tokens that were searched.
    pub tokens: Vec<String>,
    pub suggestions: Vec<String>,
}

impl QueryResponse {
    /// Well-formed empty response, used when the query normalizes to
    /// nothing or the index is empty.
    pub fn empty(page: usize) -> Self {
        QueryResponse {
            results: Vec::new(),
            total: 0,
            page,
            total_pages: 0,
            elapsed_ms: 0,
            tokens: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}
