use crate::cache::QueryCache;
use crate::config::SearchConfig;
use crate::document::Document;
use crate::index::InvertedIndex;
use crate::query::{FilterValue, QueryResponse, ScoredDocument, SearchOptions, SortSpec};
use crate::results;
use crate::scorer;
use crate::suggest::Suggester;
use crate::tokenizer::normalize;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Counters reported by [`SearchEngine::statistics`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatistics {
    pub document_count: usize,
    pub unique_term_count: usize,
    /// Mean number of postings per indexed document.
    pub average_document_size: f64,
    pub cache_size: usize,
    pub indexed_fields: Vec<String>,
    pub cache_ttl_secs: u64,
}

/// The search engine facade: owns the index, the query cache and the
/// suggestion engine.
///
/// Mutating operations (`index_document`, `update_document`,
/// `remove_document`, `rebuild_all`) take `&mut self`; `search` takes
/// `&self`, with the query cache and the distance memo behind mutexes.
/// A multi-threaded host can therefore wrap the engine in an
/// `RwLock<SearchEngine>` and keep searches on the read side while
/// mutations hold the writer lock.
pub struct SearchEngine {
    config: SearchConfig,
    index: InvertedIndex,
    cache: Mutex<QueryCache>,
    suggester: Suggester,
}

/// Canonical cache-key material: fixed field order plus an ordered filter
/// map, so semantically identical option sets share one key.
#[derive(Serialize)]
struct CacheKey<'a> {
    query: &'a str,
    filters: &'a BTreeMap<String, FilterValue>,
    sort: &'a Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let cache = QueryCache::new(
            config.cache.max_entries,
            Duration::from_secs(config.cache.ttl_secs),
        );
        let suggester = Suggester::new(config.suggestions.clone());
        SearchEngine {
            config,
            index: InvertedIndex::new(),
            cache: Mutex::new(cache),
            suggester,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Read access to the underlying index, e.g. for vocabulary or IDF
    /// inspection.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Index one catalog record. A record with an empty id is dropped with
    /// a warning; re-indexing an existing id replaces the stored version.
    pub fn index_document(&mut self, doc: Document) {
        self.index.insert(doc, &self.config);
        self.invalidate_cache();
    }

    pub fn index_documents(&mut self, docs: Vec<Document>) {
        for doc in docs {
            self.index.insert(doc, &self.config);
        }
        self.invalidate_cache();
    }

    /// Full document replacement; never an incremental field patch.
    pub fn update_document(&mut self, doc: Document) {
        self.index_document(doc);
    }

    pub fn remove_document(&mut self, id: &str) {
        self.index.remove(id);
        self.invalidate_cache();
    }

    /// Snapshot the stored documents and rebuild the index from scratch.
    pub fn rebuild_all(&mut self) {
        self.index.rebuild(&self.config);
        self.invalidate_cache();
    }

    /// Run a search. Malformed input degrades instead of failing: a query
    /// that normalizes to nothing returns an empty well-formed response,
    /// which is still cacheable.
    pub fn search(&self, query: &str, options: &SearchOptions) -> QueryResponse {
        let page = options.page.unwrap_or(1);
        let page_size = options
            .page_size
            .unwrap_or(self.config.default_page_size)
            .max(1);
        let cache_key = self.cache_key(query, options, page, page_size);

        if self.config.cache.enabled {
            if let Some(hit) = self.cache.lock().get(&cache_key) {
                tracing::debug!(query, "query cache hit");
                return hit;
            }
        }

        let started = Instant::now();
        let tokens = normalize(query, &self.config.normalizer);
        if tokens.is_empty() {
            let response = QueryResponse::empty(page);
            self.cache_put(cache_key, &response);
            return response;
        }

        let scores = scorer::score(&self.index, &tokens);
        let mut hits: Vec<ScoredDocument> = scores
            .into_iter()
            .filter_map(|(id, score)| {
                self.index.doc(&id).map(|doc| ScoredDocument {
                    document: doc.clone(),
                    score,
                })
            })
            .collect();

        hits = results::apply_filters(hits, &options.filters);
        results::sort_results(&mut hits, options.sort.as_ref());
        let (page_items, total, total_pages) = results::paginate(hits, page, page_size);

        // Sparse pages trigger "did you mean" generation.
        let suggestions = if self.config.suggestions.enabled && page_items.len() < page_size {
            self.suggester.suggest(&self.index, &tokens)
        } else {
            Vec::new()
        };

        let response = QueryResponse {
            results: page_items,
            total,
            page,
            total_pages,
            elapsed_ms: started.elapsed().as_millis() as u64,
            tokens,
            suggestions,
        };
        tracing::debug!(
            query,
            total = response.total,
            elapsed_ms = response.elapsed_ms,
            "search executed"
        );
        self.cache_put(cache_key, &response);
        response
    }

    pub fn statistics(&self) -> IndexStatistics {
        let document_count = self.index.doc_count();
        let average_document_size = if document_count == 0 {
            0.0
        } else {
            self.index.posting_count() as f64 / document_count as f64
        };
        let mut indexed_fields: Vec<String> =
            self.config.field_weights.keys().cloned().collect();
        indexed_fields.sort();

        IndexStatistics {
            document_count,
            unique_term_count: self.index.term_count(),
            average_document_size,
            cache_size: self.cache.lock().len(),
            indexed_fields,
            cache_ttl_secs: self.config.cache.ttl_secs,
        }
    }

    /// Drop expired cache entries ahead of their lazy expiry; returns how
    /// many were reclaimed.
    pub fn purge_expired_cache_entries(&self) -> usize {
        self.cache.lock().purge_expired()
    }

    fn cache_key(
        &self,
        query: &str,
        options: &SearchOptions,
        page: usize,
        page_size: usize,
    ) -> String {
        serde_json::to_string(&CacheKey {
            query,
            filters: &options.filters,
            sort: &options.sort,
            page,
            page_size,
        })
        .expect("cache key is serializable")
    }

    fn cache_put(&self, key: String, response: &QueryResponse) {
        if self.config.cache.enabled {
            self.cache.lock().put(key, response.clone());
        }
    }

    fn invalidate_cache(&mut self) {
        self.cache.get_mut().invalidate_all();
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AttrValue;

    fn doc(id: &str, name: &str) -> Document {
        Document::new(id).with_attr("name", AttrValue::String(name.into()))
    }

    #[test]
    fn search_on_empty_engine_returns_empty_response() {
        let engine = SearchEngine::default();
        let response = engine.search("chocolate", &SearchOptions::default());
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.total_pages, 0);
    }

    #[test]
    fn blank_query_is_well_formed_and_cached() {
        let mut engine = SearchEngine::default();
        engine.index_document(doc("p1", "chocolate cake"));

        let response = engine.search("the of a", &SearchOptions::default());
        assert!(response.tokens.is_empty());
        assert_eq!(response.total, 0);
        assert_eq!(engine.statistics().cache_size, 1);
    }

    #[test]
    fn semantically_equal_options_share_a_cache_entry() {
        let mut engine = SearchEngine::default();
        engine.index_document(doc("p1", "chocolate cake"));

        let explicit = SearchOptions {
            page: Some(1),
            page_size: Some(12),
            ..SearchOptions::default()
        };
        engine.search("chocolate", &SearchOptions::default());
        engine.search("chocolate", &explicit);
        assert_eq!(engine.statistics().cache_size, 1);
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let mut config = SearchConfig::default();
        config.cache.enabled = false;
        let mut engine = SearchEngine::new(config);
        engine.index_document(doc("p1", "chocolate cake"));

        engine.search("chocolate", &SearchOptions::default());
        assert_eq!(engine.statistics().cache_size, 0);
    }

    #[test]
    fn statistics_track_index_shape() {
        let mut engine = SearchEngine::default();
        engine.index_document(
            doc("p1", "chocolate cake")
                .with_attr("tags", AttrValue::StringList(vec!["party".into()])),
        );
        let stats = engine.statistics();
        assert_eq!(stats.document_count, 1);
        // "chocolate", "cake", "party"
        assert_eq!(stats.unique_term_count, 3);
        assert!((stats.average_document_size - 3.0).abs() < 1e-9);
        assert!(stats.indexed_fields.contains(&"tags".to_string()));
        assert_eq!(stats.cache_ttl_secs, 3600);
    }
}
