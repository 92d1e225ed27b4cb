//! In-memory product search: an inverted index with TF-IDF relevance
//! ranking, attribute filtering, result caching, and "did you mean"
//! suggestions.
//!
//! The engine is an embedded library. Catalog records enter through the
//! indexing operations, searches run against the in-memory index, and
//! nothing persists across restarts; hosts rebuild the index from the
//! source catalog on demand.
//!
//! ```
//! use engine::{AttrValue, Document, SearchEngine, SearchOptions};
//!
//! let mut engine = SearchEngine::default();
//! engine.index_document(
//!     Document::new("cake001")
//!         .with_attr("name", AttrValue::String("Chocolate Cake".into()))
//!         .with_attr("price", AttrValue::Number(89.9)),
//! );
//!
//! let response = engine.search("chocolate", &SearchOptions::default());
//! assert_eq!(response.total, 1);
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod engine;
pub mod index;
pub mod query;
pub mod results;
pub mod scorer;
pub mod suggest;
pub mod tokenizer;

pub use config::{CacheConfig, NormalizerConfig, SearchConfig, SuggestionConfig};
pub use document::{AttrValue, DocId, Document};
pub use engine::{IndexStatistics, SearchEngine};
pub use index::{InvertedIndex, Posting};
pub use query::{
    FilterValue, QueryResponse, ScoredDocument, SearchOptions, SortDirection, SortSpec,
};
pub use suggest::Suggester;
