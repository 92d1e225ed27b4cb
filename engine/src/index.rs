use crate::config::SearchConfig;
use crate::document::{DocId, Document};
use crate::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One occurrence record: a token seen in one field of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: String,
    /// Term frequency within that field.
    pub term_freq: u32,
    pub field_weight: f64,
}

/// Token -> postings map with document storage and IDF bookkeeping.
///
/// Invariants: a token is present iff at least one live document contains it
/// in an indexed field; `idf` holds `ln(doc_count / df)` for every present
/// token and is recomputed on every mutation. An empty index has an empty
/// IDF table rather than divide-by-zero values.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    docs: HashMap<DocId, Document>,
    idf: HashMap<String, f64>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document. A record with an empty id is dropped (logged, not
    /// an error). Re-indexing an existing id replaces the old version first
    /// so repeated calls never double-count.
    pub fn insert(&mut self, doc: Document, config: &SearchConfig) {
        if doc.id.is_empty() {
            tracing::warn!("skipping document without an id");
            return;
        }
        if self.docs.contains_key(&doc.id) {
            self.remove(&doc.id);
        }

        for (field, &weight) in &config.field_weights {
            let Some(text) = doc.attr(field).and_then(|v| v.index_text()) else {
                continue;
            };
            let tokens = normalize(&text, &config.normalizer);

            let mut term_freq: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *term_freq.entry(token).or_insert(0) += 1;
            }

            for (token, freq) in term_freq {
                self.postings.entry(token).or_default().push(Posting {
                    doc_id: doc.id.clone(),
                    field: field.clone(),
                    term_freq: freq,
                    field_weight: weight,
                });
            }
        }

        self.docs.insert(doc.id.clone(), doc);
        self.recompute_idf();
    }

    /// Remove a document and every posting referencing it. Tokens left with
    /// no postings disappear from the index entirely. Returns whether the
    /// document existed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.docs.remove(id).is_none() {
            return false;
        }
        self.postings.retain(|_, postings| {
            postings.retain(|p| p.doc_id != id);
            !postings.is_empty()
        });
        self.recompute_idf();
        true
    }

    /// Snapshot all stored documents, clear everything, and re-index the
    /// snapshot.
    pub fn rebuild(&mut self, config: &SearchConfig) {
        let snapshot: Vec<Document> = self.docs.values().cloned().collect();
        self.postings.clear();
        self.docs.clear();
        self.idf.clear();
        for doc in snapshot {
            self.insert(doc, config);
        }
        tracing::info!(
            doc_count = self.docs.len(),
            term_count = self.postings.len(),
            "index rebuilt"
        );
    }

    fn recompute_idf(&mut self) {
        self.idf.clear();
        let total = self.docs.len();
        if total == 0 {
            return;
        }
        for (token, postings) in &self.postings {
            let df = distinct_docs(postings);
            self.idf
                .insert(token.clone(), (total as f64 / df as f64).ln());
        }
    }

    pub fn postings(&self, token: &str) -> Option<&[Posting]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    /// IDF for a token, or `None` when the token is not indexed.
    pub fn idf(&self, token: &str) -> Option<f64> {
        self.idf.get(token).copied()
    }

    /// Number of distinct live documents containing the token.
    pub fn doc_frequency(&self, token: &str) -> usize {
        self.postings
            .get(token)
            .map(|p| distinct_docs(p))
            .unwrap_or(0)
    }

    pub fn doc(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Total number of postings across all tokens.
    pub fn posting_count(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }
}

fn distinct_docs(postings: &[Posting]) -> usize {
    postings
        .iter()
        .map(|p| p.doc_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}
