use crate::document::DocId;
use crate::index::InvertedIndex;
use std::collections::HashMap;

/// Aggregate TF-IDF scores for a query's token set.
///
/// For every posting of every query token present in the index:
/// `score += term_freq * idf * field_weight`. Only postings of the query's
/// tokens are visited, so cost is bounded by query selectivity, and
/// documents matching no token are absent from the map rather than scored
/// zero. A token that somehow lacks an IDF value contributes with weight 1.
pub fn score(index: &InvertedIndex, tokens: &[String]) -> HashMap<DocId, f64> {
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for token in tokens {
        let Some(postings) = index.postings(token) else {
            continue;
        };
        let idf = index.idf(token).unwrap_or(1.0);
        for posting in postings {
            *scores.entry(posting.doc_id.clone()).or_insert(0.0) +=
                f64::from(posting.term_freq) * idf * posting.field_weight;
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::document::{AttrValue, Document};

    fn build_index() -> InvertedIndex {
        let config = SearchConfig::default();
        let mut index = InvertedIndex::new();
        index.insert(
            Document::new("p1")
                .with_attr("name", AttrValue::String("chocolate cake".into()))
                .with_attr(
                    "description",
                    AttrValue::String("rich chocolate layers".into()),
                ),
            &config,
        );
        index.insert(
            Document::new("p2")
                .with_attr("description", AttrValue::String("hint of chocolate".into())),
            &config,
        );
        index.insert(
            Document::new("p3")
                .with_attr("name", AttrValue::String("lemon tart".into())),
            &config,
        );
        index
    }

    #[test]
    fn unmatched_documents_are_absent() {
        let index = build_index();
        let scores = score(&index, &["chocolate".into()]);
        assert_eq!(scores.len(), 2);
        assert!(!scores.contains_key("p3"));
    }

    #[test]
    fn field_weight_favors_name_matches() {
        let index = build_index();
        let scores = score(&index, &["chocolate".into()]);
        // p1 matches in name (weight 10) and description (weight 5),
        // p2 only in description.
        assert!(scores["p1"] > scores["p2"]);
    }

    #[test]
    fn unknown_token_scores_nothing() {
        let index = build_index();
        let scores = score(&index, &["pistachio".into()]);
        assert!(scores.is_empty());
    }

    #[test]
    fn scores_accumulate_across_tokens() {
        let index = build_index();
        let single = score(&index, &["lemon".into()]);
        let both = score(&index, &["lemon".into(), "tart".into()]);
        assert!(both["p3"] > single["p3"]);
    }
}
