use crate::config::SuggestionConfig;
use crate::index::InvertedIndex;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Bounded memo for computed distances.
const MEMO_CAPACITY: usize = 1000;
/// Oldest entries dropped when the memo overflows.
const MEMO_TRIM: usize = MEMO_CAPACITY / 5;
/// Strings at or below this length go through prefix/suffix reduction
/// before the DP.
const REDUCE_MAX_LEN: usize = 10;
/// Alternatives kept per query token before deduplication.
const TOP_PER_TOKEN: usize = 3;

/// "Did you mean" generator over the index vocabulary.
///
/// The memo lives behind a mutex so suggestion generation can run on the
/// read side of a search.
pub struct Suggester {
    config: SuggestionConfig,
    memo: Mutex<DistanceMemo>,
}

impl Suggester {
    pub fn new(config: SuggestionConfig) -> Self {
        Suggester {
            config,
            memo: Mutex::new(DistanceMemo::new()),
        }
    }

    /// Propose alternative queries for a sparse result set.
    ///
    /// Per query token: prefilter vocabulary by length (a term whose length
    /// differs by more than the maximum distance cannot be within it), keep
    /// candidates with distance in `(0, max]`, rank by distance then
    /// document frequency, take the best few, and splice each into the
    /// token sequence. Deduplicated, capped at the configured maximum.
    pub fn suggest(&self, index: &InvertedIndex, tokens: &[String]) -> Vec<String> {
        if tokens.is_empty() {
            return Vec::new();
        }
        let max = self.config.max_distance;
        let mut memo = self.memo.lock();
        let mut suggestions: Vec<String> = Vec::new();

        for query_token in tokens {
            let query_len = query_token.chars().count();

            let mut candidates: Vec<(&str, usize)> = Vec::new();
            for term in index.terms() {
                if query_len.abs_diff(term.chars().count()) > max {
                    continue;
                }
                let dist = bounded_distance(query_token, term, max, &mut memo);
                // Distance 0 is the query token itself, not a suggestion.
                if dist > 0 && dist <= max {
                    candidates.push((term, dist));
                }
            }

            candidates.sort_by(|(term_a, dist_a), (term_b, dist_b)| {
                dist_a.cmp(dist_b).then_with(|| {
                    index
                        .doc_frequency(term_b)
                        .cmp(&index.doc_frequency(term_a))
                })
            });

            for (candidate, _) in candidates.into_iter().take(TOP_PER_TOKEN) {
                let rewritten: Vec<&str> = tokens
                    .iter()
                    .map(|t| if t == query_token { candidate } else { t.as_str() })
                    .collect();
                let suggestion = rewritten.join(" ");
                if !suggestions.contains(&suggestion) {
                    suggestions.push(suggestion);
                }
            }
        }

        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }

    /// Bounded edit distance between two strings. Results above the
    /// configured maximum are exact only up to `max + 1`.
    pub fn distance(&self, a: &str, b: &str) -> usize {
        bounded_distance(a, b, self.config.max_distance, &mut self.memo.lock())
    }

    #[cfg(test)]
    fn memo_len(&self) -> usize {
        self.memo.lock().map.len()
    }
}

/// Levenshtein distance with the classic base cases, a length-difference
/// short circuit at `max + 1`, prefix/suffix reduction for short strings,
/// and a two-row DP for the rest. Distances within `max` are memoized.
fn bounded_distance(a: &str, b: &str, max: usize, memo: &mut DistanceMemo) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.chars().count();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let mut a: Vec<char> = a.chars().collect();
    let mut b: Vec<char> = b.chars().collect();
    // The shorter string drives the DP rows.
    if a.len() > b.len() {
        std::mem::swap(&mut a, &mut b);
    }

    let key = (a.iter().collect::<String>(), b.iter().collect::<String>());
    if let Some(dist) = memo.get(&key) {
        return dist;
    }

    // Too far apart to ever be within the bound; not worth memoizing.
    if b.len() - a.len() > max {
        return max + 1;
    }

    let dist = if a.len() <= REDUCE_MAX_LEN {
        reduce_then_solve(&a, &b)
    } else {
        two_row(&a, &b)
    };

    if dist <= max {
        memo.insert(key, dist);
    }
    dist
}

/// Strip the common prefix and suffix, then solve the middle. A single
/// maximal strip is enough: the reduced segment's ends differ by
/// construction, so there is nothing left to recurse on.
fn reduce_then_solve(a: &[char], b: &[char]) -> usize {
    let mut prefix = 0;
    while prefix < a.len() && a[prefix] == b[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < a.len() - prefix && a[a.len() - 1 - suffix] == b[b.len() - 1 - suffix] {
        suffix += 1;
    }
    if prefix + suffix >= a.len() {
        // The shorter string is consumed entirely by the overlap.
        return b.len() - a.len();
    }
    two_row(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
    )
}

/// Standard two-row dynamic program; returns the bottom-right cell.
fn two_row(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (curr[j] + 1)
                .min(prev[j + 1] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Insertion-ordered bounded map: a HashMap plus an explicit key queue, so
/// FIFO trimming does not depend on map iteration order.
struct DistanceMemo {
    map: HashMap<(String, String), usize>,
    order: VecDeque<(String, String)>,
}

impl DistanceMemo {
    fn new() -> Self {
        DistanceMemo {
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &(String, String)) -> Option<usize> {
        self.map.get(key).copied()
    }

    fn insert(&mut self, key: (String, String), dist: usize) {
        if self.map.insert(key.clone(), dist).is_none() {
            self.order.push_back(key);
        }
        if self.map.len() > MEMO_CAPACITY {
            for _ in 0..MEMO_TRIM {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.map.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SearchConfig, SuggestionConfig};
    use crate::document::{AttrValue, Document};

    fn suggester() -> Suggester {
        Suggester::new(SuggestionConfig::default())
    }

    #[test]
    fn distance_base_cases() {
        let s = suggester();
        assert_eq!(s.distance("", ""), 0);
        assert_eq!(s.distance("", "abc"), 3);
        assert_eq!(s.distance("abc", ""), 3);
        assert_eq!(s.distance("abc", "abc"), 0);
        assert_eq!(s.distance("kitten", "sitting"), 3);
    }

    #[test]
    fn distance_is_symmetric() {
        let s = suggester();
        assert_eq!(s.distance("chocolat", "chocolate"), 1);
        assert_eq!(s.distance("chocolate", "chocolat"), 1);
    }

    #[test]
    fn length_gap_short_circuits_past_the_bound() {
        let s = suggester();
        // max_distance is 2; an 8-char gap reports max + 1 without the DP.
        assert_eq!(s.distance("cake", "strawberries"), 3);
    }

    #[test]
    fn reduction_handles_shared_prefix_and_suffix() {
        let s = suggester();
        assert_eq!(s.distance("brownie", "brownies"), 1);
        assert_eq!(s.distance("tart", "tort"), 1);
        // Fully overlapping shorter string: distance is the length gap.
        assert_eq!(s.distance("cake", "cakes"), 1);
    }

    #[test]
    fn distance_counts_characters_not_bytes() {
        let s = suggester();
        assert_eq!(s.distance("crème", "creme"), 1);
    }

    #[test]
    fn only_bounded_results_are_memoized() {
        let s = suggester();
        s.distance("tart", "tort");
        assert_eq!(s.memo_len(), 1);
        s.distance("kitten", "sitting");
        // 3 > max_distance 2, so it is not cached.
        assert_eq!(s.memo_len(), 1);
    }

    fn vocab_index(terms: &[&str]) -> InvertedIndex {
        let config = SearchConfig::default();
        let mut index = InvertedIndex::new();
        for (i, term) in terms.iter().enumerate() {
            index.insert(
                Document::new(format!("p{i}"))
                    .with_attr("name", AttrValue::String((*term).to_string())),
                &config,
            );
        }
        index
    }

    #[test]
    fn suggests_near_miss_vocabulary() {
        let index = vocab_index(&["chocolate", "caramel"]);
        let suggestions = suggester().suggest(&index, &["chocolat".into()]);
        assert_eq!(suggestions, vec!["chocolate".to_string()]);
    }

    #[test]
    fn exact_vocabulary_match_is_never_suggested() {
        let index = vocab_index(&["chocolate"]);
        let suggestions = suggester().suggest(&index, &["chocolate".into()]);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn substitutes_only_the_misspelled_token() {
        let index = vocab_index(&["chocolate", "tart"]);
        let suggestions = suggester().suggest(&index, &["chocolat".into(), "tart".into()]);
        assert!(suggestions.contains(&"chocolate tart".to_string()));
    }

    #[test]
    fn popular_terms_rank_first_at_equal_distance() {
        let config = SearchConfig::default();
        let mut index = InvertedIndex::new();
        // "tart" lives in three documents, "torte" in one.
        for i in 0..3 {
            index.insert(
                Document::new(format!("t{i}"))
                    .with_attr("name", AttrValue::String("tart".into())),
                &config,
            );
        }
        index.insert(
            Document::new("o1").with_attr("name", AttrValue::String("torte".into())),
            &config,
        );

        let suggestions = suggester().suggest(&index, &["tort".into()]);
        assert_eq!(suggestions.first(), Some(&"tart".to_string()));
    }

    #[test]
    fn respects_max_suggestions() {
        let index = vocab_index(&["cake", "care", "case", "cave", "cane"]);
        let s = Suggester::new(SuggestionConfig {
            max_suggestions: 2,
            ..SuggestionConfig::default()
        });
        let suggestions = s.suggest(&index, &["cabe".into()]);
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn memo_trims_oldest_entries_when_full() {
        let mut memo = DistanceMemo::new();
        for i in 0..=MEMO_CAPACITY {
            memo.insert((format!("a{i}"), format!("b{i}")), 1);
        }
        assert_eq!(memo.map.len(), MEMO_CAPACITY + 1 - MEMO_TRIM);
        // The very first entry was trimmed, recent ones survive.
        assert!(memo.get(&("a0".into(), "b0".into())).is_none());
        let last = MEMO_CAPACITY;
        assert!(memo
            .get(&(format!("a{last}"), format!("b{last}")))
            .is_some());
    }
}
