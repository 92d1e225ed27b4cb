use crate::config::NormalizerConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this are discarded.
pub const MIN_TOKEN_LEN: usize = 2;

/// A stripped suffix must leave at least this many characters behind.
const MIN_STEM_LEN: usize = 3;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}_]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as",
            "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
            "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
            "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
            "his", "how", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most",
            "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
            "our", "ours", "out", "over", "own", "same", "she", "so", "some", "such", "than",
            "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
            "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
            "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
            "you", "your", "yours",
        ];
        words.iter().copied().collect()
    };
}

// Ordered longest-first; the first suffix whose removal leaves a stem of at
// least MIN_STEM_LEN characters wins.
const SUFFIXES: &[&str] = &[
    "ization", "fulness", "ousness", "iveness", "ational", "ingly", "ation", "ness", "ment",
    "able", "ible", "less", "ally", "ing", "ion", "ers", "ies", "est", "ity", "ful", "ed", "ly",
    "er", "s",
];

/// Normalize raw field text into a token sequence.
///
/// Pipeline (each stage toggleable): lowercase fold, accent stripping, word
/// extraction (punctuation acts as whitespace), short-token and stopword
/// removal, suffix stripping. Empty input yields an empty sequence, and the
/// same input always yields the same tokens.
pub fn normalize(text: &str, cfg: &NormalizerConfig) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut folded = text.to_string();
    if cfg.lowercase {
        folded = folded.to_lowercase();
    }
    if cfg.strip_accents {
        folded = strip_accents(&folded);
    }

    let mut tokens = Vec::new();
    for mat in WORD_RE.find_iter(&folded) {
        let token = mat.as_str();
        if token.chars().count() < MIN_TOKEN_LEN {
            continue;
        }
        if cfg.remove_stopwords && STOPWORDS.contains(token) {
            continue;
        }
        if cfg.stem {
            tokens.push(strip_suffix(token));
        } else {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// NFD decomposition with combining marks removed: "café" -> "cafe".
fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Strip the first (longest) known suffix that leaves a usable stem.
fn strip_suffix(token: &str) -> String {
    let len = token.chars().count();
    for suffix in SUFFIXES {
        let suffix_len = suffix.chars().count();
        if len >= suffix_len + MIN_STEM_LEN && token.ends_with(suffix) {
            return token[..token.len() - suffix.len()].to_string();
        }
    }
    token.to_string()
}
