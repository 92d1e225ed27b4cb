use crate::document::{AttrValue, Document};
use crate::query::{FilterValue, ScoredDocument, SortDirection, SortSpec};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Secondary sort only applies to results whose scores differ by less than
/// this; meaningfully different relevance is never reordered.
const SCORE_EPSILON: f64 = 0.5;

/// Drop every result that fails any declared filter.
pub fn apply_filters(
    hits: Vec<ScoredDocument>,
    filters: &BTreeMap<String, FilterValue>,
) -> Vec<ScoredDocument> {
    if filters.is_empty() {
        return hits;
    }
    hits.into_iter()
        .filter(|hit| {
            filters
                .iter()
                .all(|(field, filter)| matches(&hit.document, field, filter))
        })
        .collect()
}

fn matches(doc: &Document, field: &str, filter: &FilterValue) -> bool {
    // Null filters are ignored, even for attributes the document lacks.
    if matches!(filter, FilterValue::Null) {
        return true;
    }
    let Some(attr) = doc.attr(field) else {
        return false;
    };
    if matches!(attr, AttrValue::Null) {
        return false;
    }

    match filter {
        FilterValue::Null => true,
        FilterValue::Range { min, max } => {
            let Some(value) = attr.as_number() else {
                return false;
            };
            if min.is_some_and(|m| value < m) {
                return false;
            }
            !max.is_some_and(|m| value > m)
        }
        FilterValue::Values(wanted) => match attr {
            // An empty filter array never excludes anything.
            AttrValue::StringList(items) => {
                wanted.is_empty() || wanted.iter().any(|w| items.contains(w))
            }
            _ => wanted.is_empty(),
        },
        FilterValue::Text(wanted) => match attr {
            AttrValue::String(s) => s == wanted,
            AttrValue::StringList(items) => items.contains(wanted),
            _ => false,
        },
        FilterValue::Number(wanted) => {
            matches!(attr, AttrValue::Number(n) if n == wanted)
        }
        FilterValue::Flag(wanted) => {
            matches!(attr, AttrValue::Bool(b) if b == wanted)
        }
    }
}

/// Order results by descending score; when a secondary sort is given it
/// breaks ties within the epsilon band only.
pub fn sort_results(hits: &mut [ScoredDocument], sort: Option<&SortSpec>) {
    match sort {
        None => hits.sort_by(|a, b| cmp_score_desc(a, b)),
        Some(spec) => hits.sort_by(|a, b| {
            if (a.score - b.score).abs() > SCORE_EPSILON {
                return cmp_score_desc(a, b);
            }
            let ord = cmp_attrs(
                a.document.attr(&spec.field),
                b.document.attr(&spec.field),
            );
            match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }),
    }
}

fn cmp_score_desc(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// Compare secondary-sort comparands: numeric, string (case-folded, which
/// also orders ISO-8601 date strings chronologically), boolean. Mixed or
/// missing comparands tie.
fn cmp_attrs(a: Option<&AttrValue>, b: Option<&AttrValue>) -> Ordering {
    match (a, b) {
        (Some(AttrValue::Number(x)), Some(AttrValue::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(AttrValue::String(x)), Some(AttrValue::String(y))) => {
            x.to_lowercase().cmp(&y.to_lowercase())
        }
        (Some(AttrValue::Bool(x)), Some(AttrValue::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Slice out one 1-indexed page. Page 0 or a page past the end yields an
/// empty slice; the page size is clamped to at least 1. Returns
/// `(page_items, total, total_pages)`.
pub fn paginate(
    hits: Vec<ScoredDocument>,
    page: usize,
    page_size: usize,
) -> (Vec<ScoredDocument>, usize, usize) {
    let page_size = page_size.max(1);
    let total = hits.len();
    let total_pages = total.div_ceil(page_size);
    if page == 0 || page > total_pages {
        return (Vec::new(), total, total_pages);
    }
    let start = (page - 1) * page_size;
    let items = hits
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();
    (items, total, total_pages)
}
