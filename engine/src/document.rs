use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// External identifier of a catalog record.
pub type DocId = String;

/// A typed attribute value on a document.
///
/// Catalog records are loose property bags; this union covers the value
/// kinds the engine understands. Untagged so plain JSON objects deserialize
/// directly (`"name": "Lemon Tart"`, `"tags": ["lemon", "dessert"]`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    StringList(Vec<String>),
}

impl AttrValue {
    /// Text to feed the normalizer when this attribute's field is indexed.
    /// Array values flatten to space-joined text; numbers and booleans are
    /// not indexable.
    pub fn index_text(&self) -> Option<String> {
        match self {
            AttrValue::String(s) => Some(s.clone()),
            AttrValue::StringList(items) => Some(items.join(" ")),
            _ => None,
        }
    }

    /// Numeric view used by range filters. Strings parse like the host
    /// language's `parseFloat`; anything else is non-numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A catalog record: a unique id plus an open attribute map.
///
/// The map holds both indexed fields (those named in the field-weight table)
/// and pass-through fields the engine returns verbatim in results. Documents
/// are immutable once indexed; updates go through remove-then-reinsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    #[serde(flatten)]
    pub attrs: HashMap<String, AttrValue>,
}

impl Document {
    pub fn new(id: impl Into<DocId>) -> Self {
        Document {
            id: id.into(),
            attrs: HashMap::new(),
        }
    }

    /// Builder-style attribute setter, mainly for tests and demo code.
    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_text_flattens_arrays() {
        let v = AttrValue::StringList(vec!["lemon".into(), "dessert".into()]);
        assert_eq!(v.index_text().as_deref(), Some("lemon dessert"));
    }

    #[test]
    fn numbers_and_bools_are_not_indexable() {
        assert_eq!(AttrValue::Number(12.5).index_text(), None);
        assert_eq!(AttrValue::Bool(true).index_text(), None);
    }

    #[test]
    fn as_number_parses_numeric_strings() {
        assert_eq!(AttrValue::String("89.9".into()).as_number(), Some(89.9));
        assert_eq!(AttrValue::String("cake".into()).as_number(), None);
        assert_eq!(AttrValue::Number(3.5).as_number(), Some(3.5));
        assert_eq!(AttrValue::Bool(false).as_number(), None);
    }

    #[test]
    fn deserializes_plain_json_records() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"cake001","name":"Chocolate Cake","price":89.9,"tags":["chocolate","party"],"available":true}"#,
        )
        .unwrap();
        assert_eq!(doc.id, "cake001");
        assert_eq!(
            doc.attr("name"),
            Some(&AttrValue::String("Chocolate Cake".into()))
        );
        assert_eq!(doc.attr("price"), Some(&AttrValue::Number(89.9)));
        assert_eq!(doc.attr("available"), Some(&AttrValue::Bool(true)));
    }
}
