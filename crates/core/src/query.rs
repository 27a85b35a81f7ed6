//! Query-string encoding for the content API.
//!
//! The content API reads nested parameters in bracket notation:
//! `{ "pagination": { "page": 1 } }` becomes `pagination[page]=1`, and array
//! elements are addressed by index (`filters[$or][0][first][$contains]=...`).

use serde_json::{Value, json};

/// Number of contacts requested per search.
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Fields matched by a search term, OR-combined.
pub const SEARCH_FIELDS: [&str; 3] = ["first", "last", "twitter"];

/// Encode a JSON object as a bracket-notation query string.
///
/// Keys and values are percent-encoded. `null` encodes as an empty value and
/// empty objects or arrays produce no pairs. A non-object input encodes to an
/// empty string.
///
/// ```
/// use rolodex_core::query::encode;
/// use serde_json::json;
///
/// assert_eq!(encode(&json!({ "pagination": { "page": 1 } })), "pagination%5Bpage%5D=1");
/// ```
#[must_use]
pub fn encode(value: &Value) -> String {
    let mut pairs = Vec::new();

    if let Value::Object(fields) = value {
        for (key, value) in fields {
            collect_pairs(key.clone(), value, &mut pairs);
        }
    }

    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn collect_pairs(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(fields) => {
            for (key, value) in fields {
                collect_pairs(format!("{prefix}[{key}]"), value, pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_pairs(format!("{prefix}[{index}]"), item, pairs);
            }
        }
        Value::Null => pairs.push((prefix, String::new())),
        Value::String(text) => pairs.push((prefix, text.clone())),
        other => pairs.push((prefix, other.to_string())),
    }
}

/// A contact search: an optional term plus pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw search term as typed by the user.
    pub q: Option<String>,
    pub page_size: u32,
    pub page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: None,
            page_size: SEARCH_PAGE_SIZE,
            page: 1,
        }
    }
}

impl SearchQuery {
    /// First page of results for `q`.
    #[must_use]
    pub fn new(q: Option<&str>) -> Self {
        Self {
            q: q.map(str::to_owned),
            ..Self::default()
        }
    }

    /// The trimmed search term, or `None` if blank.
    ///
    /// Surrounding whitespace is never sent, so `" ada "` and `"ada"` match
    /// the same contacts.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Build the nested filter and pagination parameters.
    ///
    /// Without a term the filter is omitted, which matches every contact.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut params = json!({
            "pagination": {
                "pageSize": self.page_size,
                "page": self.page,
            }
        });

        if let (Some(term), Value::Object(fields)) = (self.term(), &mut params) {
            let clauses: Vec<Value> = SEARCH_FIELDS
                .iter()
                .map(|field| json!({ (*field): { "$contains": term } }))
                .collect();
            fields.insert("filters".to_string(), json!({ "$or": clauses }));
        }

        params
    }

    /// Encode as a query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        encode(&self.to_value())
    }
}
