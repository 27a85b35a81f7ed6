//! Content API response envelopes.
//!
//! The content API wraps every record as `{ id, attributes: {...} }` and every
//! relation as `{ data: ... }`. This module parses that shape once into a
//! tagged tree ([`Envelope`], [`EnvelopeRecord`], [`FieldValue`]) and flattens
//! it into plain field-addressable JSON.
//!
//! ## Flattening rules
//!
//! For a record:
//! 1. every `attributes` entry is copied, unwrapping `{ data: ... }` relations
//!    recursively
//! 2. every other key except `attributes` and `data` is copied as-is
//! 3. a nested `data` is flattened and merged last, overwriting on conflict
//!
//! Lists flatten element-wise and `null` stays `null`.
//!
//! ## Malformed input
//!
//! Parsing is total. A non-object `attributes` or a scalar `data` is treated
//! as absent, so a relation whose `data` is `false`, `0`, or `""` flattens to
//! `null`, a top-level scalar passes through unchanged, and attribute
//! entries named `attributes` or `data` are dropped. The result never carries
//! wrapper keys at the top level, which makes flattening idempotent.
//!
//! ```
//! use rolodex_core::flatten;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "id": 7,
//!     "attributes": {
//!         "first": "Ada",
//!         "company": { "data": { "id": 2, "attributes": { "name": "Analytical" } } }
//!     }
//! });
//!
//! assert_eq!(
//!     flatten(&raw),
//!     json!({ "id": 7, "first": "Ada", "company": { "id": 2, "name": "Analytical" } })
//! );
//! ```

use serde_json::{Map, Value};

const ATTRIBUTES_KEY: &str = "attributes";
const DATA_KEY: &str = "data";

/// Flatten a raw content API value.
///
/// Shorthand for `Envelope::parse(value).flatten()`.
#[must_use]
pub fn flatten(value: &Value) -> Value {
    Envelope::parse(value).flatten()
}

/// A parsed content API value.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Absent value.
    Null,
    /// Bare string, number, or boolean.
    Scalar(Value),
    /// Sequence of envelopes, flattened element-wise.
    List(Vec<Envelope>),
    /// Object that may carry `attributes` and a nested `data`.
    Record(Box<EnvelopeRecord>),
}

/// An envelope object split into its three parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvelopeRecord {
    /// Entries of the `attributes` object, in source order.
    pub attributes: Vec<(String, FieldValue)>,
    /// Nested `data` envelope, merged over everything else.
    pub data: Option<Envelope>,
    /// Sibling keys such as `id` that pass through unchanged.
    pub rest: Map<String, Value>,
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain value, including objects without a `data` key.
    Scalar(Value),
    /// To-one relation: `{ data: {...} }`. A `null` or other scalar `data`
    /// is an empty relation.
    NestedEnvelope(Envelope),
    /// To-many relation: `{ data: [...] }`.
    EnvelopeList(Vec<Envelope>),
}

impl Envelope {
    /// Parse a raw JSON value. Never fails.
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::List(items.iter().map(Self::parse).collect()),
            Value::Object(object) => Self::Record(Box::new(EnvelopeRecord::parse(object))),
            scalar => Self::Scalar(scalar.clone()),
        }
    }

    /// Flatten into plain JSON.
    #[must_use]
    pub fn flatten(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Scalar(value) => value.clone(),
            Self::List(items) => Value::Array(items.iter().map(Self::flatten).collect()),
            Self::Record(record) => Value::Object(record.flatten()),
        }
    }
}

impl From<&Value> for Envelope {
    fn from(value: &Value) -> Self {
        Self::parse(value)
    }
}

impl EnvelopeRecord {
    fn parse(object: &Map<String, Value>) -> Self {
        let attributes = match object.get(ATTRIBUTES_KEY) {
            Some(Value::Object(fields)) => fields
                .iter()
                .filter(|(key, _)| !is_wrapper_key(key))
                .map(|(key, value)| (key.clone(), FieldValue::parse(value)))
                .collect(),
            _ => Vec::new(),
        };

        let data = match object.get(DATA_KEY) {
            Some(value @ (Value::Object(_) | Value::Array(_))) => Some(Envelope::parse(value)),
            _ => None,
        };

        let rest = object
            .iter()
            .filter(|(key, _)| !is_wrapper_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            attributes,
            data,
            rest,
        }
    }

    /// Flatten into a single JSON object.
    #[must_use]
    pub fn flatten(&self) -> Map<String, Value> {
        let mut flattened = Map::new();

        for (key, value) in &self.attributes {
            flattened.insert(key.clone(), value.flatten());
        }

        for (key, value) in &self.rest {
            flattened.insert(key.clone(), value.clone());
        }

        if let Some(data) = &self.data {
            merge(&mut flattened, data.flatten());
        }

        flattened
    }
}

impl FieldValue {
    fn parse(value: &Value) -> Self {
        let Value::Object(object) = value else {
            return Self::Scalar(value.clone());
        };

        match object.get(DATA_KEY) {
            Some(Value::Array(items)) => {
                Self::EnvelopeList(items.iter().map(Envelope::parse).collect())
            }
            Some(data @ Value::Object(_)) => Self::NestedEnvelope(Envelope::parse(data)),
            Some(_) => Self::NestedEnvelope(Envelope::Null),
            None => Self::Scalar(value.clone()),
        }
    }

    /// Flatten into plain JSON.
    #[must_use]
    pub fn flatten(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::NestedEnvelope(envelope) => envelope.flatten(),
            Self::EnvelopeList(items) => Value::Array(items.iter().map(Envelope::flatten).collect()),
        }
    }
}

/// Merge a flattened nested `data` into the accumulator. Later keys win.
///
/// A list merges by position, each element landing under its index.
fn merge(target: &mut Map<String, Value>, nested: Value) {
    match nested {
        Value::Object(fields) => target.extend(fields),
        Value::Array(items) => target.extend(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item)),
        ),
        _ => {}
    }
}

fn is_wrapper_key(key: &str) -> bool {
    key == ATTRIBUTES_KEY || key == DATA_KEY
}
