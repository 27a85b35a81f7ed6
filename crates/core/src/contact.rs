//! Contact records.
//!
//! A [`Contact`] is what the repository client hands back after flattening.
//! Partial updates travel as a [`ContactMutation`] wrapped in a
//! [`DataEnvelope`].

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned contact identifier.
///
/// The content API returns numeric ids, but they are only ever used as path
/// segments, so both JSON strings and numbers deserialize into the same
/// string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Create an ID from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ContactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Unsigned(id) => Self(id.to_string()),
            RawId::Signed(id) => Self(id.to_string()),
        })
    }
}

/// A flattened contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    /// RFC 3339 creation timestamp. Write responses may leave it out.
    #[serde(default)]
    pub created_at: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    /// Avatar image URL.
    pub avatar: Option<String>,
    pub twitter: Option<String>,
    pub notes: Option<String>,
    pub favorite: Option<bool>,
}

impl Contact {
    /// Decode a contact from an already flattened record.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is missing, or if a field has the wrong JSON
    /// type.
    pub fn from_flat(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns `"first last"`, or `None` when neither name is set.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first.as_deref(), self.last.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }

    /// Returns the twitter handle without a leading `@`.
    #[must_use]
    pub fn twitter_handle(&self) -> Option<&str> {
        self.twitter
            .as_deref()
            .map(|handle| handle.trim().trim_start_matches('@'))
            .filter(|handle| !handle.is_empty())
    }

    /// Parse `created_at`, if present and a valid RFC 3339 timestamp.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|created| DateTime::parse_from_rfc3339(created).ok())
            .map(|created| created.with_timezone(&Utc))
    }
}

/// A partial contact update. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMutation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl ContactMutation {
    /// An update that only sets `favorite`.
    #[must_use]
    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Self::default()
        }
    }

    /// Wrap as a request body: `{ "data": { ...set fields } }`.
    #[must_use]
    pub const fn request_body(&self) -> DataEnvelope<&Self> {
        DataEnvelope { data: self }
    }
}

/// Request body wrapper: `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
