//! Strapi content API client for contact records.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`: `GET/POST/PUT/DELETE /api/contacts[/:id]`
//! - Strapi is the source of truth - no local cache, every read re-fetches
//! - Responses arrive wrapped in `{ data: { id, attributes } }` envelopes and
//!   are flattened with [`rolodex_core::flatten`] before decoding
//!
//! # Example
//!
//! ```rust,ignore
//! use rolodex_core::{ContactMutation, SearchQuery};
//! use rolodex_web::strapi::ContactsClient;
//!
//! let client = ContactsClient::new(&config.strapi)?;
//!
//! let contacts = client.search(&SearchQuery::new(Some("jane"))).await?;
//! let contact = client.create_empty().await?;
//! let contact = client
//!     .update(&contact.id, &ContactMutation { first: Some("Jane".into()), ..Default::default() })
//!     .await?;
//! ```

mod client;

pub use client::ContactsClient;

use thiserror::Error;

/// Longest slice of a response body kept in error messages and logs.
const MAX_BODY_EXCERPT: usize = 200;

/// Errors that can occur when talking to the content API.
#[derive(Debug, Error)]
pub enum StrapiError {
    /// HTTP request failed (connection refused, timeout, invalid body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status other than 404.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response had no usable `data` field.
    #[error("Response contained no data")]
    MissingData,

    /// API token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),
}

impl StrapiError {
    /// Returns true if the record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Extract a readable message from a Strapi error body.
///
/// Strapi reports failures as `{ data: null, error: { status, name, message } }`.
/// Anything else falls back to a truncated copy of the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| excerpt(body))
}

fn excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT).collect()
}
