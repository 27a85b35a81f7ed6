//! Rolodex Core - Shared types library.
//!
//! This crate provides the types used by the Rolodex web application and its
//! tests:
//! - `web` - Server-rendered contacts UI backed by a Strapi content API
//! - `integration-tests` - End-to-end tests against a mock content API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`envelope`] - Flattening of `{ data: { attributes: {...} } }` response envelopes
//! - [`contact`] - Contact records, IDs, and partial updates
//! - [`query`] - Nested bracket query-string encoding and the contact search filter

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod contact;
pub mod envelope;
pub mod query;

pub use contact::{Contact, ContactId, ContactMutation, DataEnvelope};
pub use envelope::{Envelope, EnvelopeRecord, FieldValue, flatten};
pub use query::{SEARCH_PAGE_SIZE, SearchQuery};
