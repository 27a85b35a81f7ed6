//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::strapi::{ContactsClient, StrapiError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach the content API through
/// [`AppState::contacts`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    contacts: ContactsClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the contacts client cannot be built from the
    /// content API configuration.
    pub fn new(config: &WebConfig) -> Result<Self, StrapiError> {
        let contacts = ContactsClient::new(&config.strapi)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { contacts }),
        })
    }

    /// Get a reference to the contacts client.
    #[must_use]
    pub fn contacts(&self) -> &ContactsClient {
        &self.inner.contacts
    }
}
