//! Sidebar shared by every page.

use rolodex_core::{Contact, SearchQuery};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `?q=` search parameter accepted by every page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// One entry in the sidebar contact list.
#[derive(Clone)]
pub struct ContactLink {
    pub id: String,
    pub name: Option<String>,
    pub favorite: bool,
    pub active: bool,
}

/// Sidebar display data: search box and matching contacts.
#[derive(Clone)]
pub struct Sidebar {
    pub q: String,
    pub contacts: Vec<ContactLink>,
}

impl Sidebar {
    /// Search contacts for the sidebar, marking `active_id` as selected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Search` if the contact list cannot be loaded.
    pub async fn load(
        state: &AppState,
        q: Option<&str>,
        active_id: Option<&str>,
    ) -> Result<Self> {
        let contacts = state
            .contacts()
            .search(&SearchQuery::new(q))
            .await
            .map_err(AppError::Search)?;

        Ok(Self::new(q, &contacts, active_id))
    }

    /// `?q=...` for links that should keep the current filter, or empty.
    #[must_use]
    pub fn query_suffix(&self) -> String {
        if self.q.is_empty() {
            String::new()
        } else {
            format!("?q={}", urlencoding::encode(&self.q))
        }
    }

    fn new(q: Option<&str>, contacts: &[Contact], active_id: Option<&str>) -> Self {
        Self {
            q: q.unwrap_or_default().to_string(),
            contacts: contacts
                .iter()
                .map(|contact| ContactLink {
                    id: contact.id.to_string(),
                    name: contact.display_name(),
                    favorite: contact.is_favorite(),
                    active: active_id == Some(contact.id.as_str()),
                })
                .collect(),
        }
    }
}
