//! Contact detail, edit, favorite, and delete handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rolodex_core::{Contact, ContactId, ContactMutation};
use serde::Deserialize;
use tracing::instrument;

use super::layout::{SearchParams, Sidebar};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::validation::{ContactForm, FieldErrors, INVALID_FORM_MESSAGE, validate};

// =============================================================================
// View Types
// =============================================================================

/// Contact display data for the detail page.
#[derive(Clone)]
pub struct ContactView {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub twitter: Option<String>,
    pub notes: Option<String>,
    pub favorite: bool,
    /// Creation date, e.g. "March 1, 2024"
    pub added: Option<String>,
}

impl From<&Contact> for ContactView {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.display_name(),
            avatar: contact.avatar.clone().filter(|url| !url.is_empty()),
            twitter: contact.twitter_handle().map(str::to_string),
            notes: contact.notes.clone().filter(|notes| !notes.is_empty()),
            favorite: contact.is_favorite(),
            added: contact
                .created_at_utc()
                .map(|created| created.format("%B %-d, %Y").to_string()),
        }
    }
}

/// Edit form values. Empty strings for unset fields.
#[derive(Clone, Default)]
pub struct EditView {
    pub id: String,
    pub first: String,
    pub last: String,
    pub avatar: String,
    pub twitter: String,
    pub notes: String,
}

impl From<&Contact> for EditView {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            first: contact.first.clone().unwrap_or_default(),
            last: contact.last.clone().unwrap_or_default(),
            avatar: contact.avatar.clone().unwrap_or_default(),
            twitter: contact.twitter.clone().unwrap_or_default(),
            notes: contact.notes.clone().unwrap_or_default(),
        }
    }
}

impl EditView {
    fn from_form(id: &ContactId, form: ContactForm) -> Self {
        Self {
            id: id.to_string(),
            first: form.first.unwrap_or_default(),
            last: form.last.unwrap_or_default(),
            avatar: form.avatar.unwrap_or_default(),
            twitter: form.twitter.unwrap_or_default(),
            notes: form.notes.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Contact detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "contacts/show.html")]
pub struct ShowTemplate {
    pub sidebar: Sidebar,
    pub contact: ContactView,
}

/// Contact edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "contacts/edit.html")]
pub struct EditTemplate {
    pub sidebar: Sidebar,
    pub contact: EditView,
    pub errors: FieldErrors,
    pub message: Option<&'static str>,
}

/// Favorite toggle form.
#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    #[serde(default)]
    pub favorite: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Load the sidebar and one contact concurrently.
async fn load_with_contact(
    state: &AppState,
    params: &SearchParams,
    id: &ContactId,
) -> Result<(Sidebar, Contact)> {
    tokio::try_join!(
        Sidebar::load(state, params.q.as_deref(), Some(id.as_str())),
        async { state.contacts().get(id).await.map_err(AppError::from) },
    )
}

/// Display a contact.
#[instrument(skip(state, params))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<ShowTemplate> {
    let id = ContactId::from(id);
    let (sidebar, contact) = load_with_contact(&state, &params, &id).await?;

    Ok(ShowTemplate {
        sidebar,
        contact: ContactView::from(&contact),
    })
}

/// Set or clear the favorite flag.
#[instrument(skip(state, form))]
pub async fn favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FavoriteForm>,
) -> Result<Redirect> {
    let id = ContactId::from(id);
    let favorite = form.favorite == "true";

    state
        .contacts()
        .update(&id, &ContactMutation::favorite(favorite))
        .await?;

    Ok(Redirect::to(&format!("/contacts/{id}")))
}

/// Display the edit form.
#[instrument(skip(state, params))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<EditTemplate> {
    let id = ContactId::from(id);
    let (sidebar, contact) = load_with_contact(&state, &params, &id).await?;

    Ok(EditTemplate {
        sidebar,
        contact: EditView::from(&contact),
        errors: FieldErrors::default(),
        message: None,
    })
}

/// Validate and save the edit form.
///
/// Invalid submissions re-render the form with the submitted values and
/// a 422 status. The sidebar keeps the `?q=` filter the form was opened with.
#[instrument(skip(state, params, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let id = ContactId::from(id);

    let mutation = match validate(&form) {
        Ok(mutation) => mutation,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Invalid contact form");
            let sidebar = Sidebar::load(&state, params.q.as_deref(), Some(id.as_str())).await?;
            let template = EditTemplate {
                sidebar,
                contact: EditView::from_form(&id, form),
                errors,
                message: Some(INVALID_FORM_MESSAGE),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let contact = state.contacts().update(&id, &mutation).await?;

    add_breadcrumb(
        "contacts",
        "Updated contact",
        Some(&[("contact_id", contact.id.as_str())]),
    );

    Ok(Redirect::to(&format!("/contacts/{}", contact.id)).into_response())
}

/// Delete a contact and return to the index.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = ContactId::from(id);
    state.contacts().delete(&id).await?;

    add_breadcrumb("contacts", "Deleted contact", Some(&[("contact_id", id.as_str())]));

    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact() -> Contact {
        Contact::from_flat(json!({
            "id": 7,
            "createdAt": "2024-03-01T12:30:00.000Z",
            "first": "Ada",
            "last": "Lovelace",
            "avatar": "",
            "twitter": "@ada",
            "favorite": true
        }))
        .unwrap()
    }

    #[test]
    fn test_contact_view() {
        let view = ContactView::from(&contact());
        assert_eq!(view.id, "7");
        assert_eq!(view.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(view.avatar, None);
        assert_eq!(view.twitter.as_deref(), Some("ada"));
        assert!(view.favorite);
        assert_eq!(view.added.as_deref(), Some("March 1, 2024"));
    }

    #[test]
    fn test_edit_view_from_form_keeps_submitted_values() {
        let form = ContactForm {
            first: Some("Al".to_string()),
            notes: Some("hi".to_string()),
            ..ContactForm::default()
        };
        let view = EditView::from_form(&ContactId::new("3"), form);
        assert_eq!(view.id, "3");
        assert_eq!(view.first, "Al");
        assert_eq!(view.last, "");
        assert_eq!(view.notes, "hi");
    }
}
