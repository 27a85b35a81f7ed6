//! Index page and contact creation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use tracing::instrument;

use super::layout::{SearchParams, Sidebar};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Index page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub sidebar: Sidebar,
}

/// Display the contact list with the welcome pane.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<IndexTemplate> {
    let sidebar = Sidebar::load(&state, params.q.as_deref(), None).await?;
    Ok(IndexTemplate { sidebar })
}

/// Create an empty contact and open its edit form.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<Redirect> {
    let contact = state.contacts().create_empty().await?;

    add_breadcrumb(
        "contacts",
        "Created contact",
        Some(&[("contact_id", contact.id.as_str())]),
    );

    Ok(Redirect::to(&format!("/contacts/{}/edit", contact.id)))
}
