//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Contact list (sidebar) with welcome pane, ?q= filters
//! POST /                        - Create an empty contact, redirect to its edit page
//!
//! # Contacts
//! GET  /contacts/{id}           - Contact detail
//! POST /contacts/{id}           - Toggle favorite
//! GET  /contacts/{id}/edit      - Edit form
//! POST /contacts/{id}/edit      - Validate and save, redirect to detail
//! POST /contacts/{id}/destroy   - Delete, redirect to /
//! ```
//!
//! Every page renders the sidebar from a contact search. When the search
//! fails the whole page is replaced by the error page.

pub mod contacts;
pub mod home;
pub mod layout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(contacts::show).post(contacts::favorite))
        .route("/{id}/edit", get(contacts::edit).post(contacts::update))
        .route("/{id}/destroy", post(contacts::destroy))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index).post(home::create))
        .nest("/contacts", contact_routes())
}
