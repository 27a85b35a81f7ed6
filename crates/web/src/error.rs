//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! rendering the error page. All route handlers return `Result<T, AppError>`.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::strapi::StrapiError;

/// Status text shown when the contact list cannot be loaded.
pub const SEARCH_FAILED_STATUS_TEXT: &str = "This is a custom text error";

/// Body shown when the contact list cannot be loaded.
pub const SEARCH_FAILED_MESSAGE: &str = "oh no!";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contact list could not be loaded. Blocks every page.
    #[error("Search failed: {0}")]
    Search(#[source] StrapiError),

    /// Content API operation failed.
    #[error("Strapi error: {0}")]
    Strapi(#[from] StrapiError),

    /// No route or resource at this path.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    status_text: &'static str,
    detail: Option<&'static str>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Strapi(StrapiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Strapi(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Text shown next to the status code. Internal details are never exposed.
    #[must_use]
    pub const fn status_text(&self) -> &'static str {
        match self {
            Self::Search(_) => SEARCH_FAILED_STATUS_TEXT,
            Self::Strapi(StrapiError::NotFound(_)) | Self::NotFound(_) => "Not Found",
            Self::Strapi(_) => "External service error",
        }
    }

    /// Extra detail shown below the status line.
    #[must_use]
    pub const fn detail(&self) -> Option<&'static str> {
        match self {
            Self::Search(_) => Some(SEARCH_FAILED_MESSAGE),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry. The content API client has
        // already logged the underlying failure.
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::debug!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error captured"
            );
        }

        let status = self.status();
        let template = ErrorTemplate {
            status: status.as_u16(),
            status_text: self.status_text(),
            detail: self.detail(),
        };

        match template.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, template.status_text).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("contacts", "Updated contact", Some(&[("contact_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
