//! Contacts collection client.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use rolodex_core::{Contact, ContactId, ContactMutation, SearchQuery, flatten};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{StrapiError, api_error_message, excerpt};
use crate::config::StrapiConfig;

// =============================================================================
// ContactsClient
// =============================================================================

/// Client for the `/api/contacts` collection.
///
/// Cheap to clone. The base URL and token are fixed at construction.
#[derive(Clone)]
pub struct ContactsClient {
    inner: Arc<ContactsClientInner>,
}

struct ContactsClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl ContactsClient {
    /// Create a new client for the configured content API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StrapiConfig) -> Result<Self, StrapiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| StrapiError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ContactsClientInner {
                client,
                endpoint: config.contacts_endpoint(),
            }),
        })
    }

    /// Collection endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn record_url(&self, id: &ContactId) -> String {
        format!(
            "{}/{}",
            self.inner.endpoint,
            urlencoding::encode(id.as_str())
        )
    }

    /// Send a request and return the flattened `data` field of the response.
    ///
    /// A 404 becomes `NotFound(resource)`. Any other non-success status
    /// becomes `Api`, carrying Strapi's error message when it sent one.
    /// Failures are only logged at debug here; callers log them once via
    /// `log_failure`.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<Value, StrapiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(StrapiError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            debug!(
                status = %status,
                body = %excerpt(&body),
                "Strapi returned non-success status"
            );
            return Err(StrapiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let mut parsed: Value = serde_json::from_str(&body).map_err(|e| {
            debug!(body = %excerpt(&body), "Unparseable Strapi response");
            StrapiError::Parse(e)
        })?;

        let data = parsed
            .get_mut("data")
            .map(Value::take)
            .ok_or(StrapiError::MissingData)?;

        Ok(flatten(&data))
    }

    // =========================================================================
    // Contact Methods
    // =========================================================================

    /// List contacts whose first name, last name, or twitter handle contains
    /// the search term. Returns the first page when the term is blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a list
    /// of contacts.
    #[instrument(skip(self), fields(q = ?query.term()))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Contact>, StrapiError> {
        let url = format!("{}?{}", self.inner.endpoint, query.to_query_string());

        let result = async {
            let data = self
                .execute(self.inner.client.get(&url), "contacts")
                .await?;
            decode_contacts(data)
        }
        .await;

        result
            .inspect(|contacts| debug!(count = contacts.len(), "Contacts loaded"))
            .inspect_err(|e| log_failure("search", e))
    }

    /// Create a contact with no fields set. The server assigns `id` and
    /// `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self))]
    pub async fn create_empty(&self) -> Result<Contact, StrapiError> {
        let result = async {
            let data = self
                .execute(self.inner.client.post(&self.inner.endpoint), "contacts")
                .await?;
            decode_contact(data)
        }
        .await;

        result
            .inspect(|contact| tracing::info!(id = %contact.id, "Contact created"))
            .inspect_err(|e| log_failure("create", e))
    }

    /// Fetch a single contact.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the contact does not exist, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: &ContactId) -> Result<Contact, StrapiError> {
        let resource = format!("contact {id}");

        let result = async {
            let data = self
                .execute(self.inner.client.get(self.record_url(id)), &resource)
                .await?;
            if data.is_null() {
                return Err(StrapiError::NotFound(resource.clone()));
            }
            decode_contact(data)
        }
        .await;

        result.inspect_err(|e| log_failure("get", e))
    }

    /// Apply a partial update. Only the fields set in `mutation` are sent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the contact does not exist, or another error if
    /// the request fails.
    #[instrument(skip(self, mutation), fields(id = %id))]
    pub async fn update(
        &self,
        id: &ContactId,
        mutation: &ContactMutation,
    ) -> Result<Contact, StrapiError> {
        let request = self
            .inner
            .client
            .put(self.record_url(id))
            .json(&mutation.request_body());

        let result = async {
            let data = self.execute(request, &format!("contact {id}")).await?;
            decode_contact(data)
        }
        .await;

        result
            .inspect(|contact| tracing::info!(id = %contact.id, "Contact updated"))
            .inspect_err(|e| log_failure("update", e))
    }

    /// Delete a contact, returning the record as the server last saw it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the contact does not exist, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ContactId) -> Result<Contact, StrapiError> {
        let result = async {
            let data = self
                .execute(
                    self.inner.client.delete(self.record_url(id)),
                    &format!("contact {id}"),
                )
                .await?;
            decode_contact(data)
        }
        .await;

        result
            .inspect(|contact| tracing::info!(id = %contact.id, "Contact deleted"))
            .inspect_err(|e| log_failure("delete", e))
    }
}

// =============================================================================
// Decoding
// =============================================================================

fn decode_contact(data: Value) -> Result<Contact, StrapiError> {
    if !data.is_object() {
        return Err(StrapiError::MissingData);
    }
    Ok(Contact::from_flat(data)?)
}

fn decode_contacts(data: Value) -> Result<Vec<Contact>, StrapiError> {
    let Value::Array(items) = data else {
        return Err(StrapiError::MissingData);
    };

    items
        .into_iter()
        .map(|item| Contact::from_flat(item).map_err(StrapiError::from))
        .collect()
}

/// Log a failed operation. Missing records are expected and only warned about.
fn log_failure(operation: &str, error: &StrapiError) {
    if error.is_not_found() {
        tracing::warn!(operation, error = %error, "Contact not found");
    } else {
        tracing::error!(operation, error = %error, "Contact operation failed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_contact_requires_object() {
        assert!(matches!(
            decode_contact(Value::Null),
            Err(StrapiError::MissingData)
        ));
        assert!(matches!(
            decode_contact(json!([])),
            Err(StrapiError::MissingData)
        ));
    }

    #[test]
    fn test_decode_contact_reports_bad_fields() {
        let result = decode_contact(json!({ "id": 1, "first": 5 }));
        assert!(matches!(result, Err(StrapiError::Parse(_))));
    }

    #[test]
    fn test_decode_contacts() {
        let contacts = decode_contacts(json!([
            { "id": 1, "createdAt": "2024-01-01T00:00:00Z", "first": "Ada" },
            { "id": 2, "createdAt": "2024-01-02T00:00:00Z" }
        ]))
        .unwrap();

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].first.as_deref(), Some("Ada"));
        assert!(matches!(
            decode_contacts(json!({ "id": 1 })),
            Err(StrapiError::MissingData)
        ));
    }

    #[test]
    fn test_record_url_encodes_id() {
        let config = StrapiConfig::new("http://localhost:1337/").unwrap();
        let client = ContactsClient::new(&config).unwrap();

        assert_eq!(client.endpoint(), "http://localhost:1337/api/contacts");
        assert_eq!(
            client.record_url(&ContactId::new("a/b")),
            "http://localhost:1337/api/contacts/a%2Fb"
        );
    }
}
