//! Integration tests for the contact pages.
//!
//! Requests go through the full router; the content API is mocked.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header::LOCATION};
use rolodex_integration_tests::{TestContext, body_text, contact_record, list, single};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

/// Mount a sidebar search returning `records`.
async fn mount_search(ctx: &TestContext, records: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(records)))
        .mount(&ctx.mock_server)
        .await;
}

async fn mount_contact(ctx: &TestContext, id: u64, attributes: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/contacts/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(single(contact_record(id, &attributes))),
        )
        .mount(&ctx.mock_server)
        .await;
}

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_index_lists_contacts() {
    let ctx = TestContext::new().await;
    mount_search(
        &ctx,
        vec![
            contact_record(1, &json!({ "first": "Jane", "last": "Doe", "favorite": true })),
            contact_record(2, &json!({})),
        ],
    )
    .await;

    let response = ctx.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_text(response).await;
    assert!(body.contains("Jane Doe"));
    assert!(body.contains("★"));
    assert!(body.contains("No Name"));
    assert!(body.contains(r#"href="/contacts/2""#));
}

#[tokio::test]
async fn test_index_empty_list() {
    let ctx = TestContext::new().await;
    mount_search(&ctx, vec![]).await;

    let body = body_text(ctx.get("/").await).await;
    assert!(body.contains("No contacts"));
}

#[tokio::test]
async fn test_index_forwards_search_term() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .and(query_param("filters[$or][0][first][$contains]", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![contact_record(
            4,
            &json!({ "first": "Ada" }),
        )])))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.get("/?q=ada").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"value="ada""#));
    assert!(body.contains("Ada"));
}

#[tokio::test]
async fn test_search_failure_renders_error_page() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.get("/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response).await;
    assert!(body.contains("Ooops, its game over"));
    assert!(body.contains("500 This is a custom text error"));
    assert!(body.contains("oh no!"));
}

#[tokio::test]
async fn test_show_contact() {
    let ctx = TestContext::new().await;
    mount_search(&ctx, vec![contact_record(42, &json!({ "first": "Ada" }))]).await;
    mount_contact(
        &ctx,
        42,
        json!({
            "first": "Ada",
            "last": "Lovelace",
            "twitter": "@ada",
            "notes": "First programmer",
            "favorite": true
        }),
    )
    .await;

    let response = ctx.get("/contacts/42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("https://twitter.com/ada"));
    assert!(body.contains("First programmer"));
    assert!(body.contains(r#"value="false""#));
    assert!(body.contains("Added March 1, 2024"));
    assert!(body.contains(r#"class="active""#));
}

#[tokio::test]
async fn test_show_missing_contact_is_404() {
    let ctx = TestContext::new().await;
    mount_search(&ctx, vec![]).await;

    Mock::given(method("GET"))
        .and(path("/api/contacts/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.get("/contacts/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404 Not Found"));
}

#[tokio::test]
async fn test_create_redirects_to_edit() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(single(contact_record(8, &json!({})))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.post_form("/", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/8/edit");
}

#[tokio::test]
async fn test_edit_form_prefilled() {
    let ctx = TestContext::new().await;
    mount_search(&ctx, vec![]).await;
    mount_contact(&ctx, 5, json!({ "first": "Grace", "avatar": "https://example.com/g.png" })).await;

    let body = body_text(ctx.get("/contacts/5/edit").await).await;
    assert!(body.contains(r#"value="Grace""#));
    assert!(body.contains("https://example.com/g.png"));
    assert!(!body.contains("Please fill out all missing fields."));
}

#[tokio::test]
async fn test_update_invalid_form_rerenders_with_errors() {
    let ctx = TestContext::new().await;
    mount_search(&ctx, vec![]).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .post_form("/contacts/5/edit", "first=Al&last=Turing&avatar=nope&twitter=&notes=")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("Please fill out all missing fields."));
    assert!(body.contains("String must contain at least 3 character(s)"));
    assert!(body.contains("Invalid url"));
    assert!(body.contains(r#"value="Turing""#));
}

#[tokio::test]
async fn test_update_valid_form_saves_and_redirects() {
    let ctx = TestContext::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/contacts/5"))
        .and(body_json(json!({
            "data": {
                "first": "Alan",
                "last": "Turing",
                "avatar": "https://example.com/alan.png",
                "twitter": "",
                "notes": "Enigma"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 5, "attributes": { "first": "Alan", "last": "Turing" } }
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .post_form(
            "/contacts/5/edit",
            "first=Alan&last=Turing&avatar=https%3A%2F%2Fexample.com%2Falan.png&twitter=&notes=Enigma",
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/5");
}

#[tokio::test]
async fn test_update_failure_is_bad_gateway() {
    let ctx = TestContext::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/contacts/5"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "data": null,
            "error": { "status": 400, "name": "ValidationError", "message": "Invalid key" }
        })))
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .post_form(
            "/contacts/5/edit",
            "first=Alan&last=Turing&avatar=https%3A%2F%2Fexample.com%2Fa.png&twitter=&notes=",
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(!body_text(response).await.contains("Invalid key"));
}

#[tokio::test]
async fn test_favorite_toggle() {
    let ctx = TestContext::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/contacts/6"))
        .and(body_json(json!({ "data": { "favorite": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(single(contact_record(
            6,
            &json!({ "favorite": true }),
        ))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.post_form("/contacts/6", "favorite=true").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/6");
}

#[tokio::test]
async fn test_destroy_redirects_home() {
    let ctx = TestContext::new().await;

    Mock::given(method("DELETE"))
        .and(path("/api/contacts/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(single(contact_record(6, &json!({})))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx.post_form("/contacts/6/destroy", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_unknown_path_renders_404_page() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Ooops, its game over"));
}

#[tokio::test]
async fn test_invalid_form_keeps_sidebar_filter() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .and(query_param("filters[$or][0][first][$contains]", "tur"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(vec![contact_record(
            5,
            &json!({ "first": "Alan", "last": "Turing" }),
        )])))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let response = ctx
        .post_form("/contacts/5/edit?q=tur", "first=Al&last=Turing&avatar=nope&twitter=")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains(r#"value="tur""#));
    assert!(body.contains(r#"action="/contacts/5/edit?q=tur""#));
    assert!(body.contains(r#"class="active""#));
}
