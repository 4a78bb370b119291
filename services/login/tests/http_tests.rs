//! End-to-end tests of the HTTP surface.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use login_service::clock::ManualClock;
use login_service::http::{self, DiscoveryDocument, ErrorBody, UserInfoResponse};
use login_service::issuer::TokenResponse;
use login_service::{Config, TokenEngine};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let engine = TokenEngine::with_clock(
        Config::default(),
        Arc::new(ManualClock::at_timestamp(1_700_000_000)),
    )
    .unwrap();
    http::router(Arc::new(engine))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn post_token(body: &Value) -> Request<Body> {
    Request::post("/oauth2/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn login(app: &Router) -> TokenResponse {
    let (status, body) = send(
        app,
        post_token(&json!({
            "grant_type": "password",
            "client_id": "demo-client",
            "username": "alice",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    parse(&body)
}

#[tokio::test]
async fn test_password_grant_and_userinfo_flow() {
    let app = app();
    let tokens = login(&app).await;
    assert_eq!(tokens.token_type, "Bearer");
    assert!(!tokens.id_token.is_empty());

    let request = Request::get("/oauth2/userinfo")
        .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let info: UserInfoResponse = parse(&body);
    assert_eq!(info.sub, "alice");
    assert_eq!(info.preferred_username, "alice");
    assert_eq!(info.name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_userinfo_query_fallback() {
    let app = app();
    let tokens = login(&app).await;

    let uri = format!("/oauth2/userinfo?access_token={}", tokens.access_token);
    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<UserInfoResponse>(&body).sub, "alice");
}

#[tokio::test]
async fn test_userinfo_without_token() {
    let app = app();
    let response = app.clone().oneshot(get("/oauth2/userinfo")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn test_userinfo_rejects_id_token() {
    let app = app();
    let tokens = login(&app).await;

    let uri = format!("/oauth2/userinfo?access_token={}", tokens.id_token);
    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse::<ErrorBody>(&body).error, "invalid_token");
}

#[tokio::test]
async fn test_secret_alias_accepted() {
    let app = app();
    let (status, _) = send(
        &app,
        post_token(&json!({
            "grant_type": "password",
            "client_id": "demo-client",
            "username": "bob",
            "secret": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rotation_over_http() {
    let app = app();
    let tokens = login(&app).await;
    let refresh = json!({
        "grant_type": "refresh_token",
        "client_id": "demo-client",
        "refresh_token": tokens.refresh_token,
    });

    let (status, body) = send(&app, post_token(&refresh)).await;
    assert_eq!(status, StatusCode::OK);
    let rotated: TokenResponse = parse(&body);
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let (status, body) = send(&app, post_token(&refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse::<ErrorBody>(&body).error, "invalid_grant");
}

#[tokio::test]
async fn test_token_endpoint_errors() {
    let app = app();
    let cases = [
        (
            json!({"grant_type": "password", "client_id": "demo-client", "username": "alice", "password": "nope"}),
            StatusCode::UNAUTHORIZED,
            "invalid_grant",
        ),
        (
            json!({"grant_type": "password", "client_id": "unknown", "username": "alice", "password": "password123"}),
            StatusCode::BAD_REQUEST,
            "invalid_client",
        ),
        (
            json!({"grant_type": "client_credentials", "client_id": "demo-client"}),
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
        ),
        (
            json!({"grant_type": "password", "client_id": "demo-client"}),
            StatusCode::BAD_REQUEST,
            "invalid_request",
        ),
    ];

    for (request, expected_status, expected_error) in cases {
        let (status, body) = send(&app, post_token(&request)).await;
        assert_eq!(status, expected_status, "request: {request}");
        assert_eq!(parse::<ErrorBody>(&body).error, expected_error);
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let app = app();
    let request = Request::post("/oauth2/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorBody>(&body).error, "invalid_request");
}

#[tokio::test]
async fn test_discovery_and_jwks() {
    let app = app();

    let (status, body) = send(&app, get("/.well-known/openid-configuration")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: DiscoveryDocument = parse(&body);
    assert_eq!(doc.issuer, "http://localhost:8000");
    assert_eq!(doc.userinfo_endpoint, "http://localhost:8000/oauth2/userinfo");
    assert_eq!(doc.id_token_signing_alg_values_supported, vec!["HS256"]);

    let (status, body) = send(&app, get("/oidc/jwks")).await;
    assert_eq!(status, StatusCode::OK);
    let jwks: Value = parse(&body);
    let key = &jwks["keys"][0];
    assert_eq!(key["kty"], "oct");
    assert_eq!(key["kid"], "demo-symmetric-key");
    assert_eq!(key["use"], "sig");
    assert_eq!(key["alg"], "HS256");
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse::<Value>(&body),
        json!({"status": "ok", "service": "login-service"})
    );

    login(&app).await;
    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body)
        .unwrap()
        .contains("login_service_grants_total"));
}
