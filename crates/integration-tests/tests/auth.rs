//! Registration, login and profile flows.

use axum::http::{Method, StatusCode};
use fruit_porter_integration_tests::{decimal, TestApp, DEMO_EMAIL, DEMO_PASSWORD};
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn register_login_and_profile_round_trip() {
    let app = TestApp::seeded();
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "newcomer@example.com",
                "password": "orchard-pass-1",
                "name": "Newcomer",
                "phone": "555-0199"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal(&body["user"]["credit"]), Decimal::ZERO);
    assert_eq!(body["user"]["is_admin"], json!(false));
    assert!(body["user"].get("password_hash").is_none());

    let token = app.login("newcomer@example.com", "orchard-pass-1").await;
    let (status, body) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], json!("newcomer@example.com"));
}

#[tokio::test]
async fn email_addresses_are_normalized_to_lowercase() {
    let app = TestApp::seeded();
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "Mixed.Case@Example.com",
                "password": "orchard-pass-1",
                "name": "Mixed"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["email"], json!("mixed.case@example.com"));

    // Login works regardless of the casing used.
    app.login("MIXED.CASE@EXAMPLE.COM", "orchard-pass-1").await;
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::seeded();
    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": DEMO_EMAIL,
                "password": "orchard-pass-1",
                "name": "Impostor"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_registration_input_is_rejected() {
    let app = TestApp::seeded();
    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "not-an-email", "password": "orchard-pass-1", "name": "X" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "short@example.com", "password": "tiny", "name": "X" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "blank@example.com", "password": "orchard-pass-1", "name": "  " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let app = TestApp::seeded();
    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": DEMO_EMAIL, "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": DEMO_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_a_valid_token() {
    let app = TestApp::seeded();
    let (status, _) = app.get("/api/auth/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/profile", Some("not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_persists() {
    let app = TestApp::seeded();
    let token = app.login(DEMO_EMAIL, DEMO_PASSWORD).await;
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/auth/profile",
            Some(&token),
            Some(json!({
                "name": "Demo Renamed",
                "phone": "555-0101",
                "address": "99 Grove Road"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(body["user"]["name"], json!("Demo Renamed"));
    assert_eq!(body["user"]["address"], json!("99 Grove Road"));
}
