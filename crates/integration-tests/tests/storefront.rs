//! Public catalog and settings endpoints.

use axum::http::StatusCode;
use fruit_porter_integration_tests::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD, DEMO_EMAIL, DEMO_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn health_answers_without_auth() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn catalog_lists_and_pages() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(12));
    assert_eq!(body["products"].as_array().map(Vec::len), Some(12));

    let (_, body) = app.get("/api/products?limit=5&offset=10", None).await;
    assert_eq!(body["total"], json!(12));
    assert_eq!(body["products"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn catalog_filters_combine() {
    let app = TestApp::seeded();
    let (_, body) = app
        .get("/api/products?category=2&featured=true", None)
        .await;
    let products = body["products"].as_array().cloned().unwrap_or_default();
    assert_eq!(products.len(), 1);
    assert_eq!(products.first().map(|p| p["name"].clone()), Some(json!("Navel Oranges")));
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = TestApp::seeded();
    let (_, body) = app.get("/api/products?search=CRATE", None).await;
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn shelves_honor_their_flags() {
    let app = TestApp::seeded();
    let (_, body) = app.get("/api/products/featured", None).await;
    let products = body["products"].as_array().cloned().unwrap_or_default();
    assert!(!products.is_empty() && products.len() <= 8);
    assert!(products.iter().all(|p| p["is_featured"] == json!(true)));

    let (_, body) = app.get("/api/products/seasonal", None).await;
    let products = body["products"].as_array().cloned().unwrap_or_default();
    assert!(products.iter().all(|p| p["is_seasonal"] == json!(true)));
}

#[tokio::test]
async fn featured_shelf_holds_eight_products() {
    let app = TestApp::seeded();
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    // The seed ships six featured products; add three more to overflow the shelf.
    for name in ["Starfruit", "Lychee", "Rambutan"] {
        let (status, body) = app
            .post(
                "/api/admin/products",
                Some(&admin),
                json!({
                    "category_id": 4,
                    "name": name,
                    "price": "39.00",
                    "stock": 10,
                    "is_featured": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (_, body) = app.get("/api/products/featured", None).await;
    assert_eq!(body["products"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn product_detail_carries_category_name() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/api/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], json!("Honeycrisp Apples"));
    assert_eq!(body["product"]["category_name"], json!("Seasonal Picks"));

    let (status, _) = app.get("/api/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_come_back_in_display_order() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/api/products/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["categories"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("Seasonal Picks"));
    assert_eq!(names.len(), 6);
}

#[tokio::test]
async fn single_setting_reads_fall_back_to_defaults() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/api/settings/theme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], json!("default"));

    let (status, body) = app.get("/api/settings/marquee", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["value"].is_string());

    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    app.put("/api/settings/theme", Some(&admin), json!({ "theme": "harvest" }))
        .await;
    let (_, body) = app.get("/api/settings/theme", None).await;
    assert_eq!(body["value"], json!("harvest"));
}

#[tokio::test]
async fn settings_read_is_public_but_writes_are_admin_only() {
    let app = TestApp::seeded();
    let (status, body) = app.get("/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["current_theme"], json!("default"));

    let (status, _) = app
        .put("/api/settings/theme", None, json!({ "theme": "harvest" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let demo = app.login(DEMO_EMAIL, DEMO_PASSWORD).await;
    let (status, _) = app
        .put("/api/settings/theme", Some(&demo), json!({ "theme": "harvest" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _) = app
        .put("/api/settings/theme", Some(&admin), json!({ "theme": "harvest" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/settings", None).await;
    assert_eq!(body["settings"]["current_theme"], json!("harvest"));
}

#[tokio::test]
async fn unknown_theme_is_rejected() {
    let app = TestApp::seeded();
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _) = app
        .put("/api/settings/theme", Some(&admin), json!({ "theme": "vaporwave" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marquee_update_shows_up_in_settings() {
    let app = TestApp::seeded();
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _) = app
        .put(
            "/api/settings/marquee",
            Some(&admin),
            json!({ "text": "Cherry season is here" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/settings", None).await;
    assert_eq!(body["settings"]["marquee_text"], json!("Cherry season is here"));

    let (_, body) = app.get("/api/settings/themes", None).await;
    assert!(body["themes"].as_array().is_some_and(|t| t.len() >= 2));
}
