//! Integration tests for the token-gated `GET /api/test` store probe.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_config, count_contacts, get, get_with_header,
    test_config, TEST_DIAGNOSTICS_TOKEN,
};
use folio_api::config::ServerConfig;
use folio_core::contact::NewContact;
use folio_db::repositories::ContactRepo;
use folio_notify::Notifications;
use sqlx::PgPool;

const TEST_URI: &str = "/api/test";
const TOKEN_HEADER: &str = "x-diagnostics-token";

// ---------------------------------------------------------------------------
// Test: access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_hidden_without_configured_token(pool: PgPool) {
    let config = ServerConfig {
        diagnostics_token: None,
        ..test_config()
    };
    let app = build_test_app_with_config(pool.clone(), config, Notifications::Disabled);

    let response = get_with_header(app, TEST_URI, TOKEN_HEADER, "anything").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], false);
    assert_eq!(count_contacts(&pool).await, 0, "probe must not run");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_requires_token_header(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = get(app, TEST_URI).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(count_contacts(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_rejects_wrong_token(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = get_with_header(app, TEST_URI, TOKEN_HEADER, "wrong-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid diagnostics token");
    assert_eq!(count_contacts(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: probe behaviour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_writes_probe_and_returns_it_first(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = get_with_header(app, TEST_URI, TOKEN_HEADER, TEST_DIAGNOSTICS_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Database connection is working!");

    let probe = &body["testDocument"];
    assert_eq!(probe["name"], "Test User");
    assert_eq!(probe["email"], "test@example.com");
    assert_eq!(
        probe["message"],
        "This is a test message to verify database connection"
    );
    assert!(probe["id"].is_i64());
    assert!(probe["createdAt"].is_string());

    let recent = body["recentContacts"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["id"], probe["id"]);

    assert_eq!(count_contacts(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_lists_at_most_five_newest(pool: PgPool) {
    for i in 0..6 {
        let contact = NewContact {
            name: format!("Visitor {i}"),
            email: format!("visitor{i}@example.com"),
            message: "hello".to_string(),
        };
        ContactRepo::create(&pool, &contact).await.unwrap();
    }
    let app = build_test_app(pool.clone());

    let response = get_with_header(app, TEST_URI, TOKEN_HEADER, TEST_DIAGNOSTICS_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let recent = body["recentContacts"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["id"], body["testDocument"]["id"]);
    assert_eq!(recent[1]["name"], "Visitor 5");
    assert_eq!(recent[4]["name"], "Visitor 2");

    assert_eq!(count_contacts(&pool).await, 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_diagnostics_reports_store_failure(pool: PgPool) {
    let app = build_test_app(pool.clone());
    pool.close().await;

    let response = get_with_header(app, TEST_URI, TOKEN_HEADER, TEST_DIAGNOSTICS_TOKEN).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Database connection test failed");
    assert!(!body["error"].as_str().unwrap().is_empty());
}
