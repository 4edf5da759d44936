//! Router-level tests that need no running database

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use fieldreserve_server::{
    api::create_router,
    config::AppConfig,
    models::user::{Role, UserClaims},
    repository::Repository,
    AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    // Never connects unless a handler touches the database
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let state = AppState::new(config.clone(), Repository::new(pool));
    (create_router(state), config)
}

fn token(config: &AppConfig, role: Role) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "player@example.com".to_string(),
        user_id: Uuid::new_v4(),
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fieldreserve");
    assert!(body["checked_at"].is_string());
    // Liveness never reports on the database
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/api/v1/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let (app, config) = app();
    let mut other = config.clone();
    other.auth.jwt_secret = "not-the-server-secret".to_string();

    let response = app
        .oneshot(
            Request::get("/api/v1/fields")
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&other, Role::Admin)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_forbid_regular_users() {
    let (app, config) = app();
    let bearer = format!("Bearer {}", token(&config, Role::User));

    let list = app
        .clone()
        .oneshot(
            Request::get("/api/v1/bookings")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::FORBIDDEN);

    let status = app
        .oneshot(
            Request::put(format!("/api/v1/bookings/{}/status", Uuid::new_v4()))
                .header(header::AUTHORIZATION, &bearer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"booked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn booking_form_requires_every_field() {
    let (app, config) = app();
    let boundary = "fieldreserve-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"field_id\"\r\n\r\n{id}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"booking_date\"\r\n\r\n2030-01-07\r\n\
         --{b}--\r\n",
        b = boundary,
        id = Uuid::new_v4()
    );

    let response = app
        .oneshot(
            Request::post("/api/v1/bookings")
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&config, Role::User)))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("total_payment"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["info"]["title"], "FieldReserve API");
}
