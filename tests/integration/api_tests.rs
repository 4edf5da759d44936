//! API integration tests against a running server
//!
//! Start the server with a bootstrap admin
//! (FIELDRESERVE_AUTH__BOOTSTRAP_ADMIN_EMAIL / _PASSWORD set to the values
//! below), then run: cargo test --test api -- --ignored

use chrono::{Datelike, Duration, Utc};
use reqwest::{multipart, Client};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8000/api/v1";
const ADMIN_EMAIL: &str = "admin@fieldreserve.local";
const ADMIN_PASSWORD: &str = "admin-password";

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn register_player(client: &Client) -> String {
    let email = format!("player-{}@example.com", Uuid::new_v4());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test Player",
            "email": email,
            "password": "player-password"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    login(client, &email, "player-password").await
}

/// Creates a category, a field priced 100000/h and a 08:00-22:00 schedule
/// for the weekday of `date`. Returns the field id.
async fn open_field(client: &Client, admin: &str, date: chrono::NaiveDate) -> String {
    let category: Value = client
        .post(format!("{}/categories", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({ "name": "Futsal", "description": "Indoor futsal" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let field: Value = client
        .post(format!("{}/fields", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "category_id": category["category_id"],
            "field_name": format!("Court {}", Uuid::new_v4()),
            "field_price": 100000
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let field_id = field["field_id"].as_str().unwrap().to_string();

    let response = client
        .post(format!("{}/schedules", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "field_id": field_id,
            "day_of_week": date.weekday().num_days_from_sunday(),
            "open_time": "08:00",
            "close_time": "22:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    field_id
}

fn booking_form(field_id: &str, date: &str, start: &str, end: &str, total: &str) -> multipart::Form {
    multipart::Form::new()
        .text("field_id", field_id.to_string())
        .text("booking_date", date.to_string())
        .text("start_time", start.to_string())
        .text("end_time", end.to_string())
        .text("payment_method", "bank_transfer")
        .text("total_payment", total.to_string())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "reachable");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let admin = login(&client, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let player = register_player(&client).await;

    let date = (Utc::now() + Duration::days(3)).date_naive();
    let date_str = date.format("%Y-%m-%d").to_string();
    let field_id = open_field(&client, &admin, date).await;

    // Admission
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&player)
        .multipart(booking_form(&field_id, &date_str, "10:00", "12:00", "200000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.unwrap();
    assert_eq!(booking["status"], "pending");
    let booking_id = booking["booking_id"].as_str().unwrap().to_string();

    // Same slot again
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&player)
        .multipart(booking_form(&field_id, &date_str, "11:00", "12:00", "100000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // Outside operating hours
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&player)
        .multipart(booking_form(&field_id, &date_str, "21:00", "23:00", "200000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // With proof: waiting for verification, then approved by an admin
    let proof = multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF])
        .file_name("receipt.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(&player)
        .multipart(
            booking_form(&field_id, &date_str, "14:00", "15:00", "100000").part("proof_payment", proof),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let with_proof: Value = response.json().await.unwrap();
    assert_eq!(with_proof["status"], "waiting_verification");

    let response = client
        .put(format!("{}/bookings/{}/status", BASE_URL, with_proof["booking_id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .json(&json!({ "status": "booked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let verified: Value = response.json().await.unwrap();
    assert_eq!(verified["status"], "booked");
    assert!(verified["payment_verified_at"].is_string());

    // Owner cancels the pending one, then cannot change it again
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .bearer_auth(&player)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .put(format!("{}/bookings/{}/status", BASE_URL, booking_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "booked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // History contains both bookings
    let history: Value = client
        .get(format!("{}/bookings/history", BASE_URL))
        .bearer_auth(&player)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["total"], 2);
}
