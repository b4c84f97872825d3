#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use staybook_api::config::ServerConfig;
use staybook_api::router::build_app_router;
use staybook_api::state::AppState;
use staybook_core::clock::FixedClock;
use staybook_core::identity::IdentityVault;

/// AES-256 key used by every test app.
pub const TEST_IDENTITY_KEY: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Property-local "now" of the default test app: 2025-06-10 09:00.
pub fn default_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        identity_key_hex: TEST_IDENTITY_KEY.to_string(),
        property_utc_offset_minutes: None,
        log_json: false,
    }
}

/// Build the full application router, frozen at [`default_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_at(pool, default_now())
}

/// Build the full application router with the property clock frozen at
/// `local_now`. Uses the same middleware stack as production.
pub fn build_test_app_at(pool: PgPool, local_now: NaiveDateTime) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock: Arc::new(FixedClock::at_local(local_now)),
        vault: Arc::new(IdentityVault::from_hex_key(TEST_IDENTITY_KEY).unwrap()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Assert the status and decode the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Reference data for one building with two floors.
pub struct Seed {
    pub building_id: i64,
    pub floor_ids: Vec<i64>,
    pub room_type_id: i64,
    pub user_id: i64,
}

pub async fn seed_reference(pool: &PgPool) -> Seed {
    let (building_id,): (i64,) =
        sqlx::query_as("INSERT INTO buildings (name) VALUES ('Main') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    let mut floor_ids = Vec::new();
    for number in [1, 2] {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO floors (building_id, floor_number) VALUES ($1, $2) RETURNING id",
        )
        .bind(building_id)
        .bind(number)
        .fetch_one(pool)
        .await
        .unwrap();
        floor_ids.push(id);
    }

    let (room_type_id,): (i64,) = sqlx::query_as(
        "INSERT INTO room_types (name, capacity) VALUES ('Double', 2) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    let (user_id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (full_name, email) VALUES ('Front Desk', 'desk@example.com') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    Seed {
        building_id,
        floor_ids,
        room_type_id,
        user_id,
    }
}

/// Insert a room on the first floor.
pub async fn seed_room(pool: &PgPool, seed: &Seed, number: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO rooms (building_id, floor_id, room_type_id, room_number)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(seed.building_id)
    .bind(seed.floor_ids[0])
    .bind(seed.room_type_id)
    .bind(number)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Create a booking through the API and return its id.
pub async fn create_booking(
    app: &Router,
    seed: &Seed,
    room_id: i64,
    check_in: &str,
    check_out: &str,
) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/bookings",
        serde_json::json!({
            "room_id": room_id,
            "user_id": seed.user_id,
            "check_in_date": check_in,
            "check_out_date": check_out,
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Register an occupant through the API and return the response body.
pub async fn register_occupant(app: &Router, booking_id: i64, document: &str, extra: Value) -> Value {
    let mut body = serde_json::json!({
        "booking_id": booking_id,
        "full_name": "Asha Rao",
        "phone_number": "+91 9876543210",
        "identity_document": document,
    });
    if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), extra) {
        target.extend(fields);
    }
    let response = post_json(app.clone(), "/api/v1/bookings/occupants", body).await;
    expect_json(response, StatusCode::CREATED).await
}

/// Force a booking status directly in the database.
pub async fn set_booking_status(pool: &PgPool, booking_id: i64, status: &str) {
    sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
        .bind(booking_id)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
}
