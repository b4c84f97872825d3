//! Integration tests for the dashboard and the occupancy and meal reports.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    build_test_app, build_test_app_at, create_booking, expect_json, get, post_json, put_json,
    register_occupant, seed_reference, seed_room,
};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Ids created by [`seed_scenario`].
struct Scenario {
    guest_user_id: i64,
    checked_in: i64,
    upcoming: i64,
    cancelled: i64,
}

/// Three rooms and three bookings, as seen on 2025-06-10 09:00:
///
/// - 101: 06-10..06-12, checked in, one guest present with every meal;
/// - 102: 06-11..06-13, booked by a second user, one guest with breakfast;
/// - 103: 06-10..06-11, cancelled, one guest with every meal.
async fn seed_scenario(pool: &PgPool, app: &axum::Router) -> Scenario {
    let seed = seed_reference(pool).await;
    let room_a = seed_room(pool, &seed, "101").await;
    let room_b = seed_room(pool, &seed, "102").await;
    let room_c = seed_room(pool, &seed, "103").await;

    let (guest_user_id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (full_name, email) VALUES ('Travel Desk', 'travel@example.com') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    let all_meals = json!({ "has_breakfast": true, "has_lunch": true, "has_dinner": true });

    let checked_in = create_booking(app, &seed, room_a, "2025-06-10", "2025-06-12").await;
    let occupant = register_occupant(app, checked_in, "111111111111", all_meals.clone()).await;
    let occupant_id = occupant["data"]["id"].as_i64().unwrap();
    let response = put_json(
        app.clone(),
        &format!("/api/v1/bookings/occupants/{occupant_id}/status"),
        json!({ "is_checked_in": true, "is_checked_out": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = put_json(
        app.clone(),
        &format!("/api/v1/bookings/{checked_in}/status"),
        json!({ "status": "CheckedIn" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        "/api/v1/bookings",
        json!({
            "room_id": room_b,
            "user_id": guest_user_id,
            "check_in_date": "2025-06-11",
            "check_out_date": "2025-06-13",
        }),
    )
    .await;
    let upcoming = expect_json(response, StatusCode::CREATED).await["data"]["id"]
        .as_i64()
        .unwrap();
    register_occupant(
        app,
        upcoming,
        "222222222222",
        json!({ "full_name": "Meera Iyer", "has_breakfast": true }),
    )
    .await;

    let cancelled = create_booking(app, &seed, room_c, "2025-06-10", "2025-06-11").await;
    register_occupant(app, cancelled, "333333333333", all_meals).await;
    let response = put_json(
        app.clone(),
        &format!("/api/v1/bookings/{cancelled}/status"),
        json!({ "status": "Cancelled" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    Scenario {
        guest_user_id,
        checked_in,
        upcoming,
        cancelled,
    }
}

fn tally(value: &Value) -> (i64, i64, i64, i64) {
    (
        value["breakfast"].as_i64().unwrap(),
        value["lunch"].as_i64().unwrap(),
        value["dinner"].as_i64().unwrap(),
        value["total"].as_i64().unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_stats_for_today(pool: PgPool) {
    let app = build_test_app(pool.clone());
    seed_scenario(&pool, &app).await;

    let json = expect_json(get(app, "/api/v1/dashboard/stats").await, StatusCode::OK).await;
    let stats = &json["data"];

    assert_eq!(stats["date"], "2025-06-10");
    assert_eq!(stats["total_rooms"], 3);
    assert_eq!(stats["booked_rooms"], 1);
    assert_eq!(stats["available_rooms"], 2);
    assert_eq!(stats["today_check_ins"], 1);
    assert_eq!(stats["today_check_outs"], 0);
    assert_eq!(stats["pending_bookings"], 0);
    assert_eq!(stats["cancelled_bookings"], 1);
    assert_eq!(stats["total_occupants"], 1);
    assert_eq!(stats["occupants_checked_in"], 1);
    assert_eq!(tally(&stats["meals"]), (1, 1, 1, 3));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_stats_scope_bookings_but_not_rooms(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let scenario = seed_scenario(&pool, &app).await;

    let json = expect_json(
        get(
            app,
            &format!(
                "/api/v1/dashboard/user-stats/{}?date=2025-06-11",
                scenario.guest_user_id
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let stats = &json["data"];

    assert_eq!(stats["booked_rooms"], 2);
    assert_eq!(stats["available_rooms"], 1);
    assert_eq!(stats["today_check_ins"], 1);
    assert_eq!(stats["pending_bookings"], 1);
    assert_eq!(stats["cancelled_bookings"], 0);
    assert_eq!(stats["total_occupants"], 1);
    assert_eq!(stats["occupants_checked_in"], 0);
    assert_eq!(tally(&stats["meals"]), (1, 0, 0, 1));
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_by_day_counts_booked_rooms(pool: PgPool) {
    let app = build_test_app(pool.clone());
    seed_scenario(&pool, &app).await;

    let json = expect_json(
        get(
            app,
            "/api/v1/reports/availability?from_date=2025-06-10&to_date=2025-06-14",
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let days: Vec<(String, i64, i64)> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| {
            (
                d["date"].as_str().unwrap().to_string(),
                d["booked_rooms"].as_i64().unwrap(),
                d["available_rooms"].as_i64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        days,
        vec![
            ("2025-06-10".to_string(), 1, 2),
            ("2025-06-11".to_string(), 2, 1),
            ("2025-06-12".to_string(), 2, 1),
            ("2025-06-13".to_string(), 1, 2),
            ("2025-06-14".to_string(), 0, 3),
        ]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overstaying_guest_holds_room_until_today(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let seed = seed_reference(&pool).await;
    let room = seed_room(&pool, &seed, "101").await;

    let booking = create_booking(&app, &seed, room, "2025-06-10", "2025-06-11").await;
    let occupant = register_occupant(&app, booking, "123456789012", json!({})).await;
    let occupant_id = occupant["data"]["id"].as_i64().unwrap();
    put_json(
        app.clone(),
        &format!("/api/v1/bookings/occupants/{occupant_id}/status"),
        json!({ "is_checked_in": true, "is_checked_out": false }),
    )
    .await;
    put_json(
        app,
        &format!("/api/v1/bookings/{booking}/status"),
        json!({ "status": "CheckedIn" }),
    )
    .await;

    let later = NaiveDate::from_ymd_opt(2025, 6, 13)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let app = build_test_app_at(pool, later);

    let json = expect_json(
        get(
            app.clone(),
            "/api/v1/reports/availability?from_date=2025-06-12&to_date=2025-06-14",
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let booked: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["booked_rooms"].as_i64().unwrap())
        .collect();
    assert_eq!(booked, vec![1, 1, 0]);

    let json = expect_json(
        get(app, "/api/v1/reports/availability/details?status=Booked").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"][0]["booking_id"], booking);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_details_filter_by_status(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let scenario = seed_scenario(&pool, &app).await;

    let json = expect_json(
        get(
            app.clone(),
            "/api/v1/reports/availability/details?date=2025-06-11&status=Booked",
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["room_number"], "101");
    assert_eq!(rows[0]["booking_id"], scenario.checked_in);
    assert_eq!(rows[0]["occupant_name"], "Asha Rao");
    assert_eq!(rows[0]["room_type_name"], "Double");
    assert_eq!(rows[1]["booking_id"], scenario.upcoming);
    assert_eq!(rows[1]["occupant_name"], "Meera Iyer");

    let json = expect_json(
        get(
            app.clone(),
            "/api/v1/reports/availability/details?date=2025-06-11&status=Available",
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["room_number"], "103");
    assert_eq!(rows[0]["status"], "Available");
    assert!(rows[0]["booking_id"].is_null());

    let response = get(app, "/api/v1/reports/availability/details?status=Free").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn report_ranges_are_validated(pool: PgPool) {
    let app = build_test_app(pool);

    for uri in [
        "/api/v1/reports/availability?from_date=2025-06-12&to_date=2025-06-10",
        "/api/v1/reports/meals?from_date=2025-06-12&to_date=2025-06-10",
        "/api/v1/reports/availability?from_date=2025-01-01&to_date=2026-06-01",
    ] {
        let response = get(app.clone(), uri).await;
        let json = expect_json(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(json["code"], "VALIDATION_ERROR", "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn meal_report_counts_entitlements_per_day(pool: PgPool) {
    let app = build_test_app(pool.clone());
    seed_scenario(&pool, &app).await;

    let json = expect_json(
        get(
            app,
            "/api/v1/reports/meals?from_date=2025-06-09&to_date=2025-06-14",
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let days = json["data"].as_array().unwrap();

    // Days without meals are left out; the cancelled booking never counts.
    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2025-06-10", "2025-06-11", "2025-06-12", "2025-06-13"]);
    assert_eq!(tally(&days[0]), (1, 1, 1, 3));
    assert_eq!(tally(&days[1]), (2, 1, 1, 4));
    assert_eq!(tally(&days[2]), (2, 1, 1, 4));
    assert_eq!(tally(&days[3]), (1, 0, 0, 1));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn meal_details_list_each_occupant(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let scenario = seed_scenario(&pool, &app).await;

    let json = expect_json(
        get(app, "/api/v1/reports/meals/details?date=2025-06-11").await,
        StatusCode::OK,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let guest = rows
        .iter()
        .find(|r| r["booking_id"] == scenario.upcoming)
        .unwrap();
    assert_eq!(guest["full_name"], "Meera Iyer");
    assert_eq!(guest["has_breakfast"], true);
    assert_eq!(guest["has_lunch"], false);
    assert_eq!(guest["room_number"], "102");
    assert_eq!(guest["building_name"], "Main");
    assert!(rows.iter().all(|r| r["booking_id"] != scenario.cancelled));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn meals_dashboard_classifies_day_records(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let scenario = seed_scenario(&pool, &app).await;

    // The upcoming guest's first breakfast becomes on request.
    let json = expect_json(
        get(
            app.clone(),
            &format!("/api/v1/bookings/{}/occupants", scenario.upcoming),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let occupant = &json["data"][0];
    let occupant_id = occupant["id"].as_i64().unwrap();
    let first_day = occupant["daily_meals"][0]["id"].as_i64().unwrap();
    let response = put_json(
        app.clone(),
        &format!("/api/v1/bookings/occupants/{occupant_id}/meals"),
        json!([{ "id": first_day, "has_breakfast": true, "is_breakfast_on_request": true }]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = expect_json(
        get(app.clone(), "/api/v1/reports/meals/dashboard").await,
        StatusCode::OK,
    )
    .await;
    let dashboard = &json["data"];
    assert_eq!(dashboard["date"], "2025-06-10");
    assert_eq!(tally(&dashboard["planned"]), (1, 1, 1, 3));
    assert_eq!(tally(&dashboard["actual"]), (1, 1, 1, 3));
    assert_eq!(tally(&dashboard["on_request"]), (0, 0, 0, 0));
    assert_eq!(tally(&dashboard["cancelled"]), (1, 1, 1, 3));

    let json = expect_json(
        get(app, "/api/v1/reports/meals/dashboard?date=2025-06-11").await,
        StatusCode::OK,
    )
    .await;
    let dashboard = &json["data"];
    assert_eq!(tally(&dashboard["on_request"]), (1, 0, 0, 1));
    assert_eq!(tally(&dashboard["planned"]), (1, 1, 1, 3));
    assert_eq!(tally(&dashboard["actual"]), (1, 1, 1, 3));
    assert_eq!(tally(&dashboard["cancelled"]), (1, 1, 1, 3));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn meals_dashboard_counts_records_outside_the_stay(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let seed = seed_reference(&pool).await;
    let room_a = seed_room(&pool, &seed, "101").await;
    let room_b = seed_room(&pool, &seed, "102").await;

    // A stay shortened after registration keeps its later meal records.
    let shortened = create_booking(&app, &seed, room_a, "2025-06-10", "2025-06-14").await;
    register_occupant(&app, shortened, "123456789012", json!({ "has_breakfast": true })).await;
    let response = put_json(
        app.clone(),
        &format!("/api/v1/bookings/{shortened}"),
        json!({ "room_id": room_a, "check_in_date": "2025-06-10", "check_out_date": "2025-06-12" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = expect_json(
        get(app.clone(), "/api/v1/reports/meals/dashboard?date=2025-06-14").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(tally(&json["data"]["planned"]), (1, 0, 0, 1));

    // Explicit meal days may fall outside the stay.
    let booking = create_booking(&app, &seed, room_b, "2025-06-10", "2025-06-12").await;
    register_occupant(
        &app,
        booking,
        "210987654321",
        json!({
            "daily_meals": [
                { "meal_date": "2025-06-20", "has_lunch": true, "is_lunch_on_request": true }
            ]
        }),
    )
    .await;

    let json = expect_json(
        get(app, "/api/v1/reports/meals/dashboard?date=2025-06-20").await,
        StatusCode::OK,
    )
    .await;
    let dashboard = &json["data"];
    assert_eq!(tally(&dashboard["on_request"]), (0, 1, 0, 1));
    assert_eq!(tally(&dashboard["planned"]), (0, 0, 0, 0));
    assert_eq!(tally(&dashboard["actual"]), (0, 0, 0, 0));
}
