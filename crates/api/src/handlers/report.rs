//! Handlers for `/reports`: occupancy and meal reports over a day or range.

use axum::extract::{Query, State};
use axum::Json;
use staybook_core::report::{
    availability_by_day, availability_details, meal_details, meal_report, meals_dashboard,
    validate_report_range, AvailabilityDay, MealDetailRow, MealReportDay, MealsDashboard,
    RoomAvailabilityRow, RoomInfo, RoomOccupancy,
};
use staybook_db::models::room::RoomListing;
use staybook_db::repositories::RoomRepo;
use staybook_db::{snapshots, DbPool};

use crate::error::AppResult;
use crate::query::{AvailabilityDetailParams, DateParams, DateRangeParams};
use crate::response::DataResponse;
use crate::state::AppState;

async fn room_infos(pool: &DbPool) -> AppResult<Vec<RoomInfo>> {
    let rooms = RoomRepo::list(pool).await?;
    Ok(rooms.iter().map(RoomListing::info).collect())
}

/// GET /api/v1/reports/availability?from_date=&to_date=
pub async fn availability(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<AvailabilityDay>>>> {
    validate_report_range(range.from_date, range.to_date)?;
    let total_rooms = RoomRepo::count(&state.pool).await?;
    let bookings = snapshots::load_for_report(&state.pool, range.from_date, range.to_date).await?;
    let days = availability_by_day(
        total_rooms,
        &bookings,
        range.from_date,
        range.to_date,
        state.clock.today(),
    )?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/reports/availability/details?date=&status=
pub async fn availability_detail(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityDetailParams>,
) -> AppResult<Json<DataResponse<Vec<RoomAvailabilityRow>>>> {
    let filter = params
        .status
        .as_deref()
        .map(RoomOccupancy::from_str_value)
        .transpose()?;
    let today = state.clock.today();
    let date = params.date.unwrap_or(today);

    let rooms = room_infos(&state.pool).await?;
    let bookings = snapshots::load_for_report(&state.pool, date, date).await?;
    let rows = availability_details(&rooms, &bookings, date, today, filter);
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/reports/meals?from_date=&to_date=
pub async fn meals(
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<MealReportDay>>>> {
    validate_report_range(range.from_date, range.to_date)?;
    let bookings = snapshots::load_for_report(&state.pool, range.from_date, range.to_date).await?;
    let days = meal_report(&bookings, range.from_date, range.to_date)?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/reports/meals/details?date=
pub async fn meal_detail(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<Vec<MealDetailRow>>>> {
    let date = params.or_today(state.clock.as_ref());
    let rooms = room_infos(&state.pool).await?;
    let bookings = snapshots::load_for_report(&state.pool, date, date).await?;
    Ok(Json(DataResponse {
        data: meal_details(&rooms, &bookings, date),
    }))
}

/// GET /api/v1/reports/meals/dashboard?date=
///
/// Classifies every meal record dated `date`, including records of stays
/// that no longer cover that day.
pub async fn meal_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<MealsDashboard>>> {
    let date = params.or_today(state.clock.as_ref());
    let bookings = snapshots::load_for_meal_date(&state.pool, date).await?;
    Ok(Json(DataResponse {
        data: meals_dashboard(&bookings, date),
    }))
}
