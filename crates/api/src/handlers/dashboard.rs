//! Handlers for the daily dashboard.

use axum::extract::{Path, Query, State};
use axum::Json;
use staybook_core::booking::BookingSnapshot;
use staybook_core::report::{dashboard_stats, DashboardStats};
use staybook_core::types::DbId;
use staybook_db::repositories::RoomRepo;
use staybook_db::snapshots;

use crate::error::AppResult;
use crate::query::DateParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let date = params.or_today(state.clock.as_ref());
    let total_rooms = RoomRepo::count(&state.pool).await?;
    let bookings = snapshots::load_for_report(&state.pool, date, date).await?;
    let stats = dashboard_stats(total_rooms, &bookings, &bookings, date);
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/user-stats/{user_id}
///
/// Room figures stay property-wide; booking, occupant and meal figures are
/// limited to the user's bookings.
pub async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let date = params.or_today(state.clock.as_ref());
    let total_rooms = RoomRepo::count(&state.pool).await?;
    let bookings = snapshots::load_for_report(&state.pool, date, date).await?;
    let scoped: Vec<BookingSnapshot> = bookings
        .iter()
        .filter(|b| b.user_id == user_id)
        .cloned()
        .collect();
    let stats = dashboard_stats(total_rooms, &bookings, &scoped, date);
    Ok(Json(DataResponse { data: stats }))
}
