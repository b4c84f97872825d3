//! Handlers for room availability searches.

use axum::extract::{Query, State};
use axum::Json;
use staybook_core::availability::{rooms_excluded_by_dates, rooms_free_for_window, SearchWindow};
use staybook_core::error::CoreError;
use staybook_core::types::DbId;
use staybook_db::models::room::RoomListing;
use staybook_db::repositories::{BookingRepo, RoomRepo};
use staybook_db::snapshots;

use crate::error::{AppError, AppResult};
use crate::query::{AvailableRoomsParams, RoomSearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rooms/available
///
/// Rooms marked available that match the structural filters. When both
/// dates are given, rooms with any non-cancelled overlapping booking are
/// left out, even if its guests have already checked out.
pub async fn available(
    State(state): State<AppState>,
    Query(params): Query<AvailableRoomsParams>,
) -> AppResult<Json<DataResponse<Vec<RoomListing>>>> {
    let mut rooms = RoomRepo::search_available(&state.pool, &params.room_filter()).await?;

    if let (Some(check_in), Some(check_out)) = (params.check_in_date, params.check_out_date) {
        if check_out < check_in {
            return Err(AppError::Core(CoreError::Validation(
                "Check-out date cannot be before check-in date".to_string(),
            )));
        }
        let bookings = BookingRepo::list_active_between(&state.pool, check_in, check_out).await?;
        let bookings = snapshots::assemble(&bookings, Vec::new(), Vec::new())?;
        let excluded = rooms_excluded_by_dates(&bookings, check_in, check_out);
        rooms.retain(|room| !excluded.contains(&room.id));
    }

    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/rooms/search
///
/// Interactive search within one building. A room is free when no booking
/// overlaps the selected window and no checked-in guest is still present.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<RoomSearchParams>,
) -> AppResult<Json<DataResponse<Vec<RoomListing>>>> {
    let window = SearchWindow::resolve(
        params.date,
        params.check_out_date,
        params.from_time,
        params.to_time,
    )?;

    let mut rooms = RoomRepo::list_in_building(&state.pool, params.building_id, params.floor_id).await?;
    if rooms.is_empty() {
        return Ok(Json(DataResponse { data: rooms }));
    }

    let room_ids: Vec<DbId> = rooms.iter().map(|r| r.id).collect();
    let bookings = BookingRepo::list_active_for_rooms(&state.pool, &room_ids).await?;
    let bookings = snapshots::load(&state.pool, &bookings).await?;
    let free = rooms_free_for_window(&room_ids, &bookings, &window);
    rooms.retain(|room| free.contains(&room.id));

    tracing::debug!(
        building_id = params.building_id,
        window_start = %window.start,
        window_end = %window.end,
        free = rooms.len(),
        "Room search resolved"
    );
    Ok(Json(DataResponse { data: rooms }))
}
