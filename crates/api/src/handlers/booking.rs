//! Handlers for the `/bookings` resource.
//!
//! Create and update run the availability check and the write in one
//! transaction holding the room's advisory lock, so two overlapping requests
//! for the same room cannot both succeed.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use staybook_core::availability::find_conflict;
use staybook_core::booking::{plan_status_change, validate_new_stay, validate_stay_change, StayWindow};
use staybook_core::error::CoreError;
use staybook_core::report::{filter_bookings, BookingListFilter, RoomInfo};
use staybook_core::types::DbId;
use staybook_db::models::booking::{
    Booking, BookingListItem, CreateBooking, UpdateBooking, UpdateBookingStatus,
};
use staybook_db::models::occupant::OccupantView;
use staybook_db::repositories::{BookingRepo, OccupantRepo};
use staybook_db::{snapshots, PgTx};

use crate::error::{AppError, AppResult};
use crate::handlers::occupant::load_views;
use crate::query::BookingListParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Booking",
        id,
    })
}

/// Lock `room_id` and fail with a conflict if an active booking other than
/// `exclude` overlaps `stay`.
async fn reserve_room(
    tx: &mut PgTx<'_>,
    room_id: DbId,
    stay: &StayWindow,
    exclude: Option<DbId>,
) -> AppResult<()> {
    BookingRepo::lock_room(tx, room_id).await?;
    let existing = snapshots::load_room_tx(tx, room_id).await?;
    if let Some(conflict) = find_conflict(&existing, room_id, stay, exclude) {
        tracing::warn!(
            room_id,
            conflicting_booking_id = conflict.id,
            check_in = %stay.check_in,
            check_out = %stay.check_out,
            "Room not available for requested stay"
        );
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Room {room_id} is not available for the selected dates"
        ))));
    }
    Ok(())
}

/// GET /api/v1/bookings
///
/// Optional `filter` (`today_check_ins`, `today_check_outs`, `pending`,
/// `cancelled`, `booked`), `date` (defaults to today), free-text `search`
/// and `user_id`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<DataResponse<Vec<BookingListItem>>>> {
    let filter = match params.filter.as_deref() {
        Some(value) => BookingListFilter::from_str_value(value)?,
        None => BookingListFilter::All,
    };
    let date = params.date.unwrap_or_else(|| state.clock.today());
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut items = BookingRepo::list_with_rooms(&state.pool).await?;
    if let Some(user_id) = params.user_id {
        items.retain(|item| item.booking.user_id == user_id);
    }
    if filter == BookingListFilter::All && search.is_none() {
        return Ok(Json(DataResponse { data: items }));
    }

    let bookings: Vec<Booking> = items.iter().map(|item| item.booking.clone()).collect();
    let loaded = snapshots::load(&state.pool, &bookings).await?;
    let rooms: Vec<RoomInfo> = items
        .iter()
        .map(|item| RoomInfo {
            id: item.booking.room_id,
            room_number: item.room_number.clone(),
            building_name: item.building_name.clone(),
            room_type_name: None,
        })
        .collect();
    let keep: HashSet<DbId> = filter_bookings(&loaded, &rooms, filter, date, search)
        .into_iter()
        .map(|b| b.id)
        .collect();
    items.retain(|item| keep.contains(&item.booking.id));

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/bookings
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<Created<Booking>> {
    let stay = input.stay();
    validate_new_stay(&stay, state.clock.local_now())?;

    let mut tx = state.pool.begin().await?;
    reserve_room(&mut tx, input.room_id, &stay, None).await?;
    let booking = BookingRepo::create(&mut tx, &input).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        room_id = booking.room_id,
        user_id = booking.user_id,
        "Booking created"
    );
    Ok(created(booking))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/bookings/{id}
///
/// Replaces room, client kind and stay. The booking itself is ignored when
/// checking availability.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBooking>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let mut tx = state.pool.begin().await?;
    let existing = BookingRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let stay = input.stay();
    validate_stay_change(&existing.stay(), &stay, state.clock.local_now())?;
    reserve_room(&mut tx, input.room_id, &stay, Some(id)).await?;

    let booking = BookingRepo::update(&mut tx, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!(booking_id = id, room_id = booking.room_id, "Booking updated");
    Ok(Json(DataResponse { data: booking }))
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if BookingRepo::delete(&state.pool, id).await? {
        tracing::info!(booking_id = id, "Booking deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/v1/bookings/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBookingStatus>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let mut tx = state.pool.begin().await?;
    let existing = BookingRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let change = plan_status_change(existing.status()?, input.status, input.remarks)?;
    if !change.changed {
        return Ok(Json(DataResponse { data: existing }));
    }

    let booking = BookingRepo::update_status(
        &mut tx,
        id,
        change.status,
        change.cancellation_remarks.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!(
        booking_id = id,
        from = %existing.status,
        to = %change.status,
        "Booking status changed"
    );
    Ok(Json(DataResponse { data: booking }))
}

/// GET /api/v1/bookings/user/{user_id}
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}/occupants
pub async fn list_occupants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OccupantView>>>> {
    BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let occupants = OccupantRepo::list_by_booking(&state.pool, id).await?;
    let views = load_views(&state.pool, occupants).await?;
    Ok(Json(DataResponse { data: views }))
}
