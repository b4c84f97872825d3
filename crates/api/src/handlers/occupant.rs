//! Handlers for `/bookings/occupants`: registration, check-in/out and meal
//! plan edits.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use staybook_core::error::CoreError;
use staybook_core::identity::{document_hash, last4, mask};
use staybook_core::meal::MealDay;
use staybook_core::occupant::{
    apply_meal_edits, apply_status_request, cancel_meals_on_checkout, plan_registration,
    validate_registration, MealEdit, OccupantRegistration, StatusRequest,
};
use staybook_core::types::DbId;
use staybook_db::models::daily_meal::DailyMeal;
use staybook_db::models::occupant::{CreateOccupant, Occupant, OccupantView};
use staybook_db::repositories::{BookingRepo, DailyMealRepo, OccupantRepo};
use staybook_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Occupant",
        id,
    })
}

/// Attach meal days to occupants for display, keeping occupant order.
pub(crate) async fn load_views(pool: &DbPool, occupants: Vec<Occupant>) -> AppResult<Vec<OccupantView>> {
    let ids: Vec<DbId> = occupants.iter().map(|o| o.id).collect();
    let mut days_by_occupant: HashMap<DbId, Vec<DailyMeal>> = HashMap::new();
    if !ids.is_empty() {
        for day in DailyMealRepo::list_by_occupants(pool, &ids).await? {
            days_by_occupant
                .entry(day.booking_occupant_id)
                .or_default()
                .push(day);
        }
    }
    Ok(occupants
        .into_iter()
        .map(|o| {
            let days = days_by_occupant.remove(&o.id).unwrap_or_default();
            OccupantView::new(o, days)
        })
        .collect())
}

/// GET /api/v1/bookings/occupants
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<OccupantView>>>> {
    let occupants = OccupantRepo::list(&state.pool).await?;
    let views = load_views(&state.pool, occupants).await?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/bookings/occupants
///
/// The identity document must not belong to any other occupant in the
/// system. Without explicit daily meals, one day per stay date is generated
/// from the flat meal flags.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<OccupantRegistration>,
) -> AppResult<Created<OccupantView>> {
    validate_registration(&input)?;

    let booking = BookingRepo::find_by_id(&state.pool, input.booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: input.booking_id,
        }))?;
    let plan = plan_registration(&input, &booking.stay())?;

    let hash = document_hash(&input.identity_document);
    if OccupantRepo::document_hash_exists(&state.pool, &hash).await? {
        tracing::warn!(
            booking_id = booking.id,
            "Rejected occupant with an identity document already on file"
        );
        return Err(AppError::Core(CoreError::Conflict(
            "An occupant with this identity document is already registered".to_string(),
        )));
    }

    let create = CreateOccupant {
        booking_id: booking.id,
        full_name: input.full_name.trim().to_string(),
        phone_number: input.phone_number.clone(),
        document_encrypted: state.vault.encrypt(&input.identity_document)?,
        document_hash: hash,
        document_last4: last4(&input.identity_document),
        meals: plan.summary,
    };

    let mut tx = state.pool.begin().await?;
    let occupant = OccupantRepo::create(&mut tx, &create).await?;
    let days = DailyMealRepo::create_many(&mut tx, occupant.id, &plan.days).await?;
    tx.commit().await?;

    tracing::info!(
        occupant_id = occupant.id,
        booking_id = booking.id,
        meal_days = days.len(),
        "Occupant registered"
    );
    Ok(created(OccupantView::new(occupant, days)))
}

/// GET /api/v1/bookings/occupants/{id}
///
/// The identity document is decrypted from storage and masked, so a row
/// whose ciphertext no longer opens with the configured key fails here
/// instead of silently showing its last four digits.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OccupantView>>> {
    let occupant = OccupantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let envelope = OccupantRepo::find_document(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let document = state.vault.decrypt(&envelope)?;

    let mut views = load_views(&state.pool, vec![occupant]).await?;
    let mut view = views.pop().ok_or_else(|| not_found(id))?;
    view.identity_document = mask(&document);
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/bookings/occupants/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if OccupantRepo::delete(&state.pool, id).await? {
        tracing::info!(occupant_id = id, "Occupant removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/v1/bookings/occupants/{id}/status
///
/// On the first check-out, meals the occupant will no longer take are
/// cancelled in the same transaction.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<OccupantView>>> {
    let mut tx = state.pool.begin().await?;
    let occupant = OccupantRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let change = apply_status_request(&occupant.presence(), input, state.clock.now())?;
    let updated = OccupantRepo::update_presence(&mut tx, id, &change.presence)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut rows = DailyMealRepo::list_by_occupant_for_update(&mut tx, id).await?;
    if change.checked_out_now {
        let local_now = state.clock.local_now();
        let mut days: Vec<MealDay> = rows.iter().map(DailyMeal::meal_day).collect();
        let changed = cancel_meals_on_checkout(&mut days, local_now);
        for day in days.iter().filter(|d| changed.contains(&d.id)) {
            let row = DailyMealRepo::update_flags(&mut tx, day.id, &day.plan)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "DailyMeal",
                    id: day.id,
                }))?;
            if let Some(slot) = rows.iter_mut().find(|r| r.id == row.id) {
                *slot = row;
            }
        }
        tracing::info!(
            occupant_id = id,
            cancelled_days = changed.len(),
            %local_now,
            "Occupant checked out, remaining meals cancelled"
        );
    } else if change.presence.is_checked_in && !occupant.is_checked_in {
        tracing::info!(occupant_id = id, "Occupant checked in");
    }
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: OccupantView::new(updated, rows),
    }))
}

/// PUT /api/v1/bookings/occupants/{id}/meals
///
/// Body is an array of day edits; each overwrites all nine flags of the
/// addressed day. Days of other occupants are ignored.
pub async fn update_meals(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(edits): Json<Vec<MealEdit>>,
) -> AppResult<Json<DataResponse<OccupantView>>> {
    let mut tx = state.pool.begin().await?;
    OccupantRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut rows = DailyMealRepo::list_by_occupant_for_update(&mut tx, id).await?;
    let mut days: Vec<MealDay> = rows.iter().map(DailyMeal::meal_day).collect();
    let (applied, summary) = apply_meal_edits(&mut days, &edits);

    for day in days.iter().filter(|d| applied.contains(&d.id)) {
        let row = DailyMealRepo::update_flags(&mut tx, day.id, &day.plan)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "DailyMeal",
                id: day.id,
            }))?;
        if let Some(slot) = rows.iter_mut().find(|r| r.id == row.id) {
            *slot = row;
        }
    }
    let updated = OccupantRepo::update_meal_summary(&mut tx, id, summary)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!(
        occupant_id = id,
        requested = edits.len(),
        edited_days = applied.len(),
        "Meal plan updated"
    );
    Ok(Json(DataResponse {
        data: OccupantView::new(updated, rows),
    }))
}
