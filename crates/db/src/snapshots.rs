//! Assembles [`BookingSnapshot`]s, the input of the availability and
//! reporting engines, from booking, occupant and meal rows.

use std::collections::HashMap;

use sqlx::PgPool;
use staybook_core::booking::BookingSnapshot;
use staybook_core::meal::MealDay;
use staybook_core::types::DbId;

use crate::models::booking::Booking;
use crate::models::daily_meal::DailyMeal;
use crate::models::occupant::Occupant;
use crate::repositories::{BookingRepo, DailyMealRepo, OccupantRepo};
use crate::PgTx;

/// Join rows into snapshots, preserving the order of `bookings`.
///
/// Fails with a decode error if a stored status is not recognised.
pub fn assemble(
    bookings: &[Booking],
    occupants: Vec<Occupant>,
    days: Vec<DailyMeal>,
) -> Result<Vec<BookingSnapshot>, sqlx::Error> {
    let mut days_by_occupant: HashMap<DbId, Vec<MealDay>> = HashMap::new();
    for day in &days {
        days_by_occupant
            .entry(day.booking_occupant_id)
            .or_default()
            .push(day.meal_day());
    }

    let mut occupants_by_booking: HashMap<DbId, Vec<_>> = HashMap::new();
    for occupant in occupants {
        let days = days_by_occupant.remove(&occupant.id).unwrap_or_default();
        occupants_by_booking
            .entry(occupant.booking_id)
            .or_default()
            .push(occupant.snapshot(days));
    }

    bookings
        .iter()
        .map(|booking| {
            let status = booking
                .status()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            Ok(BookingSnapshot {
                id: booking.id,
                room_id: booking.room_id,
                user_id: booking.user_id,
                status,
                stay: booking.stay(),
                occupants: occupants_by_booking.remove(&booking.id).unwrap_or_default(),
            })
        })
        .collect()
}

/// Load occupants and meal days for `bookings`.
pub async fn load(pool: &PgPool, bookings: &[Booking]) -> Result<Vec<BookingSnapshot>, sqlx::Error> {
    if bookings.is_empty() {
        return Ok(Vec::new());
    }
    let booking_ids: Vec<DbId> = bookings.iter().map(|b| b.id).collect();
    let occupants = OccupantRepo::list_by_bookings(pool, &booking_ids).await?;
    let occupant_ids: Vec<DbId> = occupants.iter().map(|o| o.id).collect();
    let days = DailyMealRepo::list_by_occupants(pool, &occupant_ids).await?;
    assemble(bookings, occupants, days)
}

/// Every booking of a room with its occupants, read inside the reservation
/// transaction. Meal days are not needed for availability and are skipped.
pub async fn load_room_tx(
    tx: &mut PgTx<'_>,
    room_id: DbId,
) -> Result<Vec<BookingSnapshot>, sqlx::Error> {
    let bookings = BookingRepo::list_for_room(tx, room_id).await?;
    if bookings.is_empty() {
        return Ok(Vec::new());
    }
    let booking_ids: Vec<DbId> = bookings.iter().map(|b| b.id).collect();
    let occupants = OccupantRepo::list_by_bookings_tx(tx, &booking_ids).await?;
    assemble(&bookings, occupants, Vec::new())
}

/// Bookings touching `[from, to]` (plus possible overstays) with occupants
/// and meal days.
pub async fn load_for_report(
    pool: &PgPool,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<Vec<BookingSnapshot>, sqlx::Error> {
    let bookings = BookingRepo::list_for_report(pool, from, to).await?;
    load(pool, &bookings).await
}

/// Bookings owning a meal record dated `date`, with occupants and all of
/// their meal days. Records left outside a shortened or explicit stay are
/// included.
pub async fn load_for_meal_date(
    pool: &PgPool,
    date: chrono::NaiveDate,
) -> Result<Vec<BookingSnapshot>, sqlx::Error> {
    let bookings = BookingRepo::list_with_meals_on(pool, date).await?;
    load(pool, &bookings).await
}
