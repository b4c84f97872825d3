//! Room availability.
//!
//! Three rules live here, each used by a different caller:
//!
//! - [`is_room_available`] is authoritative and runs when a booking is
//!   created or edited.
//! - [`rooms_excluded_by_dates`] is the coarse pre-filter behind the
//!   available-rooms listing.
//! - [`is_blocked_for_search`] is the strict rule behind the interactive
//!   room search, which also treats physically present guests as blocking.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::booking::{BookingSnapshot, BookingStatus, StayWindow};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Overlap tests
// ---------------------------------------------------------------------------

/// Three-way overlap between an existing range and a requested one.
///
/// The existing range covers the requested start, covers the requested end,
/// or lies inside the requested range. Touching ranges (one ends where the
/// other begins) do not overlap.
pub fn three_way_overlap<T: PartialOrd>(
    existing_start: T,
    existing_end: T,
    requested_start: T,
    requested_end: T,
) -> bool {
    (existing_start <= requested_start && existing_end > requested_start)
        || (existing_start < requested_end && existing_end >= requested_end)
        || (existing_start >= requested_start && existing_end <= requested_end)
}

/// Whether two stays collide. Precise timestamps govern when both stays
/// carry them; otherwise dates are compared.
pub fn stays_overlap(existing: &StayWindow, requested: &StayWindow) -> bool {
    match (existing.precise_bounds(), requested.precise_bounds()) {
        (Some((es, ee)), Some((rs, re))) => es < re && ee > rs,
        _ => three_way_overlap(
            existing.check_in,
            existing.check_out,
            requested.check_in,
            requested.check_out,
        ),
    }
}

// ---------------------------------------------------------------------------
// Authoritative check
// ---------------------------------------------------------------------------

/// A colliding booking stops blocking once every occupant has checked out.
/// A booking with no occupants yet still holds the room.
pub fn is_active_conflict(booking: &BookingSnapshot) -> bool {
    !booking.all_occupants_checked_out()
}

/// First booking that keeps `room_id` from being reserved for `requested`.
pub fn find_conflict<'a>(
    bookings: &'a [BookingSnapshot],
    room_id: DbId,
    requested: &StayWindow,
    exclude_booking_id: Option<DbId>,
) -> Option<&'a BookingSnapshot> {
    bookings.iter().find(|b| {
        b.room_id == room_id
            && b.status != BookingStatus::Cancelled
            && Some(b.id) != exclude_booking_id
            && stays_overlap(&b.stay, requested)
            && is_active_conflict(b)
    })
}

/// Whether `room_id` can take a booking for `requested`.
///
/// An unknown room has no bookings and is therefore available. Capacity is
/// not considered.
pub fn is_room_available(
    bookings: &[BookingSnapshot],
    room_id: DbId,
    requested: &StayWindow,
    exclude_booking_id: Option<DbId>,
) -> bool {
    find_conflict(bookings, room_id, requested, exclude_booking_id).is_none()
}

// ---------------------------------------------------------------------------
// Coarse listing filter
// ---------------------------------------------------------------------------

/// Rooms holding any non-cancelled booking that overlaps the dates.
///
/// Unlike [`is_room_available`] this does not release rooms whose occupants
/// have all checked out.
pub fn rooms_excluded_by_dates(
    bookings: &[BookingSnapshot],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> HashSet<DbId> {
    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .filter(|b| three_way_overlap(b.stay.check_in, b.stay.check_out, check_in, check_out))
        .map(|b| b.room_id)
        .collect()
}

// ---------------------------------------------------------------------------
// Interactive search
// ---------------------------------------------------------------------------

/// Selected local interval of an interactive room search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SearchWindow {
    /// Resolve the operator's selection into an interval.
    ///
    /// A multi-day selection defaults to the start of the first day through
    /// the end of the last. A same-day selection needs both times with
    /// `from < to`.
    pub fn resolve(
        date: NaiveDate,
        check_out_date: Option<NaiveDate>,
        from_time: Option<NaiveTime>,
        to_time: Option<NaiveTime>,
    ) -> Result<Self, CoreError> {
        match check_out_date {
            Some(out) if out < date => Err(CoreError::Validation(
                "Check-out date cannot be before the selected date".to_string(),
            )),
            Some(out) if out > date => {
                let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
                    .ok_or_else(|| CoreError::Internal("invalid end-of-day time".to_string()))?;
                Ok(Self {
                    start: date.and_time(from_time.unwrap_or(NaiveTime::MIN)),
                    end: out.and_time(to_time.unwrap_or(end_of_day)),
                })
            }
            _ => {
                let (Some(from), Some(to)) = (from_time, to_time) else {
                    return Err(CoreError::Validation(
                        "From and to times are required for a same-day search".to_string(),
                    ));
                };
                if from >= to {
                    return Err(CoreError::Validation(
                        "From time must be before to time".to_string(),
                    ));
                }
                Ok(Self {
                    start: date.and_time(from),
                    end: date.and_time(to),
                })
            }
        }
    }
}

/// Strict blocking rule of the interactive search.
///
/// A checked-in booking with a guest still present blocks regardless of
/// dates; any other non-cancelled booking blocks when its effective interval
/// overlaps the window.
pub fn is_blocked_for_search(booking: &BookingSnapshot, window: &SearchWindow) -> bool {
    if booking.is_cancelled() {
        return false;
    }
    if booking.status == BookingStatus::CheckedIn && booking.has_occupant_not_checked_out() {
        return true;
    }
    let (start, end) = booking.stay.effective_interval();
    start < window.end && end > window.start
}

/// Rooms from `room_ids` not blocked by any booking in the window.
pub fn rooms_free_for_window(
    room_ids: &[DbId],
    bookings: &[BookingSnapshot],
    window: &SearchWindow,
) -> Vec<DbId> {
    let blocked: HashSet<DbId> = bookings
        .iter()
        .filter(|b| is_blocked_for_search(b, window))
        .map(|b| b.room_id)
        .collect();
    room_ids
        .iter()
        .copied()
        .filter(|id| !blocked.contains(id))
        .collect()
}
