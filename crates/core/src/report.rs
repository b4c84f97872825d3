//! Aggregation and reporting over loaded bookings (dashboard, availability,
//! meals, booking lists).
//!
//! Every function takes the bookings relevant to the question, already
//! loaded with occupants and meal days, and the date(s) being asked about.
//! "Today" is passed in explicitly so nothing here reads the wall clock.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::booking::{BookingSnapshot, BookingStatus};
use crate::error::CoreError;
use crate::meal::{inclusive_day_count, stay_dates, MealCounts, MealKind};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest date range a single report may cover.
pub const MAX_REPORT_SPAN_DAYS: i64 = 366;

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

/// Display data of a room, as joined from its building and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub id: DbId,
    pub room_number: String,
    pub building_name: String,
    pub room_type_name: Option<String>,
}

/// Per-meal counts with their sum, as returned to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealTally {
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
    pub total: i64,
}

impl From<MealCounts> for MealTally {
    fn from(c: MealCounts) -> Self {
        Self {
            breakfast: c.breakfast,
            lunch: c.lunch,
            dinner: c.dinner,
            total: c.total(),
        }
    }
}

pub fn validate_report_range(from: NaiveDate, to: NaiveDate) -> Result<(), CoreError> {
    if to < from {
        return Err(CoreError::Validation(
            "Report end date cannot be before start date".to_string(),
        ));
    }
    if inclusive_day_count(from, to) > MAX_REPORT_SPAN_DAYS {
        return Err(CoreError::Validation(format!(
            "Report range cannot exceed {MAX_REPORT_SPAN_DAYS} days"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Meal counting
// ---------------------------------------------------------------------------

/// Meals expected on `date` across non-cancelled bookings spanning it.
///
/// Each occupant contributes that day's entitlements when a day record
/// exists, else the occupant's flat flags. Cancellation flags are ignored.
pub fn count_meals_on(bookings: &[BookingSnapshot], date: NaiveDate) -> MealCounts {
    count_meals_where(bookings, date, |b| !b.is_cancelled())
}

fn count_meals_where(
    bookings: &[BookingSnapshot],
    date: NaiveDate,
    include: impl Fn(&BookingSnapshot) -> bool,
) -> MealCounts {
    let mut counts = MealCounts::default();
    for booking in bookings.iter().filter(|b| include(b) && b.stay.spans(date)) {
        for occupant in &booking.occupants {
            counts.add(occupant.entitlements_on(date));
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub booked_rooms: i64,
    pub available_rooms: i64,
    pub today_check_ins: i64,
    pub today_check_outs: i64,
    pub pending_bookings: i64,
    pub cancelled_bookings: i64,
    pub total_occupants: i64,
    pub occupants_checked_in: i64,
    pub meals: MealTally,
}

/// Daily dashboard figures.
///
/// Room figures always come from `all_bookings`; everything else from
/// `scoped`, which is either the same slice or one user's bookings.
pub fn dashboard_stats(
    total_rooms: i64,
    all_bookings: &[BookingSnapshot],
    scoped: &[BookingSnapshot],
    date: NaiveDate,
) -> DashboardStats {
    let booked_rooms = all_bookings
        .iter()
        .filter(|b| b.status.is_occupying() && b.stay.spans(date))
        .map(|b| b.room_id)
        .collect::<HashSet<_>>()
        .len() as i64;

    let count = |filter: BookingListFilter| -> i64 {
        scoped.iter().filter(|b| filter.matches(b, date)).count() as i64
    };

    let in_house: Vec<_> = scoped
        .iter()
        .filter(|b| !b.is_cancelled() && b.stay.spans(date))
        .flat_map(|b| b.occupants.iter())
        .collect();
    let total_occupants = in_house.len() as i64;
    let occupants_checked_in = in_house.iter().filter(|o| o.is_checked_in).count() as i64;

    DashboardStats {
        date,
        total_rooms,
        booked_rooms,
        available_rooms: total_rooms - booked_rooms,
        today_check_ins: count(BookingListFilter::TodayCheckIns),
        today_check_outs: count(BookingListFilter::TodayCheckOuts),
        pending_bookings: count(BookingListFilter::Pending),
        cancelled_bookings: count(BookingListFilter::Cancelled),
        total_occupants,
        occupants_checked_in,
        meals: count_meals_on(scoped, date).into(),
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Whether a booking occupies its room on `date`.
///
/// A checked-in booking whose check-out date has passed keeps its room while
/// any occupant is still present, but only up to `today`.
pub fn is_booked_on(booking: &BookingSnapshot, date: NaiveDate, today: NaiveDate) -> bool {
    match booking.status {
        BookingStatus::Booked => booking.stay.spans(date),
        BookingStatus::CheckedIn => {
            booking.stay.spans(date)
                || (date > booking.stay.check_out
                    && date <= today
                    && booking.has_occupant_not_checked_out())
        }
        BookingStatus::CheckedOut | BookingStatus::Cancelled => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityDay {
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub booked_rooms: i64,
    pub available_rooms: i64,
}

pub fn availability_by_day(
    total_rooms: i64,
    bookings: &[BookingSnapshot],
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<AvailabilityDay>, CoreError> {
    validate_report_range(from, to)?;
    Ok(stay_dates(from, to)
        .map(|date| {
            let booked_rooms = bookings
                .iter()
                .filter(|b| is_booked_on(b, date, today))
                .count() as i64;
            AvailabilityDay {
                date,
                total_rooms,
                booked_rooms,
                available_rooms: total_rooms - booked_rooms,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoomOccupancy {
    Booked,
    Available,
}

impl RoomOccupancy {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "Booked" => Ok(Self::Booked),
            "Available" => Ok(Self::Available),
            _ => Err(CoreError::Validation(format!(
                "Invalid room status filter: '{s}'. Must be one of: Booked, Available"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAvailabilityRow {
    pub room_id: DbId,
    pub room_number: String,
    pub room_type_name: Option<String>,
    pub building_name: String,
    pub status: RoomOccupancy,
    pub booking_id: Option<DbId>,
    pub occupant_name: Option<String>,
}

/// Booked/available state of every room on `date`, optionally filtered.
///
/// A booked room reports the first matching booking and its first occupant.
pub fn availability_details(
    rooms: &[RoomInfo],
    bookings: &[BookingSnapshot],
    date: NaiveDate,
    today: NaiveDate,
    filter: Option<RoomOccupancy>,
) -> Vec<RoomAvailabilityRow> {
    rooms
        .iter()
        .map(|room| {
            let booking = bookings
                .iter()
                .find(|b| b.room_id == room.id && is_booked_on(b, date, today));
            RoomAvailabilityRow {
                room_id: room.id,
                room_number: room.room_number.clone(),
                room_type_name: room.room_type_name.clone(),
                building_name: room.building_name.clone(),
                status: if booking.is_some() {
                    RoomOccupancy::Booked
                } else {
                    RoomOccupancy::Available
                },
                booking_id: booking.map(|b| b.id),
                occupant_name: booking
                    .and_then(|b| b.occupants.first())
                    .map(|o| o.full_name.clone()),
            }
        })
        .filter(|row| filter.map_or(true, |f| f == row.status))
        .collect()
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealReportDay {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub meals: MealTally,
}

/// Meals per day over a range for Booked and CheckedIn bookings. Days with
/// no meals are omitted.
pub fn meal_report(
    bookings: &[BookingSnapshot],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<MealReportDay>, CoreError> {
    validate_report_range(from, to)?;
    Ok(stay_dates(from, to)
        .filter_map(|date| {
            let counts = count_meals_where(bookings, date, |b| b.status.is_occupying());
            (!counts.is_empty()).then(|| MealReportDay {
                date,
                meals: counts.into(),
            })
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealDetailRow {
    pub occupant_id: DbId,
    pub booking_id: DbId,
    pub full_name: String,
    pub phone_number: String,
    pub has_breakfast: bool,
    pub has_lunch: bool,
    pub has_dinner: bool,
    pub room_number: Option<String>,
    pub building_name: Option<String>,
}

/// One row per occupant of a Booked or CheckedIn booking spanning `date`.
pub fn meal_details(
    rooms: &[RoomInfo],
    bookings: &[BookingSnapshot],
    date: NaiveDate,
) -> Vec<MealDetailRow> {
    let rooms_by_id: HashMap<DbId, &RoomInfo> = rooms.iter().map(|r| (r.id, r)).collect();
    bookings
        .iter()
        .filter(|b| b.status.is_occupying() && b.stay.spans(date))
        .flat_map(|b| {
            let room = rooms_by_id.get(&b.room_id).copied();
            b.occupants.iter().map(move |o| {
                let meals = o.entitlements_on(date);
                MealDetailRow {
                    occupant_id: o.id,
                    booking_id: b.id,
                    full_name: o.full_name.clone(),
                    phone_number: o.phone_number.clone(),
                    has_breakfast: meals.breakfast,
                    has_lunch: meals.lunch,
                    has_dinner: meals.dinner,
                    room_number: room.map(|r| r.room_number.clone()),
                    building_name: room.map(|r| r.building_name.clone()),
                }
            })
        })
        .collect()
}

/// Four independent views of the day's meal records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealsDashboard {
    pub date: NaiveDate,
    pub on_request: MealTally,
    pub planned: MealTally,
    pub actual: MealTally,
    pub cancelled: MealTally,
}

/// Classify the day records dated `date`.
///
/// Only explicit day records are considered. Actual overlaps with planned
/// and on-request; cancelled counts every meal of a cancelled booking.
pub fn meals_dashboard(bookings: &[BookingSnapshot], date: NaiveDate) -> MealsDashboard {
    let mut on_request = MealCounts::default();
    let mut planned = MealCounts::default();
    let mut actual = MealCounts::default();
    let mut cancelled = MealCounts::default();

    for booking in bookings {
        let booking_cancelled = booking.is_cancelled();
        for occupant in &booking.occupants {
            let Some(day) = occupant.meal_day(date) else {
                continue;
            };
            for kind in MealKind::ALL {
                let slot = day.plan.slot(kind);
                if booking_cancelled || slot.cancelled {
                    cancelled.bump(kind);
                }
                if booking_cancelled || !slot.entitled {
                    continue;
                }
                if slot.on_request {
                    on_request.bump(kind);
                } else {
                    planned.bump(kind);
                }
                if occupant.is_checked_in {
                    actual.bump(kind);
                }
            }
        }
    }

    MealsDashboard {
        date,
        on_request: on_request.into(),
        planned: planned.into(),
        actual: actual.into(),
        cancelled: cancelled.into(),
    }
}

// ---------------------------------------------------------------------------
// Booking lists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingListFilter {
    All,
    TodayCheckIns,
    TodayCheckOuts,
    Pending,
    Cancelled,
    Booked,
}

impl BookingListFilter {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "all" => Ok(Self::All),
            "today_check_ins" => Ok(Self::TodayCheckIns),
            "today_check_outs" => Ok(Self::TodayCheckOuts),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            "booked" | "reserved" => Ok(Self::Booked),
            _ => Err(CoreError::Validation(format!(
                "Invalid booking filter: '{s}'. Must be one of: all, today_check_ins, \
                 today_check_outs, pending, cancelled, booked"
            ))),
        }
    }

    pub fn matches(self, booking: &BookingSnapshot, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::TodayCheckIns => !booking.is_cancelled() && booking.stay.check_in == date,
            Self::TodayCheckOuts => !booking.is_cancelled() && booking.stay.check_out == date,
            Self::Pending => {
                booking.status == BookingStatus::Booked
                    && booking.stay.check_in == date
                    && !booking.any_occupant_checked_in()
            }
            Self::Cancelled => booking.is_cancelled() && booking.stay.check_in == date,
            Self::Booked => booking.status.is_occupying() && booking.stay.spans(date),
        }
    }
}

/// Case-insensitive match of `term` against the booking id, its room number,
/// building name and occupant names.
pub fn matches_search(booking: &BookingSnapshot, room: Option<&RoomInfo>, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    booking.id.to_string() == term
        || room.is_some_and(|r| {
            r.room_number.to_lowercase().contains(&term)
                || r.building_name.to_lowercase().contains(&term)
        })
        || booking
            .occupants
            .iter()
            .any(|o| o.full_name.to_lowercase().contains(&term))
}

/// Bookings passing a list filter and an optional free-text search, in
/// input order.
pub fn filter_bookings<'a>(
    bookings: &'a [BookingSnapshot],
    rooms: &[RoomInfo],
    filter: BookingListFilter,
    date: NaiveDate,
    search: Option<&str>,
) -> Vec<&'a BookingSnapshot> {
    let rooms_by_id: HashMap<DbId, &RoomInfo> = rooms.iter().map(|r| (r.id, r)).collect();
    bookings
        .iter()
        .filter(|b| filter.matches(b, date))
        .filter(|b| {
            search.map_or(true, |term| {
                matches_search(b, rooms_by_id.get(&b.room_id).copied(), term)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::StayWindow;
    use crate::meal::{generate_plan, MealDay, MealSummary};
    use crate::occupant::OccupantSnapshot;
    use assert_matches::assert_matches;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const FULL_BOARD: MealSummary = MealSummary {
        breakfast: true,
        lunch: true,
        dinner: true,
    };

    fn occupant(id: DbId, name: &str) -> OccupantSnapshot {
        OccupantSnapshot {
            id,
            full_name: name.to_string(),
            phone_number: "+91 9876543210".to_string(),
            is_checked_in: false,
            is_checked_out: false,
            stored_meals: MealSummary::default(),
            days: Vec::new(),
        }
    }

    fn with_days(mut o: OccupantSnapshot, from: &str, to: &str, meals: MealSummary) -> OccupantSnapshot {
        o.days = generate_plan(d(from), d(to), meals)
            .into_iter()
            .enumerate()
            .map(|(i, plan)| MealDay {
                id: o.id * 100 + i as DbId,
                plan,
            })
            .collect();
        o
    }

    fn booking(id: DbId, room_id: DbId, status: BookingStatus, from: &str, to: &str) -> BookingSnapshot {
        BookingSnapshot {
            id,
            room_id,
            user_id: 1,
            status,
            stay: StayWindow::dates(d(from), d(to)),
            occupants: Vec::new(),
        }
    }

    fn rooms() -> Vec<RoomInfo> {
        [(1, "101"), (2, "102"), (3, "201")]
            .into_iter()
            .map(|(id, number)| RoomInfo {
                id,
                room_number: number.to_string(),
                building_name: "Tower A".to_string(),
                room_type_name: Some("Deluxe".to_string()),
            })
            .collect()
    }

    #[test]
    fn report_range_limits() {
        assert!(validate_report_range(d("2025-01-01"), d("2025-12-31")).is_ok());
        assert_matches!(
            validate_report_range(d("2025-01-02"), d("2025-01-01")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_report_range(d("2025-01-01"), d("2026-01-03")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn meal_count_uses_day_record_then_flat_flags() {
        let mut b = booking(1, 1, BookingStatus::Booked, "2025-06-01", "2025-06-03");
        let mut cancelled_lunch = with_days(occupant(1, "A"), "2025-06-02", "2025-06-02", FULL_BOARD);
        cancelled_lunch.days[0].plan.lunch.cancelled = true;
        let mut flat = occupant(2, "B");
        flat.stored_meals = MealSummary {
            breakfast: true,
            lunch: false,
            dinner: false,
        };
        b.occupants = vec![cancelled_lunch, flat];

        let mut gone = booking(2, 2, BookingStatus::Cancelled, "2025-06-01", "2025-06-03");
        gone.occupants = vec![with_days(occupant(3, "C"), "2025-06-01", "2025-06-03", FULL_BOARD)];

        let counts = count_meals_on(&[b, gone], d("2025-06-02"));
        assert_eq!(counts.breakfast, 2);
        assert_eq!(counts.lunch, 1);
        assert_eq!(counts.dinner, 1);
    }

    #[test]
    fn dashboard_counts() {
        let date = d("2025-06-05");
        let mut arriving = booking(1, 1, BookingStatus::Booked, "2025-06-05", "2025-06-07");
        arriving.occupants = vec![with_days(occupant(1, "A"), "2025-06-05", "2025-06-07", FULL_BOARD)];
        let mut arrived = booking(2, 2, BookingStatus::Booked, "2025-06-05", "2025-06-06");
        let mut present = occupant(2, "B");
        present.is_checked_in = true;
        arrived.occupants = vec![present];
        let leaving = booking(3, 2, BookingStatus::CheckedIn, "2025-06-01", "2025-06-05");
        let cancelled = booking(4, 3, BookingStatus::Cancelled, "2025-06-05", "2025-06-08");
        let all = vec![arriving, arrived, leaving, cancelled];

        let stats = dashboard_stats(10, &all, &all, date);
        assert_eq!(stats.booked_rooms, 2);
        assert_eq!(stats.available_rooms, 8);
        assert_eq!(stats.today_check_ins, 2);
        assert_eq!(stats.today_check_outs, 1);
        assert_eq!(stats.pending_bookings, 1);
        assert_eq!(stats.cancelled_bookings, 1);
        assert_eq!(stats.total_occupants, 2);
        assert_eq!(stats.occupants_checked_in, 1);
        assert_eq!(stats.meals.total, 3);
    }

    #[test]
    fn user_dashboard_keeps_system_room_counts() {
        let date = d("2025-06-05");
        let mine = booking(1, 1, BookingStatus::Booked, "2025-06-05", "2025-06-07");
        let mut theirs = booking(2, 2, BookingStatus::Booked, "2025-06-04", "2025-06-06");
        theirs.user_id = 2;
        let all = vec![mine.clone(), theirs];

        let stats = dashboard_stats(5, &all, &[mine], date);
        assert_eq!(stats.booked_rooms, 2);
        assert_eq!(stats.today_check_ins, 1);
    }

    #[test]
    fn overstay_counts_until_today_only() {
        let mut b = booking(1, 1, BookingStatus::CheckedIn, "2025-06-01", "2025-06-03");
        b.occupants = vec![occupant(1, "A")];
        let today = d("2025-06-10");

        assert!(is_booked_on(&b, d("2025-06-10"), today));
        assert!(!is_booked_on(&b, d("2025-06-11"), today));

        let days = availability_by_day(4, &[b], d("2025-06-10"), d("2025-06-11"), today).unwrap();
        assert_eq!(days[0].booked_rooms, 1);
        assert_eq!(days[0].available_rooms, 3);
        assert_eq!(days[1].booked_rooms, 0);
    }

    #[test]
    fn checked_out_guest_ends_overstay() {
        let mut b = booking(1, 1, BookingStatus::CheckedIn, "2025-06-01", "2025-06-03");
        let mut gone = occupant(1, "A");
        gone.is_checked_in = true;
        gone.is_checked_out = true;
        b.occupants = vec![gone];
        assert!(!is_booked_on(&b, d("2025-06-05"), d("2025-06-10")));
        assert!(is_booked_on(&b, d("2025-06-03"), d("2025-06-10")));

        let done = booking(2, 1, BookingStatus::CheckedOut, "2025-06-01", "2025-06-03");
        assert!(!is_booked_on(&done, d("2025-06-02"), d("2025-06-10")));
    }

    #[test]
    fn details_report_first_occupant_and_filter() {
        let mut b = booking(1, 2, BookingStatus::Booked, "2025-06-01", "2025-06-03");
        b.occupants = vec![occupant(1, "First Guest"), occupant(2, "Second Guest")];
        let rooms = rooms();
        let today = d("2025-06-01");

        let rows = availability_details(&rooms, &[b.clone()], d("2025-06-02"), today, None);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].status, RoomOccupancy::Booked);
        assert_eq!(rows[1].occupant_name.as_deref(), Some("First Guest"));
        assert_eq!(rows[0].status, RoomOccupancy::Available);

        let booked = availability_details(
            &rooms,
            &[b.clone()],
            d("2025-06-02"),
            today,
            Some(RoomOccupancy::Booked),
        );
        assert_eq!(booked.len(), 1);
        let available = availability_details(
            &rooms,
            &[b],
            d("2025-06-02"),
            today,
            Some(RoomOccupancy::Available),
        );
        assert_eq!(available.len(), 2);
        assert_matches!(RoomOccupancy::from_str_value("Vacant"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn meal_report_skips_empty_days_and_checked_out_bookings() {
        let mut b = booking(1, 1, BookingStatus::CheckedIn, "2025-06-02", "2025-06-03");
        b.occupants = vec![with_days(occupant(1, "A"), "2025-06-02", "2025-06-03", FULL_BOARD)];
        let mut done = booking(2, 2, BookingStatus::CheckedOut, "2025-06-01", "2025-06-04");
        done.occupants = vec![with_days(occupant(2, "B"), "2025-06-01", "2025-06-04", FULL_BOARD)];

        let report = meal_report(&[b, done], d("2025-06-01"), d("2025-06-04")).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].date, d("2025-06-02"));
        assert_eq!(report[0].meals.total, 3);
    }

    #[test]
    fn meal_details_join_rooms() {
        let mut b = booking(1, 3, BookingStatus::Booked, "2025-06-01", "2025-06-02");
        b.occupants = vec![with_days(
            occupant(1, "A"),
            "2025-06-01",
            "2025-06-02",
            MealSummary {
                breakfast: false,
                lunch: true,
                dinner: false,
            },
        )];
        let rows = meal_details(&rooms(), &[b], d("2025-06-02"));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].has_lunch && !rows[0].has_breakfast);
        assert_eq!(rows[0].room_number.as_deref(), Some("201"));
        assert_eq!(rows[0].building_name.as_deref(), Some("Tower A"));
    }

    #[test]
    fn meals_dashboard_four_way() {
        let date = d("2025-06-02");

        let mut active = booking(1, 1, BookingStatus::CheckedIn, "2025-06-01", "2025-06-03");
        let mut guest = with_days(occupant(1, "A"), "2025-06-02", "2025-06-02", FULL_BOARD);
        guest.is_checked_in = true;
        guest.days[0].plan.dinner.on_request = true;
        guest.days[0].plan.lunch.cancelled = true;
        active.occupants = vec![guest];

        let mut dropped = booking(2, 2, BookingStatus::Cancelled, "2025-06-01", "2025-06-03");
        dropped.occupants = vec![with_days(
            occupant(2, "B"),
            "2025-06-02",
            "2025-06-02",
            MealSummary {
                breakfast: true,
                lunch: false,
                dinner: false,
            },
        )];

        let board = meals_dashboard(&[active, dropped], date);
        assert_eq!(board.on_request.dinner, 1);
        assert_eq!(board.on_request.total, 1);
        assert_eq!(board.planned.breakfast, 1);
        assert_eq!(board.planned.lunch, 1);
        assert_eq!(board.planned.dinner, 0);
        assert_eq!(board.actual.total, 3);
        assert_eq!(board.cancelled.lunch, 2);
        assert_eq!(board.cancelled.breakfast, 1);
        assert_eq!(board.cancelled.dinner, 1);
        assert_eq!(board.cancelled.total, 4);
    }

    #[test]
    fn booking_list_filters_and_search() {
        let date = d("2025-06-05");
        let mut arriving = booking(11, 1, BookingStatus::Booked, "2025-06-05", "2025-06-07");
        arriving.occupants = vec![occupant(1, "Meera Iyer")];
        let staying = booking(12, 2, BookingStatus::CheckedIn, "2025-06-01", "2025-06-06");
        let cancelled = booking(13, 3, BookingStatus::Cancelled, "2025-06-05", "2025-06-07");
        let all = vec![arriving, staying, cancelled];
        let rooms = rooms();

        let ids = |filter, search| {
            filter_bookings(&all, &rooms, filter, date, search)
                .into_iter()
                .map(|b| b.id)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(BookingListFilter::All, None), vec![11, 12, 13]);
        assert_eq!(ids(BookingListFilter::TodayCheckIns, None), vec![11]);
        assert_eq!(ids(BookingListFilter::Pending, None), vec![11]);
        assert_eq!(ids(BookingListFilter::Cancelled, None), vec![13]);
        assert_eq!(ids(BookingListFilter::Booked, None), vec![11, 12]);
        assert_eq!(ids(BookingListFilter::All, Some("meera")), vec![11]);
        assert_eq!(ids(BookingListFilter::All, Some("201")), vec![13]);
        assert_eq!(ids(BookingListFilter::All, Some("12")), vec![12]);
        assert_eq!(ids(BookingListFilter::All, Some("tower")), vec![11, 12, 13]);
        assert_eq!(
            BookingListFilter::from_str_value("reserved").unwrap(),
            BookingListFilter::Booked
        );
    }
}
