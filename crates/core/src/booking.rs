//! Booking status state machine, stay windows and booking-date validation.
//!
//! Also defines [`BookingSnapshot`], the loaded view of a booking plus its
//! occupants that the availability and reporting engines operate on.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::occupant::OccupantSnapshot;
use crate::types::{DbId, LocalDateTime};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::CheckedIn => "CheckedIn",
            Self::CheckedOut => "CheckedOut",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "Booked" => Ok(Self::Booked),
            "CheckedIn" => Ok(Self::CheckedIn),
            "CheckedOut" => Ok(Self::CheckedOut),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid booking status: '{s}'. Must be one of: Booked, CheckedIn, CheckedOut, Cancelled"
            ))),
        }
    }

    /// Statuses reachable from `self` in one step.
    pub fn valid_transitions(self) -> &'static [BookingStatus] {
        match self {
            Self::Booked => &[Self::CheckedIn, Self::Cancelled],
            Self::CheckedIn => &[Self::CheckedOut, Self::Cancelled],
            Self::CheckedOut | Self::Cancelled => &[],
        }
    }

    pub fn can_transition(self, to: BookingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Booked or CheckedIn: the statuses that hold a room.
    pub fn is_occupying(self) -> bool {
        matches!(self, Self::Booked | Self::CheckedIn)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a validated status change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: BookingStatus,
    /// Remarks to persist. Only ever set when cancelling.
    pub cancellation_remarks: Option<String>,
    /// False when the request repeats the current status.
    pub changed: bool,
}

/// Validate a status transition and decide which remarks are stored.
///
/// Repeating the current status is accepted as a no-op.
pub fn plan_status_change(
    current: BookingStatus,
    requested: BookingStatus,
    remarks: Option<String>,
) -> Result<StatusChange, CoreError> {
    if current == requested {
        return Ok(StatusChange {
            status: current,
            cancellation_remarks: None,
            changed: false,
        });
    }
    if !current.can_transition(requested) {
        return Err(CoreError::Validation(format!(
            "Invalid booking status transition: {current} -> {requested}"
        )));
    }
    let cancellation_remarks = match requested {
        BookingStatus::Cancelled => remarks
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        _ => None,
    };
    Ok(StatusChange {
        status: requested,
        cancellation_remarks,
        changed: true,
    })
}

// ---------------------------------------------------------------------------
// Stay window
// ---------------------------------------------------------------------------

/// Date range of a booking, optionally refined by precise local timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayWindow {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub start: Option<LocalDateTime>,
    pub end: Option<LocalDateTime>,
}

impl StayWindow {
    pub fn dates(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
            start: None,
            end: None,
        }
    }

    pub fn precise(start: LocalDateTime, end: LocalDateTime) -> Self {
        Self {
            check_in: start.date(),
            check_out: end.date(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both precise bounds, when the window carries them.
    pub fn precise_bounds(&self) -> Option<(LocalDateTime, LocalDateTime)> {
        self.start.zip(self.end)
    }

    /// Interval used by the interactive search: precise bounds where set,
    /// otherwise midnight of the check-in and check-out dates.
    pub fn effective_interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.start
                .unwrap_or_else(|| self.check_in.and_time(NaiveTime::MIN)),
            self.end
                .unwrap_or_else(|| self.check_out.and_time(NaiveTime::MIN)),
        )
    }

    /// Check-in through check-out, both inclusive.
    pub fn spans(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date <= self.check_out
    }
}

// ---------------------------------------------------------------------------
// Date validation
// ---------------------------------------------------------------------------

/// Ordering rules shared by create and update.
pub fn validate_stay_order(stay: &StayWindow) -> Result<(), CoreError> {
    if stay.check_out < stay.check_in {
        return Err(CoreError::Validation(
            "Check-out date cannot be before check-in date".to_string(),
        ));
    }
    match stay.precise_bounds() {
        Some((start, end)) => {
            if start >= end {
                return Err(CoreError::Validation(
                    "Booking end time must be after start time".to_string(),
                ));
            }
            if start.date() != stay.check_in || end.date() != stay.check_out {
                return Err(CoreError::Validation(
                    "Booking start/end times must fall on the check-in and check-out dates"
                        .to_string(),
                ));
            }
        }
        None => {
            if stay.start.is_some() || stay.end.is_some() {
                return Err(CoreError::Validation(
                    "Booking start and end times must be supplied together".to_string(),
                ));
            }
            if stay.check_in >= stay.check_out {
                return Err(CoreError::Validation(
                    "Check-out date must be after check-in date".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Reject a stay that begins in the past relative to the property clock.
pub fn validate_not_in_past(stay: &StayWindow, local_now: NaiveDateTime) -> Result<(), CoreError> {
    match stay.precise_bounds() {
        Some((start, _)) if start < local_now => Err(CoreError::Validation(
            "Booking start time cannot be in the past".to_string(),
        )),
        None if stay.check_in < local_now.date() => Err(CoreError::Validation(
            "Check-in date cannot be in the past".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Validation for a new booking.
pub fn validate_new_stay(stay: &StayWindow, local_now: NaiveDateTime) -> Result<(), CoreError> {
    validate_stay_order(stay)?;
    validate_not_in_past(stay, local_now)
}

/// Validation for an edited booking. The past-date rule only applies when
/// the start of the stay moved.
pub fn validate_stay_change(
    previous: &StayWindow,
    next: &StayWindow,
    local_now: NaiveDateTime,
) -> Result<(), CoreError> {
    validate_stay_order(next)?;
    if previous.check_in != next.check_in || previous.start != next.start {
        validate_not_in_past(next, local_now)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A booking with its occupants, as loaded for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSnapshot {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub status: BookingStatus,
    pub stay: StayWindow,
    pub occupants: Vec<OccupantSnapshot>,
}

impl BookingSnapshot {
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    /// At least one occupant exists and every one has checked out.
    pub fn all_occupants_checked_out(&self) -> bool {
        !self.occupants.is_empty() && self.occupants.iter().all(|o| o.is_checked_out)
    }

    /// At least one occupant is still physically present or expected.
    pub fn has_occupant_not_checked_out(&self) -> bool {
        self.occupants.iter().any(|o| !o.is_checked_out)
    }

    pub fn any_occupant_checked_in(&self) -> bool {
        self.occupants.iter().any(|o| o.is_checked_in)
    }
}
