//! Time source for every "now", "today" and cutoff decision.
//!
//! Handlers receive an `Arc<dyn Clock>` through application state; tests
//! swap in [`FixedClock`] to pin the wall clock.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    /// Current instant, used for audit stamps such as check-in time.
    fn now(&self) -> Timestamp;

    /// Current wall-clock time at the property.
    fn local_now(&self) -> NaiveDateTime;

    /// Current calendar date at the property.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Clock backed by the host.
///
/// With no offset configured the host's local zone is treated as the
/// property zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }

    /// Build a clock from a UTC offset expressed in minutes east of UTC.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Result<Self, CoreError> {
        let offset = match minutes {
            Some(m) => Some(FixedOffset::east_opt(m * 60).ok_or_else(|| {
                CoreError::Validation(format!("UTC offset out of range: {m} minutes"))
            })?),
            None => None,
        };
        Ok(Self::new(offset))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at }
    }

    /// Freeze at a property-local time with the property on UTC.
    pub fn at_local(local: NaiveDateTime) -> Self {
        Self {
            at: local.and_utc().fixed_offset(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at.with_timezone(&Utc)
    }

    fn local_now(&self) -> NaiveDateTime {
        self.at.naive_local()
    }
}
