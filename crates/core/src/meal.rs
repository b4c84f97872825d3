//! Per-occupant, per-day meal plans.
//!
//! Each meal of a day is a [`MealSlot`] with three independent flags. A meal
//! is served when it is entitled and not cancelled; the on-request flag is a
//! billing marker and does not affect service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Meal kinds and slots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealKind {
    pub const ALL: [MealKind; 3] = [MealKind::Breakfast, MealKind::Lunch, MealKind::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSlot {
    pub entitled: bool,
    pub on_request: bool,
    pub cancelled: bool,
}

impl MealSlot {
    pub fn entitled(entitled: bool) -> Self {
        Self {
            entitled,
            ..Self::default()
        }
    }

    pub fn is_served(&self) -> bool {
        self.entitled && !self.cancelled
    }
}

// ---------------------------------------------------------------------------
// Daily plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMealPlan {
    pub date: NaiveDate,
    pub breakfast: MealSlot,
    pub lunch: MealSlot,
    pub dinner: MealSlot,
}

impl DailyMealPlan {
    /// A day carrying the given entitlements and no other flags.
    pub fn entitled(date: NaiveDate, summary: MealSummary) -> Self {
        Self {
            date,
            breakfast: MealSlot::entitled(summary.breakfast),
            lunch: MealSlot::entitled(summary.lunch),
            dinner: MealSlot::entitled(summary.dinner),
        }
    }

    pub fn slot(&self, kind: MealKind) -> &MealSlot {
        match kind {
            MealKind::Breakfast => &self.breakfast,
            MealKind::Lunch => &self.lunch,
            MealKind::Dinner => &self.dinner,
        }
    }

    pub fn slot_mut(&mut self, kind: MealKind) -> &mut MealSlot {
        match kind {
            MealKind::Breakfast => &mut self.breakfast,
            MealKind::Lunch => &mut self.lunch,
            MealKind::Dinner => &mut self.dinner,
        }
    }

    /// Entitlement flags of this day, ignoring cancellation.
    pub fn entitlements(&self) -> MealSummary {
        MealSummary {
            breakfast: self.breakfast.entitled,
            lunch: self.lunch.entitled,
            dinner: self.dinner.entitled,
        }
    }
}

/// A persisted daily plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealDay {
    pub id: DbId,
    #[serde(flatten)]
    pub plan: DailyMealPlan,
}

/// Flat wire shape of one day's nine flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealFlags {
    pub has_breakfast: bool,
    pub is_breakfast_on_request: bool,
    pub is_breakfast_cancelled: bool,
    pub has_lunch: bool,
    pub is_lunch_on_request: bool,
    pub is_lunch_cancelled: bool,
    pub has_dinner: bool,
    pub is_dinner_on_request: bool,
    pub is_dinner_cancelled: bool,
}

impl MealFlags {
    pub fn into_plan(self, date: NaiveDate) -> DailyMealPlan {
        DailyMealPlan {
            date,
            breakfast: MealSlot {
                entitled: self.has_breakfast,
                on_request: self.is_breakfast_on_request,
                cancelled: self.is_breakfast_cancelled,
            },
            lunch: MealSlot {
                entitled: self.has_lunch,
                on_request: self.is_lunch_on_request,
                cancelled: self.is_lunch_cancelled,
            },
            dinner: MealSlot {
                entitled: self.has_dinner,
                on_request: self.is_dinner_on_request,
                cancelled: self.is_dinner_cancelled,
            },
        }
    }
}

impl From<&DailyMealPlan> for MealFlags {
    fn from(plan: &DailyMealPlan) -> Self {
        Self {
            has_breakfast: plan.breakfast.entitled,
            is_breakfast_on_request: plan.breakfast.on_request,
            is_breakfast_cancelled: plan.breakfast.cancelled,
            has_lunch: plan.lunch.entitled,
            is_lunch_on_request: plan.lunch.on_request,
            is_lunch_cancelled: plan.lunch.cancelled,
            has_dinner: plan.dinner.entitled,
            is_dinner_on_request: plan.dinner.on_request,
            is_dinner_cancelled: plan.dinner.cancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries and counts
// ---------------------------------------------------------------------------

/// Occupant-level "has breakfast / lunch / dinner" flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
}

impl MealSummary {
    /// OR of entitlement across all days. Cancellation is ignored.
    pub fn from_days<'a>(days: impl IntoIterator<Item = &'a DailyMealPlan>) -> Self {
        days.into_iter().fold(Self::default(), |acc, day| Self {
            breakfast: acc.breakfast || day.breakfast.entitled,
            lunch: acc.lunch || day.lunch.entitled,
            dinner: acc.dinner || day.dinner.entitled,
        })
    }

    /// Summary derived from the days when any exist, else the stored flags.
    pub fn resolve(days: &[MealDay], stored: MealSummary) -> Self {
        if days.is_empty() {
            stored
        } else {
            Self::from_days(days.iter().map(|d| &d.plan))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealCounts {
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
}

impl MealCounts {
    pub fn add(&mut self, summary: MealSummary) {
        self.breakfast += i64::from(summary.breakfast);
        self.lunch += i64::from(summary.lunch);
        self.dinner += i64::from(summary.dinner);
    }

    pub fn bump(&mut self, kind: MealKind) {
        match kind {
            MealKind::Breakfast => self.breakfast += 1,
            MealKind::Lunch => self.lunch += 1,
            MealKind::Dinner => self.dinner += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.breakfast + self.lunch + self.dinner
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// ---------------------------------------------------------------------------
// Plan generation
// ---------------------------------------------------------------------------

/// Every date from `check_in` through `check_out`, both inclusive.
pub fn stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    check_in
        .iter_days()
        .take_while(move |d| *d <= check_out)
}

/// One entitled day per stay date, carrying the occupant's flat flags.
pub fn generate_plan(
    check_in: NaiveDate,
    check_out: NaiveDate,
    summary: MealSummary,
) -> Vec<DailyMealPlan> {
    stay_dates(check_in, check_out)
        .map(|date| DailyMealPlan::entitled(date, summary))
        .collect()
}

/// Number of calendar days in an inclusive range, zero when reversed.
pub fn inclusive_day_count(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        0
    } else {
        (to - from).num_days() + 1
    }
}
