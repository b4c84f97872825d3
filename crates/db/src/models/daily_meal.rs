//! Per-day meal plan rows.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use staybook_core::meal::{DailyMealPlan, MealDay, MealFlags};
use staybook_core::types::{DbId, Timestamp};

/// A row from the `occupant_daily_meals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyMeal {
    pub id: DbId,
    pub booking_occupant_id: DbId,
    pub meal_date: NaiveDate,
    pub has_breakfast: bool,
    pub is_breakfast_on_request: bool,
    pub is_breakfast_cancelled: bool,
    pub has_lunch: bool,
    pub is_lunch_on_request: bool,
    pub is_lunch_cancelled: bool,
    pub has_dinner: bool,
    pub is_dinner_on_request: bool,
    pub is_dinner_cancelled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyMeal {
    pub fn flags(&self) -> MealFlags {
        MealFlags {
            has_breakfast: self.has_breakfast,
            is_breakfast_on_request: self.is_breakfast_on_request,
            is_breakfast_cancelled: self.is_breakfast_cancelled,
            has_lunch: self.has_lunch,
            is_lunch_on_request: self.is_lunch_on_request,
            is_lunch_cancelled: self.is_lunch_cancelled,
            has_dinner: self.has_dinner,
            is_dinner_on_request: self.is_dinner_on_request,
            is_dinner_cancelled: self.is_dinner_cancelled,
        }
    }

    pub fn plan(&self) -> DailyMealPlan {
        self.flags().into_plan(self.meal_date)
    }

    pub fn meal_day(&self) -> MealDay {
        MealDay {
            id: self.id,
            plan: self.plan(),
        }
    }
}
