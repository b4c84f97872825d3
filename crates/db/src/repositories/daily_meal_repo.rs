//! Repository for the `occupant_daily_meals` table.

use sqlx::PgPool;
use staybook_core::meal::DailyMealPlan;
use staybook_core::types::DbId;

use crate::models::daily_meal::DailyMeal;
use crate::PgTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, booking_occupant_id, meal_date, \
     has_breakfast, is_breakfast_on_request, is_breakfast_cancelled, \
     has_lunch, is_lunch_on_request, is_lunch_cancelled, \
     has_dinner, is_dinner_on_request, is_dinner_cancelled, \
     created_at, updated_at";

pub struct DailyMealRepo;

impl DailyMealRepo {
    /// Insert one row per plan day for an occupant.
    pub async fn create_many(
        tx: &mut PgTx<'_>,
        occupant_id: DbId,
        days: &[DailyMealPlan],
    ) -> Result<Vec<DailyMeal>, sqlx::Error> {
        let query = format!(
            "INSERT INTO occupant_daily_meals
                (booking_occupant_id, meal_date,
                 has_breakfast, is_breakfast_on_request, is_breakfast_cancelled,
                 has_lunch, is_lunch_on_request, is_lunch_cancelled,
                 has_dinner, is_dinner_on_request, is_dinner_cancelled)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(days.len());
        for day in days {
            let row = sqlx::query_as::<_, DailyMeal>(&query)
                .bind(occupant_id)
                .bind(day.date)
                .bind(day.breakfast.entitled)
                .bind(day.breakfast.on_request)
                .bind(day.breakfast.cancelled)
                .bind(day.lunch.entitled)
                .bind(day.lunch.on_request)
                .bind(day.lunch.cancelled)
                .bind(day.dinner.entitled)
                .bind(day.dinner.on_request)
                .bind(day.dinner.cancelled)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    pub async fn list_by_occupant(
        pool: &PgPool,
        occupant_id: DbId,
    ) -> Result<Vec<DailyMeal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM occupant_daily_meals
             WHERE booking_occupant_id = $1 ORDER BY meal_date"
        );
        sqlx::query_as::<_, DailyMeal>(&query)
            .bind(occupant_id)
            .fetch_all(pool)
            .await
    }

    /// Days of one occupant, locked for the rest of the transaction.
    pub async fn list_by_occupant_for_update(
        tx: &mut PgTx<'_>,
        occupant_id: DbId,
    ) -> Result<Vec<DailyMeal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM occupant_daily_meals
             WHERE booking_occupant_id = $1 ORDER BY meal_date FOR UPDATE"
        );
        sqlx::query_as::<_, DailyMeal>(&query)
            .bind(occupant_id)
            .fetch_all(&mut **tx)
            .await
    }

    pub async fn list_by_occupants(
        pool: &PgPool,
        occupant_ids: &[DbId],
    ) -> Result<Vec<DailyMeal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM occupant_daily_meals
             WHERE booking_occupant_id = ANY($1) ORDER BY booking_occupant_id, meal_date"
        );
        sqlx::query_as::<_, DailyMeal>(&query)
            .bind(occupant_ids)
            .fetch_all(pool)
            .await
    }

    /// Overwrite all nine flags of a day. Returns `None` if the row is gone.
    pub async fn update_flags(
        tx: &mut PgTx<'_>,
        id: DbId,
        day: &DailyMealPlan,
    ) -> Result<Option<DailyMeal>, sqlx::Error> {
        let query = format!(
            "UPDATE occupant_daily_meals SET
                has_breakfast = $2, is_breakfast_on_request = $3, is_breakfast_cancelled = $4,
                has_lunch = $5, is_lunch_on_request = $6, is_lunch_cancelled = $7,
                has_dinner = $8, is_dinner_on_request = $9, is_dinner_cancelled = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyMeal>(&query)
            .bind(id)
            .bind(day.breakfast.entitled)
            .bind(day.breakfast.on_request)
            .bind(day.breakfast.cancelled)
            .bind(day.lunch.entitled)
            .bind(day.lunch.on_request)
            .bind(day.lunch.cancelled)
            .bind(day.dinner.entitled)
            .bind(day.dinner.on_request)
            .bind(day.dinner.cancelled)
            .fetch_optional(&mut **tx)
            .await
    }
}
