//! Repository for the `booking_occupants` table.

use sqlx::PgPool;
use staybook_core::meal::MealSummary;
use staybook_core::occupant::Presence;
use staybook_core::types::DbId;

use crate::models::occupant::{CreateOccupant, Occupant};
use crate::PgTx;

/// Column list shared across queries. Document ciphertext and hash are
/// deliberately absent.
const COLUMNS: &str = "id, booking_id, full_name, phone_number, document_last4, \
     has_breakfast, has_lunch, has_dinner, is_checked_in, check_in_time, \
     is_checked_out, check_out_time, created_at, updated_at";

pub struct OccupantRepo;

impl OccupantRepo {
    pub async fn create(tx: &mut PgTx<'_>, input: &CreateOccupant) -> Result<Occupant, sqlx::Error> {
        let query = format!(
            "INSERT INTO booking_occupants
                (booking_id, full_name, phone_number, document_encrypted, document_hash,
                 document_last4, has_breakfast, has_lunch, has_dinner)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(input.booking_id)
            .bind(&input.full_name)
            .bind(&input.phone_number)
            .bind(&input.document_encrypted)
            .bind(&input.document_hash)
            .bind(&input.document_last4)
            .bind(input.meals.breakfast)
            .bind(input.meals.lunch)
            .bind(input.meals.dinner)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether any occupant in any booking carries this document hash.
    pub async fn document_hash_exists(pool: &PgPool, hash: &[u8]) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM booking_occupants WHERE document_hash = $1)",
        )
        .bind(hash)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Occupant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_occupants WHERE id = $1");
        sqlx::query_as::<_, Occupant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The encrypted identity document of one occupant.
    pub async fn find_document(pool: &PgPool, id: DbId) -> Result<Option<Vec<u8>>, sqlx::Error> {
        sqlx::query_scalar("SELECT document_encrypted FROM booking_occupants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an occupant and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        tx: &mut PgTx<'_>,
        id: DbId,
    ) -> Result<Option<Occupant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_occupants WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Occupant>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Occupant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_occupants ORDER BY id");
        sqlx::query_as::<_, Occupant>(&query).fetch_all(pool).await
    }

    pub async fn list_by_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<Occupant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_occupants WHERE booking_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// Occupants of several bookings at once, ordered by id.
    pub async fn list_by_bookings(
        pool: &PgPool,
        booking_ids: &[DbId],
    ) -> Result<Vec<Occupant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_occupants WHERE booking_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(booking_ids)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_by_bookings`] but inside a transaction.
    pub async fn list_by_bookings_tx(
        tx: &mut PgTx<'_>,
        booking_ids: &[DbId],
    ) -> Result<Vec<Occupant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_occupants WHERE booking_id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(booking_ids)
            .fetch_all(&mut **tx)
            .await
    }

    pub async fn update_presence(
        tx: &mut PgTx<'_>,
        id: DbId,
        presence: &Presence,
    ) -> Result<Option<Occupant>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_occupants SET
                is_checked_in = $2,
                check_in_time = $3,
                is_checked_out = $4,
                check_out_time = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(id)
            .bind(presence.is_checked_in)
            .bind(presence.check_in_time)
            .bind(presence.is_checked_out)
            .bind(presence.check_out_time)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn update_meal_summary(
        tx: &mut PgTx<'_>,
        id: DbId,
        meals: MealSummary,
    ) -> Result<Option<Occupant>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_occupants SET
                has_breakfast = $2,
                has_lunch = $3,
                has_dinner = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Occupant>(&query)
            .bind(id)
            .bind(meals.breakfast)
            .bind(meals.lunch)
            .bind(meals.dinner)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete an occupant and its meal plan. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM booking_occupants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
