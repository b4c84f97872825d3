//! Repository for the `bookings` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use staybook_core::booking::BookingStatus;
use staybook_core::types::DbId;

use crate::models::booking::{Booking, BookingListItem, CreateBooking, UpdateBooking};
use crate::PgTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, user_id, client_kind_id, check_in_date, check_out_date, \
     booking_start, booking_end, status, cancellation_remarks, created_at, updated_at";

/// Same columns qualified for joins against rooms.
const QUALIFIED_COLUMNS: &str = "bk.id, bk.room_id, bk.user_id, bk.client_kind_id, \
     bk.check_in_date, bk.check_out_date, bk.booking_start, bk.booking_end, bk.status, \
     bk.cancellation_remarks, bk.created_at, bk.updated_at";

/// Namespace for the room advisory locks taken while reserving.
const ROOM_LOCK_NAMESPACE: i32 = 0x5354_4159;

pub struct BookingRepo;

impl BookingRepo {
    /// Serialise reservations of one room until the transaction ends.
    ///
    /// Every check-then-write on a room's bookings must hold this lock so
    /// two overlapping requests cannot both pass the availability check.
    pub async fn lock_room(tx: &mut PgTx<'_>, room_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, hashint8($2))")
            .bind(ROOM_LOCK_NAMESPACE)
            .bind(room_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Insert a new booking in `Booked` status, returning the created row.
    pub async fn create(tx: &mut PgTx<'_>, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                (room_id, user_id, client_kind_id, check_in_date, check_out_date,
                 booking_start, booking_end, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.room_id)
            .bind(input.user_id)
            .bind(input.client_kind_id)
            .bind(input.check_in_date)
            .bind(input.check_out_date)
            .bind(input.booking_start)
            .bind(input.booking_end)
            .bind(BookingStatus::Booked.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        tx: &mut PgTx<'_>,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// All bookings with their room, oldest first.
    pub async fn list_with_rooms(pool: &PgPool) -> Result<Vec<BookingListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS}, r.room_number, b.name AS building_name
             FROM bookings bk
             JOIN rooms r ON r.id = bk.room_id
             JOIN buildings b ON b.id = r.building_id
             ORDER BY bk.id"
        );
        sqlx::query_as::<_, BookingListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Bookings made by one user, most recent stay first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE user_id = $1
             ORDER BY check_in_date DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every booking of a room, read inside the reservation transaction.
    pub async fn list_for_room(
        tx: &mut PgTx<'_>,
        room_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE room_id = $1 ORDER BY id");
        sqlx::query_as::<_, Booking>(&query)
            .bind(room_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Non-cancelled bookings whose date range touches `[from, to]`.
    pub async fn list_active_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE status <> $3 AND check_in_date <= $2 AND check_out_date >= $1
             ORDER BY id"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(from)
            .bind(to)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_all(pool)
            .await
    }

    /// Non-cancelled bookings of any of `room_ids`, regardless of dates.
    pub async fn list_active_for_rooms(
        pool: &PgPool,
        room_ids: &[DbId],
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE room_id = ANY($1) AND status <> $2
             ORDER BY id"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(room_ids)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_all(pool)
            .await
    }

    /// Bookings relevant to a report over `[from, to]`: any booking whose
    /// dates touch the range, plus checked-in bookings that may be
    /// overstaying into it. Ordered by id.
    pub async fn list_for_report(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE (check_in_date <= $2 AND check_out_date >= $1)
                OR (status = $3 AND check_out_date < $1)
             ORDER BY id"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(from)
            .bind(to)
            .bind(BookingStatus::CheckedIn.as_str())
            .fetch_all(pool)
            .await
    }

    /// Bookings with at least one occupant meal record dated `date`,
    /// whether or not the stay still covers that day. Ordered by id.
    pub async fn list_with_meals_on(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE id IN (
                 SELECT o.booking_id
                 FROM booking_occupants o
                 JOIN occupant_daily_meals m ON m.booking_occupant_id = o.id
                 WHERE m.meal_date = $1
             )
             ORDER BY id"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Replace the editable fields of a booking.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut PgTx<'_>,
        id: DbId,
        input: &UpdateBooking,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET
                room_id = $2,
                client_kind_id = $3,
                check_in_date = $4,
                check_out_date = $5,
                booking_start = $6,
                booking_end = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(input.room_id)
            .bind(input.client_kind_id)
            .bind(input.check_in_date)
            .bind(input.check_out_date)
            .bind(input.booking_start)
            .bind(input.booking_end)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status. Remarks are overwritten only when supplied.
    pub async fn update_status(
        tx: &mut PgTx<'_>,
        id: DbId,
        status: BookingStatus,
        cancellation_remarks: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET
                status = $2,
                cancellation_remarks = COALESCE($3, cancellation_remarks)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(cancellation_remarks)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete a booking and, by cascade, its occupants and meal plans.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
