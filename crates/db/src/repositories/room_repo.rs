//! Repository for the `rooms` table and its reference joins.

use sqlx::PgPool;
use staybook_core::types::DbId;

use crate::models::room::{RoomFilter, RoomListing, STATUS_AVAILABLE};

/// Joined column list shared across queries.
const LISTING_COLUMNS: &str = "r.id, r.room_number, r.status, r.occupied, \
     r.building_id, b.name AS building_name, \
     r.floor_id, f.floor_number, \
     r.room_type_id, rt.name AS room_type_name, rt.capacity";

const LISTING_FROM: &str = "FROM rooms r \
     JOIN buildings b ON b.id = r.building_id \
     JOIN floors f ON f.id = r.floor_id \
     LEFT JOIN room_types rt ON rt.id = r.room_type_id";

/// Read access to rooms. Room management lives elsewhere.
pub struct RoomRepo;

impl RoomRepo {
    /// Every room, ordered by building then room number.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoomListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM} ORDER BY b.name, r.room_number, r.id"
        );
        sqlx::query_as::<_, RoomListing>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rooms")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Rooms marked available that pass the structural filters. Date
    /// conflicts are applied by the caller.
    pub async fn search_available(
        pool: &PgPool,
        filter: &RoomFilter,
    ) -> Result<Vec<RoomListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             WHERE r.status = $1
               AND ($2::BIGINT IS NULL OR r.building_id = $2)
               AND ($3::BIGINT IS NULL OR r.room_type_id = $3)
               AND ($4::INTEGER IS NULL OR rt.capacity >= $4)
               AND ($5::INTEGER IS NULL OR f.floor_number = $5)
             ORDER BY b.name, r.room_number, r.id"
        );
        sqlx::query_as::<_, RoomListing>(&query)
            .bind(STATUS_AVAILABLE)
            .bind(filter.building_id)
            .bind(filter.room_type_id)
            .bind(filter.min_capacity)
            .bind(filter.floor_number)
            .fetch_all(pool)
            .await
    }

    /// Rooms of one building, optionally narrowed to a floor.
    pub async fn list_in_building(
        pool: &PgPool,
        building_id: DbId,
        floor_id: Option<DbId>,
    ) -> Result<Vec<RoomListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM}
             WHERE r.building_id = $1
               AND ($2::BIGINT IS NULL OR r.floor_id = $2)
             ORDER BY f.floor_number, r.room_number, r.id"
        );
        sqlx::query_as::<_, RoomListing>(&query)
            .bind(building_id)
            .bind(floor_id)
            .fetch_all(pool)
            .await
    }
}
