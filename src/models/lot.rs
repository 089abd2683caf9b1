use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::spot::{STATUS_AVAILABLE, STATUS_OCCUPIED};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingLot {
    pub id: i64,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub max_spots: i64,
}

/// A lot joined with its live occupancy counts, for dashboards and the
/// lot listing endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LotOverview {
    pub id: i64,
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub max_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
}

impl ParkingLot {
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ParkingLot>, sqlx::Error> {
        sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn all(pool: &SqlitePool) -> Result<Vec<ParkingLot>, sqlx::Error> {
        sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parking_lots")
            .fetch_one(pool)
            .await
    }

    pub async fn available_spots(pool: &SqlitePool, lot_id: i64) -> Result<i64, sqlx::Error> {
        count_spots(pool, lot_id, STATUS_AVAILABLE).await
    }

    pub async fn occupied_spots(pool: &SqlitePool, lot_id: i64) -> Result<i64, sqlx::Error> {
        count_spots(pool, lot_id, STATUS_OCCUPIED).await
    }
}

impl LotOverview {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<LotOverview>, sqlx::Error> {
        sqlx::query_as::<_, LotOverview>(
            r#"
            SELECT l.id, l.prime_location_name, l.price_per_hour, l.address,
                   l.pin_code, l.max_spots,
                   COALESCE(SUM(CASE WHEN s.status = 'A' THEN 1 ELSE 0 END), 0) AS available_spots,
                   COALESCE(SUM(CASE WHEN s.status = 'O' THEN 1 ELSE 0 END), 0) AS occupied_spots
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id
            GROUP BY l.id
            ORDER BY l.id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

async fn count_spots(pool: &SqlitePool, lot_id: i64, status: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM parking_spots WHERE lot_id = $1 AND status = $2",
    )
    .bind(lot_id)
    .bind(status)
    .fetch_one(pool)
    .await
}
