//! Lot lifecycle: create, edit/resize, delete.
//!
//! Spot rows are created in bulk when a lot is created or enlarged and
//! deleted when it shrinks or is removed; only available spots may be
//! deleted.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::spot::{spot_label, STATUS_AVAILABLE, STATUS_OCCUPIED};
use crate::models::ParkingLot;

#[derive(Debug, Clone)]
pub struct LotInput {
    pub prime_location_name: String,
    pub price_per_hour: f64,
    pub address: String,
    pub pin_code: String,
    pub max_spots: i64,
}

pub async fn create_lot(pool: &SqlitePool, input: LotInput) -> Result<ParkingLot, AppError> {
    if input.max_spots < 1 {
        return Err(AppError::BadRequest(
            "A lot needs at least one spot".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO parking_lots (prime_location_name, price_per_hour, address, pin_code, max_spots)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&input.prime_location_name)
    .bind(input.price_per_hour)
    .bind(&input.address)
    .bind(&input.pin_code)
    .bind(input.max_spots)
    .execute(&mut *tx)
    .await?;
    let lot_id = result.last_insert_rowid();

    for seq in 1..=input.max_spots {
        sqlx::query("INSERT INTO parking_spots (lot_id, spot_number, status) VALUES ($1, $2, $3)")
            .bind(lot_id)
            .bind(spot_label(&input.prime_location_name, seq))
            .bind(STATUS_AVAILABLE)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(lot_id, spots = input.max_spots, "parking lot created");

    Ok(ParkingLot {
        id: lot_id,
        prime_location_name: input.prime_location_name,
        price_per_hour: input.price_per_hour,
        address: input.address,
        pin_code: input.pin_code,
        max_spots: input.max_spots,
    })
}

/// Updates lot details and resizes its spot pool.
///
/// Growing appends available spots continuing the numbering; shrinking
/// deletes available spots only. A target below the occupied count is
/// rejected and leaves max_spots unchanged.
pub async fn update_lot(pool: &SqlitePool, lot_id: i64, input: LotInput) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let lot = sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1")
        .bind(lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("parking lot"))?;

    let occupied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM parking_spots WHERE lot_id = $1 AND status = $2",
    )
    .bind(lot_id)
    .bind(STATUS_OCCUPIED)
    .fetch_one(&mut *tx)
    .await?;

    if input.max_spots < occupied {
        return Err(AppError::BadRequest(format!(
            "Cannot reduce spots below {} occupied spots",
            occupied
        )));
    }

    if input.max_spots > lot.max_spots {
        // Continue from the highest surviving label, not max_spots: a
        // shrink may have deleted low-numbered spots while a higher one
        // stayed occupied, and labels must stay unique within the lot.
        let labels: Vec<String> =
            sqlx::query_scalar("SELECT spot_number FROM parking_spots WHERE lot_id = $1")
                .bind(lot_id)
                .fetch_all(&mut *tx)
                .await?;
        let next = labels
            .iter()
            .filter_map(|label| label.rsplit('-').next().and_then(|n| n.parse::<i64>().ok()))
            .max()
            .unwrap_or(0)
            + 1;

        for seq in next..(next + input.max_spots - lot.max_spots) {
            sqlx::query(
                "INSERT INTO parking_spots (lot_id, spot_number, status) VALUES ($1, $2, $3)",
            )
            .bind(lot_id)
            .bind(spot_label(&input.prime_location_name, seq))
            .bind(STATUS_AVAILABLE)
            .execute(&mut *tx)
            .await?;
        }
    } else if input.max_spots < lot.max_spots {
        // Remove available spots only, highest-numbered first.
        sqlx::query(
            "DELETE FROM parking_spots WHERE id IN (
                 SELECT id FROM parking_spots
                 WHERE lot_id = $1 AND status = $2
                 ORDER BY id DESC LIMIT $3
             )",
        )
        .bind(lot_id)
        .bind(STATUS_AVAILABLE)
        .bind(lot.max_spots - input.max_spots)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        "UPDATE parking_lots
         SET prime_location_name = $1, price_per_hour = $2, address = $3,
             pin_code = $4, max_spots = $5
         WHERE id = $6",
    )
    .bind(&input.prime_location_name)
    .bind(input.price_per_hour)
    .bind(&input.address)
    .bind(&input.pin_code)
    .bind(input.max_spots)
    .bind(lot_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(lot_id, max_spots = input.max_spots, "parking lot updated");
    Ok(())
}

/// Deletes a lot and cascades into its spots and their reservations.
/// Rejected while any spot is occupied.
pub async fn delete_lot(pool: &SqlitePool, lot_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM parking_lots WHERE id = $1)")
        .bind(lot_id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(AppError::NotFound("parking lot"));
    }

    let occupied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM parking_spots WHERE lot_id = $1 AND status = $2",
    )
    .bind(lot_id)
    .bind(STATUS_OCCUPIED)
    .fetch_one(&mut *tx)
    .await?;
    if occupied > 0 {
        return Err(AppError::Conflict(
            "Cannot delete lot with occupied spots".to_string(),
        ));
    }

    sqlx::query(
        "DELETE FROM reservations WHERE spot_id IN (SELECT id FROM parking_spots WHERE lot_id = $1)",
    )
    .bind(lot_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM parking_spots WHERE lot_id = $1")
        .bind(lot_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM parking_lots WHERE id = $1")
        .bind(lot_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(lot_id, "parking lot deleted");
    Ok(())
}
