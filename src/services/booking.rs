//! Booking and checkout.
//!
//! Both HTTP surfaces go through these two functions, so the spot status
//! flip and the reservation row always change together in one transaction.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::reservation::total_cost;
use crate::models::spot::{STATUS_AVAILABLE, STATUS_OCCUPIED};
use crate::models::{ParkingLot, Reservation};

/// Books the first available spot in the lot for the user.
///
/// The rate is captured from the lot's current price; it is not re-read at
/// checkout. The status flip is a guarded update, so two concurrent
/// bookings of the last spot cannot both succeed — the loser gets a
/// conflict.
pub async fn book_spot(
    pool: &SqlitePool,
    lot_id: i64,
    user_id: i64,
) -> Result<Reservation, AppError> {
    let mut tx = pool.begin().await?;

    let lot = sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1")
        .bind(lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("parking lot"))?;

    let user_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
    if !user_exists {
        return Err(AppError::NotFound("user"));
    }

    // First available spot in insertion order.
    let spot_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM parking_spots WHERE lot_id = $1 AND status = $2 ORDER BY id LIMIT 1",
    )
    .bind(lot_id)
    .bind(STATUS_AVAILABLE)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::Conflict("No available spots at this location".to_string()))?;

    let claimed = sqlx::query("UPDATE parking_spots SET status = $1 WHERE id = $2 AND status = $3")
        .bind(STATUS_OCCUPIED)
        .bind(spot_id)
        .bind(STATUS_AVAILABLE)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        == 1;
    if !claimed {
        return Err(AppError::Conflict(
            "Spot was taken by a concurrent booking".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        "INSERT INTO reservations (spot_id, user_id, parking_timestamp, cost_per_hour)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(spot_id)
    .bind(user_id)
    .bind(now)
    .bind(lot.price_per_hour)
    .execute(&mut *tx)
    .await?;
    let reservation_id = result.last_insert_rowid();

    tx.commit().await?;
    tracing::info!(
        reservation_id,
        spot_id,
        user_id,
        lot_id,
        "reservation created"
    );

    Ok(Reservation {
        id: reservation_id,
        spot_id,
        user_id,
        parking_timestamp: now,
        leaving_timestamp: None,
        cost_per_hour: lot.price_per_hour,
        total_cost: None,
    })
}

/// Closes an active reservation: stamps the leaving time, prices the stay
/// and frees the spot.
///
/// `acting_user` is the session owner on the HTML surface; ending someone
/// else's reservation is forbidden there. The JSON API passes `None`.
pub async fn end_reservation(
    pool: &SqlitePool,
    reservation_id: i64,
    acting_user: Option<i64>,
) -> Result<Reservation, AppError> {
    let mut tx = pool.begin().await?;

    let mut reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("reservation"))?;

    if let Some(user_id) = acting_user {
        if reservation.user_id != user_id {
            return Err(AppError::Forbidden);
        }
    }
    if reservation.leaving_timestamp.is_some() {
        return Err(AppError::BadRequest(
            "Reservation is already closed".to_string(),
        ));
    }

    let leaving = Utc::now().naive_utc();
    let cost = total_cost(
        reservation.parking_timestamp,
        leaving,
        reservation.cost_per_hour,
    );

    sqlx::query("UPDATE reservations SET leaving_timestamp = $1, total_cost = $2 WHERE id = $3")
        .bind(leaving)
        .bind(cost)
        .bind(reservation_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE parking_spots SET status = $1 WHERE id = $2")
        .bind(STATUS_AVAILABLE)
        .bind(reservation.spot_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(reservation_id, total_cost = cost, "reservation closed");

    reservation.leaving_timestamp = Some(leaving);
    reservation.total_cost = Some(cost);
    Ok(reservation)
}
