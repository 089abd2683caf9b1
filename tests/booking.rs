mod common;

use common::{backdate_reservation, seed_lot, seed_user, spot_status, test_db};
use parking_system::error::AppError;
use parking_system::models::{ParkingSpot, Reservation};
use parking_system::services::booking;

#[tokio::test]
async fn booking_takes_first_available_spot() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 2).await;

    let reservation = booking::book_spot(pool, lot_id, user_id).await.unwrap();

    assert!(reservation.is_active());
    assert_eq!(reservation.cost_per_hour, 10.0);

    let spot = ParkingSpot::find_by_id(pool, reservation.spot_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(spot.spot_number, "Cen-001");
    assert_eq!(spot.status, "O");

    // Exactly one reservation, and it is open.
    let all = Reservation::all(pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].leaving_timestamp.is_none());
}

#[tokio::test]
async fn full_lot_rejects_booking_without_a_reservation() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "bob").await;
    let lot_id = seed_lot(pool, "Tiny", 5.0, 1).await;

    booking::book_spot(pool, lot_id, user_id).await.unwrap();
    let err = booking::book_spot(pool, lot_id, user_id).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(Reservation::all(pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn booking_unknown_lot_or_user_is_not_found() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "carol").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    let err = booking::book_spot(pool, 999, user_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = booking::book_spot(pool, lot_id, 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn checkout_prices_elapsed_time_and_frees_the_spot() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "dave").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 2).await;

    let reservation = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    backdate_reservation(pool, reservation.id, 2).await;

    let closed = booking::end_reservation(pool, reservation.id, Some(user_id))
        .await
        .unwrap();

    // Two hours at 10/h.
    let total = closed.total_cost.unwrap();
    assert!((total - 20.0).abs() < 0.01, "total was {}", total);
    assert!(closed.leaving_timestamp.is_some());
    assert_eq!(spot_status(pool, reservation.spot_id).await, "A");
}

#[tokio::test]
async fn double_checkout_is_rejected_and_total_unchanged() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "erin").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    let reservation = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    backdate_reservation(pool, reservation.id, 3).await;

    let closed = booking::end_reservation(pool, reservation.id, Some(user_id))
        .await
        .unwrap();
    let err = booking::end_reservation(pool, reservation.id, Some(user_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let row = Reservation::find_by_id(pool, reservation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.total_cost, closed.total_cost);
}

#[tokio::test]
async fn checkout_of_foreign_reservation_is_forbidden() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let owner = seed_user(pool, "frank").await;
    let intruder = seed_user(pool, "grace").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    let reservation = booking::book_spot(pool, lot_id, owner).await.unwrap();
    let err = booking::end_reservation(pool, reservation.id, Some(intruder))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(spot_status(pool, reservation.spot_id).await, "O");
}

#[tokio::test]
async fn freed_spot_is_rebookable() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "heidi").await;
    let lot_id = seed_lot(pool, "Tiny", 5.0, 1).await;

    let first = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    booking::end_reservation(pool, first.id, None).await.unwrap();

    let second = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    assert_eq!(second.spot_id, first.spot_id);
}
