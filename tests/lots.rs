mod common;

use common::{seed_lot, seed_user, test_db};
use parking_system::error::AppError;
use parking_system::models::{ParkingLot, ParkingSpot, Reservation};
use parking_system::services::booking;
use parking_system::services::lots::{self, LotInput};

fn input(name: &str, capacity: i64) -> LotInput {
    LotInput {
        prime_location_name: name.to_string(),
        price_per_hour: 10.0,
        address: "1 Test Street".to_string(),
        pin_code: "560001".to_string(),
        max_spots: capacity,
    }
}

#[tokio::test]
async fn create_lot_generates_labelled_spots() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;

    let lot_id = seed_lot(pool, "Central", 10.0, 2).await;

    let spots = ParkingSpot::for_lot(pool, lot_id).await.unwrap();
    let labels: Vec<&str> = spots.iter().map(|s| s.spot_number.as_str()).collect();
    assert_eq!(labels, ["Cen-001", "Cen-002"]);
    assert!(spots.iter().all(|s| s.is_available()));
}

#[tokio::test]
async fn growing_a_lot_appends_spots_continuing_the_numbering() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let lot_id = seed_lot(pool, "Central", 10.0, 2).await;

    lots::update_lot(pool, lot_id, input("Central", 4)).await.unwrap();

    let spots = ParkingSpot::for_lot(pool, lot_id).await.unwrap();
    let labels: Vec<&str> = spots.iter().map(|s| s.spot_number.as_str()).collect();
    assert_eq!(labels, ["Cen-001", "Cen-002", "Cen-003", "Cen-004"]);
}

#[tokio::test]
async fn regrowing_after_a_shrink_never_reuses_a_label() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 3).await;

    // Occupy all three spots, then free the first two so the
    // highest-numbered spot is the one still taken.
    let r1 = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    let r2 = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    booking::book_spot(pool, lot_id, user_id).await.unwrap();
    booking::end_reservation(pool, r1.id, None).await.unwrap();
    booking::end_reservation(pool, r2.id, None).await.unwrap();

    // Shrink deletes an available spot below the occupied Cen-003.
    lots::update_lot(pool, lot_id, input("Central", 2)).await.unwrap();

    lots::update_lot(pool, lot_id, input("Central", 3)).await.unwrap();

    let spots = ParkingSpot::for_lot(pool, lot_id).await.unwrap();
    let mut labels: Vec<&str> = spots.iter().map(|s| s.spot_number.as_str()).collect();
    assert!(labels.contains(&"Cen-003"));
    assert!(labels.contains(&"Cen-004"));
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), spots.len());
}

#[tokio::test]
async fn shrinking_removes_available_spots_only() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 3).await;

    // Occupy the first spot, then shrink to 2.
    booking::book_spot(pool, lot_id, user_id).await.unwrap();
    lots::update_lot(pool, lot_id, input("Central", 2)).await.unwrap();

    let spots = ParkingSpot::for_lot(pool, lot_id).await.unwrap();
    assert_eq!(spots.len(), 2);
    assert!(spots.iter().any(|s| s.status == "O"));
}

#[tokio::test]
async fn shrinking_below_occupancy_is_rejected() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "bob").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 2).await;

    booking::book_spot(pool, lot_id, user_id).await.unwrap();
    booking::book_spot(pool, lot_id, user_id).await.unwrap();

    let err = lots::update_lot(pool, lot_id, input("Central", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let lot = ParkingLot::find_by_id(pool, lot_id).await.unwrap().unwrap();
    assert_eq!(lot.max_spots, 2);
}

#[tokio::test]
async fn deleting_an_occupied_lot_is_rejected() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "carol").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    booking::book_spot(pool, lot_id, user_id).await.unwrap();

    let err = lots::delete_lot(pool, lot_id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(ParkingLot::find_by_id(pool, lot_id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_free_lot_cascades_into_spots_and_reservations() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "dave").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    let reservation = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    booking::end_reservation(pool, reservation.id, None).await.unwrap();

    lots::delete_lot(pool, lot_id).await.unwrap();

    assert!(ParkingLot::find_by_id(pool, lot_id).await.unwrap().is_none());
    assert!(ParkingSpot::for_lot(pool, lot_id).await.unwrap().is_empty());
    assert!(Reservation::all(pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_missing_lot_is_not_found() {
    let ctx = test_db().await;
    let err = lots::delete_lot(&ctx.db.pool, 42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
