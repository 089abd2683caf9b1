mod common;

use common::{seed_lot, seed_user, spot_status, test_db};
use parking_system::error::AppError;
use parking_system::models::{Reservation, User};
use parking_system::services::accounts::{self, NewUser};
use parking_system::services::booking;

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        fullname: "Test User".to_string(),
        email: email.to_string(),
        password: "hunter22".to_string(),
        dob: None,
        state: None,
    }
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;

    accounts::register(pool, new_user("alice", "alice@example.com"))
        .await
        .unwrap();
    let err = accounts::register(pool, new_user("alice", "other@example.com"))
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(msg) => assert!(msg.contains("Username")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;

    accounts::register(pool, new_user("alice", "alice@example.com"))
        .await
        .unwrap();
    let err = accounts::register(pool, new_user("bob", "alice@example.com"))
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(msg) => assert!(msg.contains("Email")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn authenticate_checks_password_and_ban_flag() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;

    let user = accounts::authenticate(pool, "alice", "hunter22").await.unwrap();
    assert_eq!(user.id, user_id);

    let err = accounts::authenticate(pool, "alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let err = accounts::authenticate(pool, "nobody", "hunter22").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    accounts::toggle_ban(pool, user_id).await.unwrap();
    let err = accounts::authenticate(pool, "alice", "hunter22").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn change_password_replaces_the_hash() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;

    accounts::change_password(pool, user_id, "new-secret").await.unwrap();

    assert!(accounts::authenticate(pool, "alice", "hunter22").await.is_err());
    assert!(accounts::authenticate(pool, "alice", "new-secret").await.is_ok());
}

#[tokio::test]
async fn toggle_ban_flips_back_and_forth() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;

    assert!(accounts::toggle_ban(pool, user_id).await.unwrap());
    assert!(!accounts::toggle_ban(pool, user_id).await.unwrap());

    let err = accounts::toggle_ban(pool, 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_user_removes_reservations_and_frees_spots() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let user_id = seed_user(pool, "alice").await;
    let lot_id = seed_lot(pool, "Central", 10.0, 1).await;

    let reservation = booking::book_spot(pool, lot_id, user_id).await.unwrap();
    accounts::delete_user(pool, user_id).await.unwrap();

    assert!(User::find_by_id(pool, user_id).await.unwrap().is_none());
    assert!(Reservation::all(pool).await.unwrap().is_empty());
    assert_eq!(spot_status(pool, reservation.spot_id).await, "A");
}

#[tokio::test]
async fn profile_update_respects_uniqueness() {
    let ctx = test_db().await;
    let pool = &ctx.db.pool;
    let alice = seed_user(pool, "alice").await;
    seed_user(pool, "bob").await;

    let err = accounts::update_profile(pool, alice, "bob", "alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    accounts::update_profile(pool, alice, "alice2", "alice2@example.com")
        .await
        .unwrap();
    let user = User::find_by_id(pool, alice).await.unwrap().unwrap();
    assert_eq!(user.username, "alice2");
    assert_eq!(user.email, "alice2@example.com");
}
