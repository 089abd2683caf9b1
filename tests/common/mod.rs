#![allow(dead_code)]

use chrono::{Duration, Utc};
use parking_system::config::{AppConfig, AuthConfig, Config, DatabaseConfig};
use parking_system::database::Database;
use parking_system::services::accounts::{self, NewUser};
use parking_system::services::lots::{self, LotInput};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A fully wired application over a temp-file database, for driving the
/// JSON API with `tower::ServiceExt::oneshot`.
pub struct TestApp {
    pub state: parking_system::AppState,
    _dir: TempDir,
}

pub async fn test_state() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("parking.db").display());
    let state = parking_system::AppState::new(test_config(&url))
        .await
        .expect("app state");
    TestApp { state, _dir: dir }
}

/// A migrated database backed by a temp file that lives as long as the
/// struct.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("parking.db").display());
    let db = Database::new(&url, 2).await.expect("connect");
    db.run_migrations().await.expect("migrate");
    TestDb { db, _dir: dir }
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "warn".to_string(),
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            pool_size: 2,
        },
        auth: AuthConfig {
            secret_key: "test-secret".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "unique1234".to_string(),
        },
    }
}

pub async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    accounts::register(
        pool,
        NewUser {
            username: username.to_string(),
            fullname: format!("{} Test", username),
            email: format!("{}@example.com", username),
            password: "hunter22".to_string(),
            dob: None,
            state: None,
        },
    )
    .await
    .expect("seed user")
    .id
}

pub async fn seed_lot(pool: &SqlitePool, name: &str, price: f64, capacity: i64) -> i64 {
    lots::create_lot(
        pool,
        LotInput {
            prime_location_name: name.to_string(),
            price_per_hour: price,
            address: "1 Test Street".to_string(),
            pin_code: "560001".to_string(),
            max_spots: capacity,
        },
    )
    .await
    .expect("seed lot")
    .id
}

/// Moves a reservation's parking timestamp into the past so checkout
/// sees real elapsed time.
pub async fn backdate_reservation(pool: &SqlitePool, reservation_id: i64, hours: i64) {
    let parked = Utc::now().naive_utc() - Duration::hours(hours);
    sqlx::query("UPDATE reservations SET parking_timestamp = $1 WHERE id = $2")
        .bind(parked)
        .bind(reservation_id)
        .execute(pool)
        .await
        .expect("backdate reservation");
}

pub async fn spot_status(pool: &SqlitePool, spot_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM parking_spots WHERE id = $1")
        .bind(spot_id)
        .fetch_one(pool)
        .await
        .expect("spot status")
}
