use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: i64,
    pub spot_id: i64,
    pub user_id: i64,
    pub parking_timestamp: NaiveDateTime,
    pub leaving_timestamp: Option<NaiveDateTime>,
    pub cost_per_hour: f64,
    pub total_cost: Option<f64>,
}

/// A reservation joined with its spot, lot and user, for page rendering
/// and the receipts listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationView {
    pub id: i64,
    pub spot_id: i64,
    pub user_id: i64,
    pub username: String,
    pub spot_number: String,
    pub lot_name: String,
    pub parking_timestamp: NaiveDateTime,
    pub leaving_timestamp: Option<NaiveDateTime>,
    pub cost_per_hour: f64,
    pub total_cost: Option<f64>,
}

const VIEW_QUERY: &str = r#"
    SELECT r.id, r.spot_id, r.user_id, u.username, s.spot_number,
           l.prime_location_name AS lot_name,
           r.parking_timestamp, r.leaving_timestamp, r.cost_per_hour, r.total_cost
    FROM reservations r
    JOIN parking_spots s ON s.id = r.spot_id
    JOIN parking_lots l ON l.id = s.lot_id
    JOIN users u ON u.id = r.user_id
"#;

impl Reservation {
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn all(pool: &SqlitePool) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn active_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE leaving_timestamp IS NULL",
        )
        .fetch_one(pool)
        .await
    }

    pub fn is_active(&self) -> bool {
        self.leaving_timestamp.is_none()
    }
}

impl ReservationView {
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<ReservationView>, sqlx::Error> {
        let q = format!("{} WHERE r.id = $1", VIEW_QUERY);
        sqlx::query_as::<_, ReservationView>(&q)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent active reservations of one user, newest first.
    pub async fn active_for_user(
        pool: &SqlitePool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ReservationView>, sqlx::Error> {
        let q = format!(
            "{} WHERE r.user_id = $1 AND r.leaving_timestamp IS NULL
             ORDER BY r.parking_timestamp DESC LIMIT $2",
            VIEW_QUERY
        );
        sqlx::query_as::<_, ReservationView>(&q)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Full booking history of one user, newest first.
    pub async fn history_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<ReservationView>, sqlx::Error> {
        let q = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.parking_timestamp DESC",
            VIEW_QUERY
        );
        sqlx::query_as::<_, ReservationView>(&q)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Closed reservations across all users, most recently closed first.
    pub async fn receipts(pool: &SqlitePool) -> Result<Vec<ReservationView>, sqlx::Error> {
        let q = format!(
            "{} WHERE r.leaving_timestamp IS NOT NULL ORDER BY r.leaving_timestamp DESC",
            VIEW_QUERY
        );
        sqlx::query_as::<_, ReservationView>(&q).fetch_all(pool).await
    }
}

/// Fractional elapsed hours times the rate captured at booking time,
/// rounded to two decimal places. Never negative.
pub fn total_cost(
    parking: NaiveDateTime,
    leaving: NaiveDateTime,
    cost_per_hour: f64,
) -> f64 {
    let hours = (leaving - parking).num_seconds() as f64 / 3600.0;
    let cost = hours.max(0.0) * cost_per_hour;
    (cost * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::total_cost;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn whole_hours() {
        assert_eq!(total_cost(at(10, 0), at(12, 0), 10.0), 20.0);
    }

    #[test]
    fn fractional_hours_are_billed() {
        assert_eq!(total_cost(at(10, 0), at(11, 30), 10.0), 15.0);
    }

    #[test]
    fn rounds_to_cents() {
        // 20 minutes at 10/h = 3.333... -> 3.33
        assert_eq!(total_cost(at(10, 0), at(10, 20), 10.0), 3.33);
    }

    #[test]
    fn clock_skew_never_goes_negative() {
        assert_eq!(total_cost(at(12, 0), at(10, 0), 10.0), 0.0);
    }
}
