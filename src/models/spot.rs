use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

pub const STATUS_AVAILABLE: &str = "A";
pub const STATUS_OCCUPIED: &str = "O";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingSpot {
    pub id: i64,
    pub lot_id: i64,
    pub spot_number: String,
    pub status: String,
}

impl ParkingSpot {
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ParkingSpot>, sqlx::Error> {
        sqlx::query_as::<_, ParkingSpot>("SELECT * FROM parking_spots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn for_lot(pool: &SqlitePool, lot_id: i64) -> Result<Vec<ParkingSpot>, sqlx::Error> {
        sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots WHERE lot_id = $1 ORDER BY id",
        )
        .bind(lot_id)
        .fetch_all(pool)
        .await
    }

    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }
}

/// Label for the `seq`-th spot of a lot: first three letters of the lot
/// name plus a zero-padded sequence number, e.g. "Cen-001".
pub fn spot_label(lot_name: &str, seq: i64) -> String {
    let prefix: String = lot_name.chars().take(3).collect();
    format!("{}-{:03}", prefix, seq)
}

#[cfg(test)]
mod tests {
    use super::spot_label;

    #[test]
    fn label_uses_three_letter_prefix() {
        assert_eq!(spot_label("Central", 1), "Cen-001");
        assert_eq!(spot_label("Central", 42), "Cen-042");
    }

    #[test]
    fn short_names_keep_their_full_prefix() {
        assert_eq!(spot_label("A1", 7), "A1-007");
    }

    #[test]
    fn sequence_grows_past_three_digits() {
        assert_eq!(spot_label("Central", 1000), "Cen-1000");
    }
}
