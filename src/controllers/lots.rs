//! JSON API for parking lots. API field names differ from the schema:
//! `name`/`price`/`pincode` rather than the long column names.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::LotOverview;
use crate::services::lots::{self, LotInput};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/lots", get(list_lots).post(create_lot))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateLotRequest {
    #[validate(length(min = 1, max = 120))]
    name: String,
    price: f64,
    address: String,
    pincode: String,
    max_spots: i64,
}

#[derive(Debug, Serialize)]
struct LotResponse {
    id: i64,
    name: String,
    price: f64,
    address: String,
    pincode: String,
    max_spots: i64,
    available_spots: i64,
}

async fn create_lot(
    State(state): State<AppState>,
    Json(req): Json<CreateLotRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let lot = lots::create_lot(
        &state.db.pool,
        LotInput {
            prime_location_name: req.name,
            price_per_hour: req.price,
            address: req.address,
            pin_code: req.pincode,
            max_spots: req.max_spots,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(LotResponse {
            id: lot.id,
            name: lot.prime_location_name,
            price: lot.price_per_hour,
            address: lot.address,
            pincode: lot.pin_code,
            max_spots: lot.max_spots,
            available_spots: lot.max_spots,
        }),
    ))
}

async fn list_lots(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let lots = LotOverview::all(&state.db.pool).await?;
    let payload: Vec<LotResponse> = lots
        .into_iter()
        .map(|lot| LotResponse {
            id: lot.id,
            name: lot.prime_location_name,
            price: lot.price_per_hour,
            address: lot.address,
            pincode: lot.pin_code,
            max_spots: lot.max_spots,
            available_spots: lot.available_spots,
        })
        .collect();
    Ok(Json(payload))
}
