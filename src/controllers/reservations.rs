//! JSON API for reservations: create (books the first free spot in a
//! lot), end (checkout), and list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::Reservation;
use crate::services::booking;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/{id}/end", post(end_reservation))
}

#[derive(Debug, Deserialize)]
struct CreateReservationRequest {
    lot_id: i64,
    user_id: i64,
}

// 201 on success, 409 when the lot is full or the spot is lost to a
// concurrent booking, 404 on a missing lot/user.
async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.lot_id <= 0 || req.user_id <= 0 {
        return Err(AppError::BadRequest(
            "lot_id and user_id must be positive".to_string(),
        ));
    }

    let reservation = booking::book_spot(&state.db.pool, req.lot_id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

// 400 on double checkout, 404 on a missing reservation. No ownership
// check: this surface carries no authentication.
async fn end_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = booking::end_reservation(&state.db.pool, id, None).await?;
    Ok(Json(reservation))
}

async fn list_reservations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = Reservation::all(&state.db.pool).await?;
    Ok(Json(reservations))
}
