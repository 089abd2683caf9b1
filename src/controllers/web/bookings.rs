//! Booking flow: pick a lot, land on the booking status page, end the
//! reservation, browse history.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::{flash_or_fail, flash_redirect, forbidden_page, render};
use crate::error::AppError;
use crate::middleware::{take_flash, AuthUser, FlashMessage};
use crate::models::{LotOverview, ReservationView};
use crate::services::booking;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking_process", get(booking_page).post(booking_submit))
        .route("/book_status/{id}", get(book_status))
        .route("/end_reservation/{id}", post(end_reservation))
        .route("/user_bookings", get(user_bookings))
}

#[derive(Template)]
#[template(path = "booking_process.html")]
struct BookingTemplate {
    lots: Vec<LotOverview>,
    flash: Option<FlashMessage>,
}

async fn booking_page(
    State(state): State<AppState>,
    _auth: AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let lots = LotOverview::all(&state.db.pool).await?;
    Ok((jar, render(BookingTemplate { lots, flash })?))
}

#[derive(Debug, Deserialize)]
struct BookingForm {
    // Lot id; the form field keeps its historical name.
    location: i64,
}

async fn booking_submit(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<BookingForm>,
) -> Result<impl IntoResponse, AppError> {
    match booking::book_spot(&state.db.pool, form.location, auth.user.id).await {
        Ok(reservation) => Ok((
            jar,
            Redirect::to(&format!("/book_status/{}", reservation.id)),
        )),
        Err(e) => flash_or_fail(jar, e, "/booking_process"),
    }
}

#[derive(Template)]
#[template(path = "book_status.html")]
struct BookStatusTemplate {
    reservation: ReservationView,
    flash: Option<FlashMessage>,
}

async fn book_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reservation_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = take_flash(jar);
    let reservation = ReservationView::find_by_id(&state.db.pool, reservation_id)
        .await?
        .ok_or(AppError::NotFound("reservation"))?;
    if reservation.user_id != auth.user.id {
        return forbidden_page();
    }
    Ok((jar, render(BookStatusTemplate { reservation, flash })?).into_response())
}

async fn end_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reservation_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    match booking::end_reservation(&state.db.pool, reservation_id, Some(auth.user.id)).await {
        Ok(reservation) => {
            let total = reservation.total_cost.unwrap_or(0.0);
            Ok(flash_redirect(
                jar,
                &format!("Reservation ended. Total cost: {:.2}", total),
                "success",
                "/user_bookings",
            )
            .into_response())
        }
        // Acting on someone else's reservation stays a hard 403.
        Err(AppError::Forbidden) => forbidden_page(),
        Err(e) => flash_or_fail(jar, e, "/user_bookings").map(IntoResponse::into_response),
    }
}

#[derive(Template)]
#[template(path = "user_bookings.html")]
struct UserBookingsTemplate {
    reservations: Vec<ReservationView>,
    flash: Option<FlashMessage>,
}

async fn user_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let reservations = ReservationView::history_for_user(&state.db.pool, auth.user.id).await?;
    Ok((jar, render(UserBookingsTemplate { reservations, flash })?))
}
