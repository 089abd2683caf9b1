//! Admin lot management pages plus the lot details page.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::{flash_or_fail, flash_redirect, render};
use crate::error::AppError;
use crate::middleware::{take_flash, AdminSession, AuthUser, FlashMessage};
use crate::models::{LotOverview, ParkingLot};
use crate::services::lots::{self, LotInput};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create_lot", get(create_lot_page).post(create_lot_submit))
        .route("/manage_lots", get(manage_lots))
        .route("/edit_lot/{id}", get(edit_lot_page).post(edit_lot_submit))
        .route("/delete_lot/{id}", get(delete_lot_page).post(delete_lot_submit))
        .route("/lot_details/{id}", get(lot_details))
}

#[derive(Debug, Deserialize)]
struct LotForm {
    prime_location_name: String,
    price_per_hour: f64,
    address: String,
    pin_code: String,
    max_spots: i64,
}

impl From<LotForm> for LotInput {
    fn from(form: LotForm) -> Self {
        LotInput {
            prime_location_name: form.prime_location_name,
            price_per_hour: form.price_per_hour,
            address: form.address,
            pin_code: form.pin_code,
            max_spots: form.max_spots,
        }
    }
}

#[derive(Template)]
#[template(path = "create_lot.html")]
struct CreateLotTemplate {
    flash: Option<FlashMessage>,
}

async fn create_lot_page(
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(CreateLotTemplate { flash })?))
}

async fn create_lot_submit(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Form(form): Form<LotForm>,
) -> Result<impl IntoResponse, AppError> {
    match lots::create_lot(&state.db.pool, form.into()).await {
        Ok(_) => Ok(flash_redirect(
            jar,
            "Parking lot created successfully!",
            "success",
            "/admin_dashboard",
        )),
        Err(e) => flash_or_fail(jar, e, "/create_lot"),
    }
}

#[derive(Template)]
#[template(path = "manage_lots.html")]
struct ManageLotsTemplate {
    lots: Vec<LotOverview>,
    flash: Option<FlashMessage>,
}

async fn manage_lots(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let lots = LotOverview::all(&state.db.pool).await?;
    Ok((jar, render(ManageLotsTemplate { lots, flash })?))
}

#[derive(Template)]
#[template(path = "edit_lot.html")]
struct EditLotTemplate {
    lot: ParkingLot,
    occupied_spots: i64,
    flash: Option<FlashMessage>,
}

async fn edit_lot_page(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(lot_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let lot = ParkingLot::find_by_id(&state.db.pool, lot_id)
        .await?
        .ok_or(AppError::NotFound("parking lot"))?;
    let occupied_spots = ParkingLot::occupied_spots(&state.db.pool, lot_id).await?;
    Ok((
        jar,
        render(EditLotTemplate {
            lot,
            occupied_spots,
            flash,
        })?,
    ))
}

async fn edit_lot_submit(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(lot_id): Path<i64>,
    jar: SignedCookieJar,
    Form(form): Form<LotForm>,
) -> Result<impl IntoResponse, AppError> {
    match lots::update_lot(&state.db.pool, lot_id, form.into()).await {
        Ok(()) => Ok(flash_redirect(
            jar,
            "Lot updated successfully",
            "success",
            "/manage_lots",
        )),
        Err(e) => flash_or_fail(jar, e, &format!("/edit_lot/{}", lot_id)),
    }
}

#[derive(Template)]
#[template(path = "delete_lot.html")]
struct DeleteLotTemplate {
    lot: ParkingLot,
    occupied_spots: i64,
    flash: Option<FlashMessage>,
}

async fn delete_lot_page(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(lot_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let lot = ParkingLot::find_by_id(&state.db.pool, lot_id)
        .await?
        .ok_or(AppError::NotFound("parking lot"))?;
    let occupied_spots = ParkingLot::occupied_spots(&state.db.pool, lot_id).await?;
    Ok((
        jar,
        render(DeleteLotTemplate {
            lot,
            occupied_spots,
            flash,
        })?,
    ))
}

async fn delete_lot_submit(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(lot_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    match lots::delete_lot(&state.db.pool, lot_id).await {
        Ok(()) => Ok(flash_redirect(
            jar,
            "Lot deleted successfully",
            "success",
            "/manage_lots",
        )),
        Err(e) => flash_or_fail(jar, e, "/manage_lots"),
    }
}

#[derive(Template)]
#[template(path = "lot_details.html")]
struct LotDetailsTemplate {
    lot: Option<ParkingLot>,
    available_spots: i64,
    flash: Option<FlashMessage>,
}

async fn lot_details(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(lot_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let lot = ParkingLot::find_by_id(&state.db.pool, lot_id).await?;
    let available_spots = match &lot {
        Some(_) => ParkingLot::available_spots(&state.db.pool, lot_id).await?,
        None => 0,
    };
    Ok((
        jar,
        render(LotDetailsTemplate {
            lot,
            available_spots,
            flash,
        })?,
    ))
}
