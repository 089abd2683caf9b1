//! User and admin dashboards.

use askama::Template;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use axum_extra::extract::cookie::SignedCookieJar;

use super::render;
use crate::error::AppError;
use crate::middleware::{take_flash, AdminSession, AuthUser, FlashMessage};
use crate::models::{LotOverview, ParkingLot, Reservation, ReservationView, User};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user_dashboard", get(user_dashboard))
        .route("/admin_dashboard", get(admin_dashboard))
}

#[derive(Template)]
#[template(path = "user_dashboard.html")]
struct UserDashboardTemplate {
    user: User,
    active_reservations: Vec<ReservationView>,
    flash: Option<FlashMessage>,
}

async fn user_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let active_reservations =
        ReservationView::active_for_user(&state.db.pool, auth.user.id, 3).await?;
    Ok((
        jar,
        render(UserDashboardTemplate {
            user: auth.user,
            active_reservations,
            flash,
        })?,
    ))
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    total_users: i64,
    total_lots: i64,
    active_reservations: i64,
    lots: Vec<LotOverview>,
    flash: Option<FlashMessage>,
}

async fn admin_dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let pool = &state.db.pool;
    let total_users = User::count(pool).await?;
    let total_lots = ParkingLot::count(pool).await?;
    let active_reservations = Reservation::active_count(pool).await?;
    let lots = LotOverview::all(pool).await?;
    Ok((
        jar,
        render(AdminDashboardTemplate {
            total_users,
            total_lots,
            active_reservations,
            lots,
            flash,
        })?,
    ))
}
