//! Profile, settings and the admin user-management pages.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::{flash_or_fail, flash_redirect, render};
use crate::error::AppError;
use crate::middleware::{clear_session, take_flash, AdminSession, AuthUser, FlashMessage};
use crate::models::{ReservationView, User};
use crate::services::accounts;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user_profile", get(profile_page).post(profile_submit))
        .route("/manage_users", get(manage_users))
        .route("/ban_user/{id}", post(ban_user))
        .route("/receipts", get(receipts))
        .route("/settings", get(settings))
        .route("/change_password", get(change_password_page).post(change_password_submit))
        .route("/delete_account", post(delete_account))
}

#[derive(Template)]
#[template(path = "user_profile.html")]
struct ProfileTemplate {
    user: User,
    flash: Option<FlashMessage>,
}

async fn profile_page(auth: AuthUser, jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(ProfileTemplate { user: auth.user, flash })?))
}

#[derive(Debug, Deserialize)]
struct ProfileForm {
    username: String,
    email: String,
}

async fn profile_submit(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<impl IntoResponse, AppError> {
    match accounts::update_profile(&state.db.pool, auth.user.id, &form.username, &form.email).await
    {
        Ok(()) => Ok(flash_redirect(
            jar,
            "Profile updated successfully",
            "success",
            "/user_profile",
        )),
        Err(e) => flash_or_fail(jar, e, "/user_profile"),
    }
}

#[derive(Template)]
#[template(path = "manage_users.html")]
struct ManageUsersTemplate {
    users: Vec<User>,
    flash: Option<FlashMessage>,
}

async fn manage_users(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let users = User::all(&state.db.pool).await?;
    Ok((jar, render(ManageUsersTemplate { users, flash })?))
}

async fn ban_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(user_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    match accounts::toggle_ban(&state.db.pool, user_id).await {
        Ok(banned) => {
            let action = if banned { "banned" } else { "unbanned" };
            Ok(flash_redirect(
                jar,
                &format!("User {} successfully", action),
                "success",
                "/manage_users",
            ))
        }
        Err(e) => flash_or_fail(jar, e, "/manage_users"),
    }
}

#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptsTemplate {
    reservations: Vec<ReservationView>,
    flash: Option<FlashMessage>,
}

async fn receipts(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    let reservations = ReservationView::receipts(&state.db.pool).await?;
    Ok((jar, render(ReceiptsTemplate { reservations, flash })?))
}

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsTemplate {
    flash: Option<FlashMessage>,
}

async fn settings(_auth: AuthUser, jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(SettingsTemplate { flash })?))
}

#[derive(Template)]
#[template(path = "change_password.html")]
struct ChangePasswordTemplate {
    flash: Option<FlashMessage>,
}

async fn change_password_page(
    _auth: AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(ChangePasswordTemplate { flash })?))
}

#[derive(Debug, Deserialize)]
struct ChangePasswordForm {
    new_password: String,
}

async fn change_password_submit(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> Result<impl IntoResponse, AppError> {
    if form.new_password.len() < 6 {
        return Ok(flash_redirect(
            jar,
            "Password must be at least 6 characters",
            "danger",
            "/change_password",
        ));
    }
    match accounts::change_password(&state.db.pool, auth.user.id, &form.new_password).await {
        Ok(()) => Ok(flash_redirect(
            jar,
            "Password changed successfully",
            "success",
            "/settings",
        )),
        Err(e) => flash_or_fail(jar, e, "/change_password"),
    }
}

async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    match accounts::delete_user(&state.db.pool, auth.user.id).await {
        Ok(()) => Ok(flash_redirect(
            clear_session(jar),
            "Account deleted successfully.",
            "info",
            "/",
        )),
        Err(e) => flash_or_fail(jar, e, "/settings"),
    }
}
