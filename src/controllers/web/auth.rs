//! Home page, registration, user/admin login and logout.

use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::NaiveDate;
use serde::Deserialize;

use super::{flash_or_fail, flash_redirect, render};
use crate::error::AppError;
use crate::middleware::{clear_session, take_flash, write_session, FlashMessage, SessionData};
use crate::services::accounts::{self, NewUser};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/register_user", get(register_page).post(register_submit))
        .route("/user_login", get(login_page).post(login_submit))
        .route("/admin_login", get(admin_login_page).post(admin_login_submit))
        .route("/logout", get(logout))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    flash: Option<FlashMessage>,
}

async fn home(jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(IndexTemplate { flash })?))
}

#[derive(Template)]
#[template(path = "register_user.html")]
struct RegisterTemplate {
    flash: Option<FlashMessage>,
}

async fn register_page(jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(RegisterTemplate { flash })?))
}

#[derive(Debug, Deserialize)]
struct RegisterForm {
    fullname: String,
    username: String,
    email: String,
    password: String,
    dob: String,
    state: String,
}

async fn register_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    let dob = match form.dob.as_str() {
        "" => None,
        raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                return Ok(flash_redirect(
                    jar,
                    "Date of birth must be YYYY-MM-DD",
                    "danger",
                    "/register_user",
                ))
            }
        },
    };

    let new_user = NewUser {
        username: form.username,
        fullname: form.fullname,
        email: form.email,
        password: form.password,
        dob,
        state: (!form.state.is_empty()).then_some(form.state),
    };

    match accounts::register(&state.db.pool, new_user).await {
        Ok(_) => Ok(flash_redirect(
            jar,
            "Registration successful!",
            "success",
            "/user_login",
        )),
        Err(e) => flash_or_fail(jar, e, "/register_user"),
    }
}

#[derive(Template)]
#[template(path = "user_login.html")]
struct LoginTemplate {
    flash: Option<FlashMessage>,
}

async fn login_page(jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(LoginTemplate { flash })?))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    match accounts::authenticate(&state.db.pool, &form.username, &form.password).await {
        Ok(user) => {
            let jar = write_session(
                jar,
                &SessionData {
                    user_id: Some(user.id),
                    admin: false,
                },
            );
            Ok((jar, axum::response::Redirect::to("/user_dashboard")))
        }
        Err(AppError::Forbidden) => Ok(flash_redirect(
            jar,
            "Your account has been suspended",
            "danger",
            "/user_login",
        )),
        Err(AppError::Unauthorized) => Ok(flash_redirect(
            jar,
            "Invalid credentials",
            "danger",
            "/user_login",
        )),
        Err(e) => Err(e),
    }
}

#[derive(Template)]
#[template(path = "admin_login.html")]
struct AdminLoginTemplate {
    flash: Option<FlashMessage>,
}

async fn admin_login_page(jar: SignedCookieJar) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, render(AdminLoginTemplate { flash })?))
}

// The admin credential pair comes from config, not from the users table.
async fn admin_login_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let auth = &state.config.auth;
    if form.username == auth.admin_username && form.password == auth.admin_password {
        let jar = write_session(
            jar,
            &SessionData {
                user_id: None,
                admin: true,
            },
        );
        Ok((jar, axum::response::Redirect::to("/admin_dashboard")))
    } else {
        Ok(flash_redirect(
            jar,
            "Invalid admin credentials",
            "danger",
            "/admin_login",
        ))
    }
}

async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    flash_redirect(clear_session(jar), "You have been logged out", "info", "/")
}
