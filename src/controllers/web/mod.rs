//! Server-rendered HTML surface: session-cookie auth, form input, flash
//! messages. Mutating handlers redirect after POST in the classic
//! flash-then-redirect style.

pub mod account;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod lots;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use axum_extra::extract::cookie::SignedCookieJar;

use crate::error::AppError;
use crate::middleware::{flash, FlashMessage};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(dashboard::routes())
        .merge(lots::routes())
        .merge(bookings::routes())
        .merge(account::routes())
}

pub(crate) fn render<T: Template>(template: T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

pub(crate) fn flash_redirect(
    jar: SignedCookieJar,
    message: &str,
    category: &str,
    target: &str,
) -> (SignedCookieJar, Redirect) {
    (flash(jar, message, category), Redirect::to(target))
}

/// User-facing errors become a flash message on `back`; everything else
/// propagates as a 500.
pub(crate) fn flash_or_fail(
    jar: SignedCookieJar,
    err: AppError,
    back: &str,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    if err.is_user_facing() {
        Ok(flash_redirect(jar, &err.to_string(), "danger", back))
    } else {
        Err(err)
    }
}

#[derive(Template)]
#[template(path = "forbidden.html")]
struct ForbiddenTemplate {
    flash: Option<FlashMessage>,
}

/// Server-rendered 403, for pages where acting on someone else's data
/// is a hard stop rather than a flash message.
pub(crate) fn forbidden_page() -> Result<Response, AppError> {
    let page = render(ForbiddenTemplate { flash: None })?;
    Ok((StatusCode::FORBIDDEN, page).into_response())
}
