//! Session cookies, flash messages and the auth extractors for the HTML
//! surface.
//!
//! The session is one signed cookie holding the logged-in user id and the
//! admin flag; flash messages are a second signed cookie consumed on the
//! next page render.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::AppState;

const SESSION_COOKIE: &str = "session";
const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub admin: bool,
}

pub fn read_session(jar: &SignedCookieJar) -> SessionData {
    jar.get(SESSION_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

pub fn write_session(jar: SignedCookieJar, data: &SessionData) -> SignedCookieJar {
    let value = serde_json::to_string(data).unwrap_or_default();
    jar.add(
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .max_age(time::Duration::days(7))
            .build(),
    )
}

pub fn clear_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessage {
    pub message: String,
    pub category: String,
}

/// Queues a one-shot message for the next rendered page.
/// Categories map to banner styles: "success", "danger", "info".
pub fn flash(jar: SignedCookieJar, message: &str, category: &str) -> SignedCookieJar {
    let value = serde_json::to_string(&FlashMessage {
        message: message.to_string(),
        category: category.to_string(),
    })
    .unwrap_or_default();
    jar.add(Cookie::build((FLASH_COOKIE, value)).path("/").build())
}

/// Takes the pending flash message, removing it from the jar.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<FlashMessage>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok());
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
    (jar, message)
}

async fn signed_jar(parts: &mut Parts, state: &AppState) -> SignedCookieJar {
    match SignedCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    }
}

/// Redirect-to-login rejection carrying the jar so the flash cookie
/// survives the redirect.
pub struct LoginRedirect {
    jar: SignedCookieJar,
    target: &'static str,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        (self.jar, Redirect::to(self.target)).into_response()
    }
}

/// The logged-in user, loaded from the session cookie.
/// Missing or stale sessions redirect to the login page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = signed_jar(parts, state).await;
        let session = read_session(&jar);

        let reject = |jar| LoginRedirect {
            jar: flash(jar, "Please log in first", "danger"),
            target: "/user_login",
        };

        let Some(user_id) = session.user_id else {
            return Err(reject(jar));
        };
        let user = match User::find_by_id(&state.db.pool, user_id).await {
            Ok(Some(user)) if !user.is_banned => user,
            Ok(_) => return Err(reject(clear_session(jar))),
            Err(e) => {
                tracing::error!("session user lookup failed: {:?}", e);
                return Err(reject(jar));
            }
        };

        Ok(AuthUser { user })
    }
}

/// Marker extractor for admin-only pages; the admin role is a session
/// flag, not a users row.
#[derive(Debug, Clone)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = signed_jar(parts, state).await;
        if read_session(&jar).admin {
            Ok(AdminSession)
        } else {
            Err(LoginRedirect {
                jar: flash(jar, "Admin access required", "danger"),
                target: "/admin_login",
            })
        }
    }
}
