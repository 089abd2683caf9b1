//! JSON API for users. This surface is unauthenticated by design.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::User;
use crate::services::accounts::{self, NewUser};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(length(min = 1, max = 120))]
    fullname: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    password: String,
    dob: Option<NaiveDate>,
    state: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: i64,
    username: String,
    fullname: String,
    email: String,
    dob: Option<NaiveDate>,
    state: Option<String>,
    is_admin: bool,
    is_banned: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
            email: user.email,
            dob: user.dob,
            state: user.state,
            is_admin: user.is_admin,
            is_banned: user.is_banned,
        }
    }
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = accounts::register(
        &state.db.pool,
        NewUser {
            username: req.username,
            fullname: req.fullname,
            email: req.email,
            password: req.password,
            dob: req.dob,
            state: req.state,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = User::all(&state.db.pool).await?;
    let payload: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(payload))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(UserResponse::from(user)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    accounts::delete_user(&state.db.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
