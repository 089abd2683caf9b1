//! User accounts: registration, login checks, profile and admin actions.

use bcrypt::DEFAULT_COST;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::spot::STATUS_AVAILABLE;
use crate::models::User;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub dob: Option<NaiveDate>,
    pub state: Option<String>,
}

/// Registers a user. Duplicate username/email is reported as a conflict
/// via the unique constraints on the users table.
pub async fn register(pool: &SqlitePool, new_user: NewUser) -> Result<User, AppError> {
    let password_hash = bcrypt::hash(&new_user.password, DEFAULT_COST)?;

    let result = sqlx::query(
        "INSERT INTO users (username, fullname, email, password_hash, dob, state)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&new_user.username)
    .bind(&new_user.fullname)
    .bind(&new_user.email)
    .bind(&password_hash)
    .bind(new_user.dob)
    .bind(&new_user.state)
    .execute(pool)
    .await
    .map_err(AppError::from_registration)?;

    let user = User::find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or(AppError::NotFound("user"))?;
    tracing::info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Credential check for the login form. Banned users are rejected even
/// with a correct password.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = User::find_by_username(pool, username).await?;
    match user {
        Some(user) if user.verify_password(password) => {
            if user.is_banned {
                return Err(AppError::Forbidden);
            }
            Ok(user)
        }
        _ => Err(AppError::Unauthorized),
    }
}

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    username: &str,
    email: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET username = $1, email = $2 WHERE id = $3")
        .bind(username)
        .bind(email)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(AppError::from_registration)?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}

pub async fn change_password(
    pool: &SqlitePool,
    user_id: i64,
    new_password: &str,
) -> Result<(), AppError> {
    let password_hash = bcrypt::hash(new_password, DEFAULT_COST)?;
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}

/// Deletes a user together with their reservations. Spots held by the
/// user's active reservations are freed so they do not stay occupied
/// forever.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(AppError::NotFound("user"));
    }

    sqlx::query(
        "UPDATE parking_spots SET status = $1 WHERE id IN (
             SELECT spot_id FROM reservations
             WHERE user_id = $2 AND leaving_timestamp IS NULL
         )",
    )
    .bind(STATUS_AVAILABLE)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM reservations WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(user_id, "user deleted");
    Ok(())
}

/// Flips the ban flag; returns the new value.
pub async fn toggle_ban(pool: &SqlitePool, user_id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let banned = sqlx::query_scalar::<_, bool>("SELECT is_banned FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    sqlx::query("UPDATE users SET is_banned = $1 WHERE id = $2")
        .bind(!banned)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(!banned)
}
