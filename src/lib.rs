pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

use axum_extra::extract::cookie::Key;
use axum::extract::FromRef;
use sha2::{Digest, Sha512};

// Shared state for the whole application. Cloned per request by the
// router, so every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub cookie_key: Key,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Self> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let cookie_key = derive_cookie_key(&config.auth.secret_key);
        Ok(Self {
            db,
            config,
            cookie_key,
        })
    }
}

// SECRET_KEY can be any length; stretch it to the 64 bytes the cookie key needs.
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
