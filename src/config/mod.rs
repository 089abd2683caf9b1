use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Session signing secret plus the built-in admin credential pair.
// The admin role is a session flag, not a users row.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret_key: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "parking_system=debug,tower_http=debug".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://parking_management.db".to_string()),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            auth: AuthConfig {
                secret_key: env::var("SECRET_KEY")
                    .unwrap_or_else(|_| "change-me-in-production".to_string()),
                admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                admin_password: env::var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| "unique1234".to_string()),
            },
        }
    }
}
