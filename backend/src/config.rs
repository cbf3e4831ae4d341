//! Process configuration, read from the environment once at startup.
//!
//! A `.env` file is honored when present. `STORE_URL` selects the remote
//! store backend; without it the service runs against the in-process
//! store, which is useful for local work but keeps nothing across
//! restarts.

use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the remote record store (Firebase-style realtime
    /// database). `None` selects the in-process store.
    pub store_url: Option<String>,
    /// Optional auth token appended to store requests.
    pub store_auth: Option<String>,
    /// Path of the branding overlay drawn by logo-enabled requests.
    pub logo_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        AppConfig {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(8080),
            store_url: env::var("STORE_URL").ok().filter(|url| !url.is_empty()),
            store_auth: env::var("STORE_AUTH").ok().filter(|t| !t.is_empty()),
            logo_path: env::var("LOGO_PATH").unwrap_or_else(|_| "static/logo.png".to_string()),
        }
    }
}
