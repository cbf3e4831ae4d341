mod config;
mod error;
mod services;
mod store;
mod symbol;

use crate::config::AppConfig;
use crate::services::codes::pipeline::LogoOverlay;
use crate::store::backend::StoreBackend;
use crate::store::firebase::FirebaseStore;
use crate::store::gateway::StoreGateway;
use crate::store::memory::MemoryStore;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::sync::Arc;

/// Builds the store backend once at startup; the gateway handle built on
/// top of it is the only way the rest of the process reaches the store.
fn build_backend(config: &AppConfig) -> std::io::Result<Arc<dyn StoreBackend>> {
    match &config.store_url {
        Some(url) => {
            info!("using remote record store at {}", url);
            let store = FirebaseStore::new(url, config.store_auth.clone())
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("STORE_URL not set, records are kept in process memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Loads the branding overlay if the configured asset exists. Requests
/// asking for a logo fail cleanly when none is available.
fn load_logo(config: &AppConfig) -> LogoOverlay {
    match image::open(&config.logo_path) {
        Ok(logo) => {
            info!("loaded logo overlay from {}", config.logo_path);
            LogoOverlay { image: Some(logo) }
        }
        Err(e) => {
            warn!("no logo overlay available ({}): {}", config.logo_path, e);
            LogoOverlay { image: None }
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let gateway = StoreGateway::new(build_backend(&config)?);
    let overlay = web::Data::new(load_logo(&config));

    info!("server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(gateway.clone()))
            .app_data(overlay.clone())
            .service(services::codes::configure_routes())
            .service(services::records::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
