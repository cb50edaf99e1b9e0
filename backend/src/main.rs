mod app;
mod bootstrap;
mod config;
mod error;
mod services;
mod store;

use crate::app::state::AppState;
use crate::config::Settings;
use crate::store::{Store, STATUS_CHECKS};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::io;

/// Builds the CORS policy from the configured origin list. A `*` anywhere in
/// the list allows any origin and makes the other entries irrelevant.
fn cors_policy(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials();
    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| io::Error::other(e.to_string()))?;
    if settings.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set; fundraising updates will be refused");
    }

    let store = Store::open(&settings.store_url, &settings.db_name)
        .map_err(|e| io::Error::other(e.to_string()))?;
    bootstrap::init_fundraising_data(&store)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    let logged = store
        .collection(STATUS_CHECKS)
        .count()
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    info!("Store at {} holds {} status checks", store.location(), logged);

    let bind = settings.bind_address();
    let origins = settings.allowed_origins();
    let state = AppState::new(store.clone(), settings);
    info!("Application started on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_policy(&origins))
            .wrap(Logger::default())
            .app_data(services::json_config())
            .app_data(web::Data::new(state.clone()))
            .service(services::configure_routes())
    })
        .bind(bind)?
        .run()
        .await?;

    info!("Shutting down; releasing store at {}", store.location());
    store.close();
    Ok(())
}
