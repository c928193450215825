//! HTTP front end: a single generation page plus the JSON endpoints it calls.

mod errors;
pub mod handlers;
pub mod page;
pub mod types;

use crate::{error::CanvasError, pipeline::Pipeline};
use actix_web::{web, App, HttpServer};

/// Request bodies are small; responses carry the images.
const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub struct AppState {
    pub pipeline: Pipeline,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, _req| CanvasError::InvalidRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health))
    .route("/api/sizes", web::get().to(handlers::sizes))
    .route("/api/generate", web::post().to(handlers::generate));
}

pub async fn serve(pipeline: Pipeline, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(AppState { pipeline });

    log::info!("🌐 Listening on http://0.0.0.0:{}", port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
