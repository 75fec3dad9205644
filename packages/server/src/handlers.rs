//! HTTP handler functions for the ois-map API.

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, web};
use ois_map_server_models::{ApiError, ApiHealth};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/incidents`
///
/// Fetches and normalizes the upstream dataset on every call. Any fetch
/// failure becomes a 500 with `{ "error": message }`.
pub async fn incidents(state: web::Data<AppState>) -> HttpResponse {
    match state.source.fetch_incidents().await {
        Ok(incidents) => {
            log::debug!(
                "Serving {} incidents from {}",
                incidents.len(),
                state.source.id()
            );
            HttpResponse::Ok()
                .insert_header(CacheControl(vec![CacheDirective::NoStore]))
                .json(incidents)
        }
        Err(e) => {
            log::error!("Failed to fetch incidents from {}: {e}", state.source.name());
            HttpResponse::InternalServerError().json(ApiError::new(e.to_string()))
        }
    }
}
