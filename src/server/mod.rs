//! HTTP surface: the couplet API plus the small static site around it.

pub mod cors;
pub mod generate;
pub mod mime;
pub mod response;
pub mod site;
pub mod static_files;

use crate::ai::CoupletService;
use crate::config::Config;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;

pub const GENERATE_PATH: &str = "/api/generate";

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub config: Config,
    pub couplets: Arc<dyn CoupletService>,
}

pub fn get_app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            GENERATE_PATH,
            post(generate::generate)
                .options(generate::preflight)
                .fallback(generate::method_not_allowed),
        )
        .layer(middleware::map_response(cors::add_cors));

    Router::new()
        .route("/", get(site::index).fallback(site::fallback))
        .route("/healthz", get(site::health).fallback(site::fallback))
        .route("/check", get(site::health).fallback(site::fallback))
        .merge(api)
        .fallback(site::fallback)
        .with_state(state)
}
