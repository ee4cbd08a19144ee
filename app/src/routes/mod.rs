pub mod auth;
pub mod health;
pub mod onboarding;
pub mod pages;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::{
    core::state::AppState,
    routes::{
        auth::auth_routes, health::health_routes, onboarding::onboarding_routes,
        pages::page_routes,
    },
    utils::global_error_handler::global_error_handler,
};

pub fn create_routers(state: Arc<AppState>) -> Router<()> {
    let mut api_routes = Router::new()
        .nest("/auth", auth_routes())
        .nest("/onboarding", onboarding_routes())
        .nest("/health", health_routes());

    if let Some(cors) = cors_layer(state.config.cors_origin.as_deref()) {
        api_routes = api_routes.layer(cors);
    }

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes(state.clone()))
        .fallback(global_error_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let origin = match HeaderValue::from_str(origin) {
        Ok(origin) => origin,
        Err(e) => {
            warn!("Ignoring invalid CORS_ORIGIN {}: {}", origin, e);
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}
