use std::{path::Path, sync::Arc};

use axum::{middleware, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::{core::state::AppState, middlewares::onboarding_gate::onboarding_gate};

/// Static pages. Everything except `/signin` sits behind the onboarding gate.
pub fn page_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let dir = Path::new(&state.config.static_dir).to_path_buf();

    let gated = Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .route_service("/groups", ServeFile::new(dir.join("groups.html")))
        .route_service("/groups/*rest", ServeFile::new(dir.join("groups.html")))
        .route_service("/onboarding", ServeFile::new(dir.join("onboarding.html")))
        .route_layer(middleware::from_fn_with_state(state, onboarding_gate));

    Router::new()
        .merge(gated)
        .route_service("/signin", ServeFile::new(dir.join("signin.html")))
        .nest_service("/static", ServeDir::new(dir))
}
