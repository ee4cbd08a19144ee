use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{core::state::AppState, handlers::health::db_health};

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/db", get(db_health))
}
