use std::sync::Arc;

use axum::{routing::post, Router};

use crate::{core::state::AppState, handlers::onboarding::submit_onboarding};

pub fn onboarding_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(submit_onboarding))
}
