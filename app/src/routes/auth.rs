use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::auth::{get_session, google_callback, google_signin, signout},
};

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signin/google", get(google_signin))
        .route("/callback/google", get(google_callback))
        .route("/signout", post(signout))
        .route("/session", get(get_session))
}
