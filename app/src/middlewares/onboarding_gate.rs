use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::{
    core::state::AppState,
    middlewares::auth::{refresh_if_stale, resolve_session},
    utils::response::APIError,
};

pub const HOME_PATH: &str = "/";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const SIGNIN_PATH: &str = "/signin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    RedirectToOnboarding,
    RedirectToHome,
    RequireSignIn,
}

/// Paths the gate guards: `/`, `/groups`, `/groups/*` and `/onboarding`.
pub fn is_gated_path(path: &str) -> bool {
    path == HOME_PATH
        || path == ONBOARDING_PATH
        || path == "/groups"
        || path.starts_with("/groups/")
}

/// Gate transition for one request. `onboarded` is `None` without a session.
pub fn decide(onboarded: Option<bool>, path: &str) -> GateDecision {
    if !is_gated_path(path) {
        return GateDecision::Pass;
    }

    match onboarded {
        None => GateDecision::RequireSignIn,
        Some(false) if path != ONBOARDING_PATH => GateDecision::RedirectToOnboarding,
        Some(true) if path == ONBOARDING_PATH => GateDecision::RedirectToHome,
        Some(_) => GateDecision::Pass,
    }
}

/// Rewrite the path of `uri`, keeping its query string.
fn redirect_target(path: &str, uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

fn signin_target(uri: &Uri) -> String {
    let callback = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(HOME_PATH);

    format!(
        "{}?callbackUrl={}",
        SIGNIN_PATH,
        urlencoding::encode(callback)
    )
}

pub async fn onboarding_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !is_gated_path(&path) {
        return next.run(request).await;
    }

    let session = match resolve_session(&state, request.headers()).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to resolve session user: {}", e);
            return APIError::InternalServerError("Failed to load session".to_string())
                .into_response();
        }
    };

    let Some((claims, user)) = session else {
        return Redirect::temporary(&signin_target(request.uri())).into_response();
    };

    let response = match decide(Some(user.onboarded), &path) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectToOnboarding => {
            Redirect::temporary(&redirect_target(ONBOARDING_PATH, request.uri())).into_response()
        }
        GateDecision::RedirectToHome => {
            Redirect::temporary(&redirect_target(HOME_PATH, request.uri())).into_response()
        }
        GateDecision::RequireSignIn => {
            Redirect::temporary(&signin_target(request.uri())).into_response()
        }
    };

    refresh_if_stale(&state, &claims, &user, response)
}
