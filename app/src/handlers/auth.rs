use std::sync::Arc;

use crate::{
    core::state::AppState,
    middlewares::{
        auth::{issue_session_cookie, refresh_if_stale, resolve_session},
        onboarding_gate::{HOME_PATH, SIGNIN_PATH},
    },
    utils::{
        cookies::{
            expired_cookie, oauth_state_cookie, parse_oauth_state, read_cookie,
            OAUTH_STATE_COOKIE, SESSION_COOKIE,
        },
        crypto::generate_state,
        response::{APIError, APIResponse},
    },
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInQuery {
    callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    id: String,
    email: String,
    name: Option<String>,
    image: Option<String>,
    onboarded: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    user: SessionUser,
    expires: String,
}

/// Only same-origin relative paths are honoured as post-login destinations.
pub fn safe_callback_url(callback_url: Option<&str>) -> String {
    match callback_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') => {
            url.to_string()
        }
        _ => HOME_PATH.to_string(),
    }
}

fn signin_error(code: &str) -> Response {
    Redirect::temporary(&format!("{}?error={}", SIGNIN_PATH, code)).into_response()
}

pub async fn google_signin(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SignInQuery>,
) -> Response {
    let oauth_state = generate_state();
    let callback_url = safe_callback_url(query.callback_url.as_deref());
    let auth_url = state.identity_provider.authorize_url(&oauth_state);

    let mut response = Redirect::temporary(&auth_url).into_response();
    if let Some(cookie) = oauth_state_cookie(&oauth_state, &callback_url, state.config.cookie_secure)
    {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GoogleCallbackQuery>,
) -> Response {
    if let Some(provider_error) = query.error {
        warn!("Google sign-in was not completed: {}", provider_error);
        return signin_error("AccessDenied");
    }

    let stored = read_cookie(&headers, OAUTH_STATE_COOKIE)
        .as_deref()
        .and_then(parse_oauth_state);

    let (code, callback_url) = match (query.code, query.state, stored) {
        (Some(code), Some(returned), Some((expected, callback_url))) if returned == expected => {
            (code, callback_url)
        }
        _ => {
            warn!("OAuth callback rejected: missing or mismatched state");
            return signin_error("OAuthCallback");
        }
    };

    let identity = match state.identity_provider.exchange_code(&code).await {
        Ok(identity) => identity,
        Err(e) => {
            error!("Failed to authenticate with Google: {}", e);
            return signin_error("OAuthCallback");
        }
    };

    let user = match state.auth_adapter().sign_in(identity).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to resolve signed-in user: {:#}", e);
            return signin_error("Callback");
        }
    };

    info!("User authenticated: {} ({})", user.id, user.email);

    let mut response =
        Redirect::temporary(&safe_callback_url(Some(callback_url.as_str()))).into_response();
    let response_headers = response.headers_mut();
    if let Some(cookie) = issue_session_cookie(&state, &user) {
        response_headers.append(header::SET_COOKIE, cookie);
    }
    if let Some(cookie) = expired_cookie(OAUTH_STATE_COOKIE, "/api/auth") {
        response_headers.append(header::SET_COOKIE, cookie);
    }

    response
}

pub async fn signout() -> Response {
    let mut response = APIResponse::OK.into_response();
    if let Some(cookie) = expired_cookie(SESSION_COOKIE, "/") {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

/// Current session with the onboarded flag read fresh, or `null`.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, APIError> {
    let session = resolve_session(&state, &headers).await.map_err(|e| {
        error!("Failed to resolve session user: {}", e);
        APIError::InternalServerError("Failed to load session".to_string())
    })?;

    let Some((claims, user)) = session else {
        return Ok(Json(Option::<SessionResponse>::None).into_response());
    };

    let body = SessionResponse {
        user: SessionUser {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
            onboarded: user.onboarded,
        },
        expires: claims
            .expires_at()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    };

    Ok(refresh_if_stale(
        &state,
        &claims,
        &user,
        Json(body).into_response(),
    ))
}
