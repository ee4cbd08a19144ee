use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::Response,
};
use sea_orm::DbErr;
use tracing::{debug, error};

use crate::{
    core::state::AppState,
    models::user::Model as User,
    repos::users::UsersRepo,
    utils::{
        cookies::{read_session_token, session_cookie},
        jwt::{create_session_token, verify_session_token, SessionClaims},
        response::APIError,
    },
};

/// Extractor for a request carrying a valid session token.
///
/// Only the token is checked; use [`resolve_session`] when the stored user
/// record is needed.
pub struct Session(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = APIError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_claims(&parts.headers, &state.config.session_secret)
            .map(Session)
            .ok_or(APIError::UnAuthorized)
    }
}

/// Verified claims from the request's session token, if any.
pub fn session_claims(headers: &HeaderMap, secret: &str) -> Option<SessionClaims> {
    let token = read_session_token(headers)?;

    match verify_session_token(&token, secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Ignoring invalid session token: {}", e);
            None
        }
    }
}

/// Resolve the session and read its user fresh from the store.
///
/// A token whose user no longer exists counts as no session.
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<(SessionClaims, User)>, DbErr> {
    let Some(claims) = session_claims(headers, &state.config.session_secret) else {
        return Ok(None);
    };

    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo.find_by_id(&claims.id).await?;

    Ok(user.map(|user| (claims, user)))
}

/// `Set-Cookie` value carrying a fresh token for `user`.
pub fn issue_session_cookie(state: &AppState, user: &User) -> Option<HeaderValue> {
    let token = match create_session_token(
        user,
        &state.config.session_secret,
        state.config.session_max_age_days,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to create session token: {}", e);
            return None;
        }
    };

    session_cookie(
        &token,
        state.config.session_max_age_days,
        state.config.cookie_secure,
    )
}

/// Re-issue the session cookie when the token's onboarded flag is stale.
pub fn refresh_if_stale(
    state: &AppState,
    claims: &SessionClaims,
    user: &User,
    mut response: Response,
) -> Response {
    if claims.onboarded != user.onboarded {
        if let Some(cookie) = issue_session_cookie(state, user) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }

    response
}
