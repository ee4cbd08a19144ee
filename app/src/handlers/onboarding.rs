use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    middlewares::auth::{issue_session_cookie, Session},
    repos::users::UsersRepo,
    services::onboarding::OnboardingSubmission,
    utils::response::{APIError, APIResponse},
};

/// `POST /api/onboarding`
///
/// Order of checks: session (401), JSON body (400), required fields and
/// birthday (400), user lookup by session email (404).
pub async fn submit_onboarding(
    State(state): State<Arc<AppState>>,
    Session(claims): Session,
    body: Bytes,
) -> Result<Response, APIError> {
    let submission: OnboardingSubmission = serde_json::from_slice(&body)
        .map_err(|_| APIError::BadRequest("Invalid JSON body".to_string()))?;

    let profile = submission
        .validate()
        .map_err(|e| APIError::BadRequest(e.to_string()))?;

    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo
        .find_by_email(&claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to look up user {}: {}", claims.sub, e);
            APIError::InternalServerError("Failed to look up user".to_string())
        })?
        .ok_or_else(|| APIError::NotFound("User not found".to_string()))?;

    let user = users_repo
        .complete_onboarding(&user.id, profile.name, profile.birthday, profile.address)
        .await
        .map_err(|e| {
            error!("Failed to save onboarding for {}: {}", user.id, e);
            APIError::InternalServerError("Failed to save onboarding".to_string())
        })?;

    info!("User onboarded: {}", user.id);

    let mut response = APIResponse::OK.into_response();
    if let Some(cookie) = issue_session_cookie(&state, &user) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}
