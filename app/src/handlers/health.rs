use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::error;

use crate::{core::state::AppState, repos::users::UsersRepo, utils::response::APIError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbHealth {
    ok: bool,
    db: &'static str,
    user_count: u64,
    timestamp: String,
}

/// `GET /api/health/db`: runs a harmless count against the users table.
pub async fn db_health(State(state): State<Arc<AppState>>) -> Result<Json<DbHealth>, APIError> {
    let now = Utc::now();

    let user_count = UsersRepo::new(state.database.clone())
        .count()
        .await
        .map_err(|e| {
            error!("Database health check failed: {}", e);
            APIError::InternalServerError("Database unavailable".to_string())
        })?;

    Ok(Json(DbHealth {
        ok: true,
        db: "connected",
        user_count,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
