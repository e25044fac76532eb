use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::Session;
use crate::errors::AppError;
use crate::models::{DesignRequestRecord, User};
use crate::state::AppState;

// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Session(session): Session,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.backend.fetch_profile(&session).await?))
}

// GET /api/profile/requests
#[derive(Deserialize)]
pub struct RequestsQuery {
    pub status: Option<String>,
}

pub async fn get_requests(
    State(state): State<Arc<AppState>>,
    Session(session): Session,
    Query(query): Query<RequestsQuery>,
) -> Result<Json<Vec<DesignRequestRecord>>, AppError> {
    // Requests are keyed by user id, which only the profile knows.
    let user = state.backend.fetch_profile(&session).await?;
    let mut requests = state.backend.fetch_user_requests(&session, user.id).await?;

    if let Some(status) = query.status.as_deref() {
        requests.retain(|r| r.status.as_str() == status);
    }

    Ok(Json(requests))
}
