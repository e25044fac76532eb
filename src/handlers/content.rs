use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use super::{resolve_language, LangQuery};
use crate::errors::AppError;
use crate::models::{LocalizedClient, LocalizedMember, LocalizedProject};
use crate::services::content::{localize_clients, localize_projects, localize_team};
use crate::state::AppState;

// GET /api/content/projects
pub async fn get_projects(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<LocalizedProject>>, AppError> {
    let language = resolve_language(&query, &headers, state.config.default_language);
    let projects = state.backend.fetch_projects().await?;
    Ok(Json(localize_projects(
        &projects,
        language,
        &state.config.api_base_url,
    )))
}

// GET /api/content/team
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<LocalizedMember>>, AppError> {
    let language = resolve_language(&query, &headers, state.config.default_language);
    let members = state.backend.fetch_team(language).await?;
    Ok(Json(localize_team(
        &members,
        language,
        &state.config.api_base_url,
    )))
}

// GET /api/content/clients
pub async fn get_clients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LocalizedClient>>, AppError> {
    let clients = state.backend.fetch_clients().await?;
    Ok(Json(localize_clients(&clients, &state.config.api_base_url)))
}
