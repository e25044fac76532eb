pub mod auth;
pub mod content;
pub mod forms;
pub mod health;
pub mod phone;
pub mod profile;

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::models::Language;
use crate::services::session::SessionContext;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/phone/validate", post(phone::validate_phone))
        .route("/api/forms", post(forms::create_form))
        .route(
            "/api/forms/:id",
            get(forms::get_form).delete(forms::discard_form),
        )
        .route("/api/forms/:id/fields", put(forms::update_field))
        .route("/api/forms/:id/validate", post(forms::validate_form))
        .route("/api/forms/:id/submit", post(forms::submit_form))
        .route("/api/forms/:id/open", post(forms::open_form))
        .route("/api/forms/:id/close", post(forms::close_form))
        .route("/api/forms/:id/events", get(forms::events_stream))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/social", post(auth::social_login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/password-strength", post(auth::password_strength))
        .route("/api/profile", get(profile::get_profile))
        .route("/api/profile/requests", get(profile::get_requests))
        .route("/api/content/projects", get(content::get_projects))
        .route("/api/content/team", get(content::get_team))
        .route("/api/content/clients", get(content::get_clients))
        .with_state(state)
}

/// The caller's session, built from the `Authorization` header.
pub struct Session(pub SessionContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(Session(SessionContext::from_authorization(header)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// `?lang=` wins, then `Accept-Language`, then the configured default.
pub fn resolve_language(query: &LangQuery, headers: &HeaderMap, default: Language) -> Language {
    query
        .lang
        .as_deref()
        .and_then(Language::parse)
        .or_else(|| {
            headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|v| Language::parse(v.split(';').next().unwrap_or("")))
        })
        .unwrap_or(default)
}
