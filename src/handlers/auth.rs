use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::Session;
use crate::errors::AppError;
use crate::models::{AuthSession, LoginForm, PasswordStrength, RegistrationForm};
use crate::services::backend::ApiError;
use crate::services::validation::{
    password_strength as score_password, validate_login, validate_registration,
};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<serde_json::Value>,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

/// Credential problems come back as 400/401 from the content API; anything
/// else is an outage.
fn credential_error(err: ApiError, message: &str) -> AppError {
    match err {
        ApiError::Unauthorized | ApiError::Status { status: 400..=499, .. } => {
            tracing::info!(error = %err, "credentials rejected");
            AppError::Unauthorized(message.to_string())
        }
        other => other.into(),
    }
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> Result<Json<AuthResponse>, AppError> {
    let errors = validate_login(&form);
    if !errors.is_empty() {
        return Err(AppError::Validation(
            serde_json::to_value(errors).unwrap_or_default(),
        ));
    }

    let session = state
        .backend
        .login(&form.email, &form.password)
        .await
        .map_err(|e| credential_error(e, "Invalid email or password"))?;

    tracing::info!("user logged in");
    Ok(Json(session.into()))
}

// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegistrationForm>,
) -> Result<Json<AuthResponse>, AppError> {
    let errors = validate_registration(&form);
    if !errors.is_empty() {
        return Err(AppError::Validation(
            serde_json::to_value(errors).unwrap_or_default(),
        ));
    }

    let session = state.backend.register(&form).await.map_err(|e| match e {
        ApiError::Status { status: 400..=499, .. } => {
            tracing::info!(error = %e, "registration rejected");
            AppError::BadInput("Registration failed. Please try again.".to_string())
        }
        other => other.into(),
    })?;

    tracing::info!(username = %form.username, "user registered");
    Ok(Json(session.into()))
}

// POST /api/auth/social
#[derive(Deserialize)]
pub struct SocialLogin {
    pub access_token: String,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    "google".to_string()
}

pub async fn social_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SocialLogin>,
) -> Result<Json<AuthResponse>, AppError> {
    if body.access_token.trim().is_empty() {
        return Err(AppError::BadInput("access_token is required".to_string()));
    }

    let session = state
        .backend
        .social_login(&body.provider, &body.access_token)
        .await
        .map_err(|e| credential_error(e, "Sign-in with provider failed"))?;

    tracing::info!(provider = %body.provider, "user logged in via provider");
    Ok(Json(session.into()))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Session(session): Session,
) -> Json<serde_json::Value> {
    if session.is_authenticated() {
        if let Err(e) = state.backend.logout(&session).await {
            tracing::warn!(error = %e, "remote logout failed, clearing session anyway");
        }
    }
    session.clear();
    Json(serde_json::json!({ "ok": true }))
}

// POST /api/auth/password-strength
#[derive(Deserialize)]
pub struct PasswordBody {
    #[serde(default)]
    pub password: String,
}

pub async fn password_strength(Json(body): Json<PasswordBody>) -> Json<PasswordStrength> {
    Json(score_password(&body.password))
}
