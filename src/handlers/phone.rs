use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::models::PhoneInfo;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

// POST /api/phone/validate
pub async fn validate_phone(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PhoneRequest>,
) -> Json<PhoneInfo> {
    Json(state.forms.services().phones.validate(&body.phone))
}
