use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use super::{resolve_language, LangQuery, Session};
use crate::errors::AppError;
use crate::models::{FormEvent, FormSnapshot, IntakeField};
use crate::services::intake::IntakeController;
use crate::state::AppState;

const KEEPALIVE_PERIOD: Duration = Duration::from_secs(30);

fn find_form(state: &AppState, id: &Uuid) -> Result<Arc<IntakeController>, AppError> {
    state
        .forms
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("form {id}")))
}

// POST /api/forms
pub async fn create_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> impl IntoResponse {
    let language = resolve_language(&query, &headers, state.config.default_language);
    let form = state.forms.create(language);
    (StatusCode::CREATED, Json(form.snapshot()))
}

// GET /api/forms/:id
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormSnapshot>, AppError> {
    Ok(Json(find_form(&state, &id)?.snapshot()))
}

// PUT /api/forms/:id/fields
#[derive(Deserialize)]
pub struct FieldInput {
    pub field: IntakeField,
    #[serde(default)]
    pub value: String,
}

pub async fn update_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<FieldInput>,
) -> Result<Json<FormSnapshot>, AppError> {
    let form = find_form(&state, &id)?;
    Ok(Json(form.update_field(input.field, input.value)?))
}

// POST /api/forms/:id/validate
pub async fn validate_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let errors = find_form(&state, &id)?.validate();
    Ok(Json(serde_json::json!({
        "valid": errors.is_empty(),
        "errors": errors,
    })))
}

// POST /api/forms/:id/submit
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Session(session): Session,
) -> Result<Json<FormSnapshot>, AppError> {
    let form = find_form(&state, &id)?;
    let snapshot = form.submit(&session).await?;
    Ok(Json(snapshot))
}

// POST /api/forms/:id/open
pub async fn open_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormSnapshot>, AppError> {
    Ok(Json(find_form(&state, &id)?.open()))
}

// POST /api/forms/:id/close
pub async fn close_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormSnapshot>, AppError> {
    Ok(Json(find_form(&state, &id)?.close()))
}

// DELETE /api/forms/:id
pub async fn discard_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.forms.discard(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("form {id}")))
    }
}

// GET /api/forms/:id/events (SSE stream of status changes)
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let form = find_form(&state, &id)?;

    // Subscribe before reading the snapshot so nothing falls in between.
    let rx = form.subscribe();
    let snapshot = form.snapshot();
    let current = FormEvent {
        form_id: snapshot.id,
        status: snapshot.status,
        submitting: snapshot.submitting,
        open: snapshot.open,
        message: snapshot.errors.form.clone(),
    };

    let initial_stream = tokio_stream::once(Ok::<_, Infallible>(status_event(&current)));

    let live_stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(status_event(&event))),
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => None,
    });

    // First keepalive one period in, so the snapshot is always the first frame.
    let keepalive = tokio::time::interval_at(
        tokio::time::Instant::now() + KEEPALIVE_PERIOD,
        KEEPALIVE_PERIOD,
    );
    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(keepalive),
        |_| Ok(Event::default().comment("keepalive")),
    );

    let combined = initial_stream.chain(live_stream);
    let merged = StreamExt::merge(combined, keepalive_stream);

    Ok(Sse::new(merged))
}

fn status_event(event: &FormEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_default();
    Event::default().data(data).event("form_status")
}
