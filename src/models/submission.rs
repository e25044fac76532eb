use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FieldErrors, IntakeForm, Language, PhoneInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }
}

/// Everything the panel renders for one form instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub id: Uuid,
    pub open: bool,
    pub language: Language,
    pub form: IntakeForm,
    pub errors: FieldErrors,
    pub phone_info: Option<PhoneInfo>,
    pub status: SubmissionStatus,
    pub submitting: bool,
}

/// Pushed to SSE subscribers whenever status or the in-flight flag changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEvent {
    pub form_id: Uuid,
    pub status: SubmissionStatus,
    pub submitting: bool,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
