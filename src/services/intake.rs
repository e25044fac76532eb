use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::{
    EventType, FieldErrors, FormEvent, FormSnapshot, IntakeField, IntakeForm, Language, PhoneInfo,
    SubmissionStatus,
};
use crate::services::backend::{BackendApi, DesignRequestSubmission};
use crate::services::notify::{EmailNotifier, EmailTemplateParams};
use crate::services::phone::PhoneValidator;
use crate::services::session::SessionContext;
use crate::services::validation::validate_intake;

pub const NOT_LOGGED_IN: &str = "You must be logged in to submit a request.";
pub const SUBMISSION_FAILED: &str =
    "Something went wrong while sending your request. Please try again.";

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("you must be logged in to submit a request")]
    NotAuthenticated,

    #[error("the form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("a submission for this form is already in progress")]
    InFlight,

    #[error("the form was closed before the submission finished")]
    Cancelled,

    #[error("submission failed: {0}")]
    Remote(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FieldInputError {
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("event date must be YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
}

/// Collaborators shared by every form instance.
pub struct IntakeServices {
    pub backend: Arc<dyn BackendApi>,
    pub notifier: Arc<dyn EmailNotifier>,
    pub phones: PhoneValidator,
    pub reset_delay: Duration,
    pub to_name: String,
}

#[derive(Debug, Default)]
struct FormState {
    form: IntakeForm,
    errors: FieldErrors,
    phone_info: Option<PhoneInfo>,
    status: SubmissionStatus,
    open: bool,
}

/// One mounted intake form: its fields, errors, phone info and submission
/// status. Every instance owns its own state; nothing is shared between forms.
pub struct IntakeController {
    id: Uuid,
    language: Language,
    services: Arc<IntakeServices>,
    state: Mutex<FormState>,
    submitting: AtomicBool,
    /// Cancels the in-flight attempt, or the scheduled reset after success.
    pending: Mutex<Option<CancellationToken>>,
    events: broadcast::Sender<FormEvent>,
    /// Last user-driven change; the registry sweep evicts on this.
    touched: Mutex<Instant>,
}

/// Holds the in-flight flag for one attempt. Dropping the submit future
/// before it settles still releases the form for a retry.
struct Attempt<'a> {
    form: &'a IntakeController,
    settled: bool,
}

impl Attempt<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        self.form.submitting.store(false, Ordering::SeqCst);
        if !self.settled {
            self.form.lock_pending().take();
            tracing::warn!(form_id = %self.form.id, "submission dropped before it settled");
            self.form.publish(None);
        }
    }
}

impl IntakeController {
    pub fn new(language: Language, services: Arc<IntakeServices>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            language,
            services,
            state: Mutex::new(FormState {
                open: true,
                ..Default::default()
            }),
            submitting: AtomicBool::new(false),
            pending: Mutex::new(None),
            events,
            touched: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn touch(&self) {
        match self.touched.lock() {
            Ok(mut t) => *t = Instant::now(),
            Err(poisoned) => *poisoned.into_inner() = Instant::now(),
        }
    }

    /// Time since the last field change, validation, submit, open or close.
    pub fn idle_for(&self) -> Duration {
        match self.touched.lock() {
            Ok(t) => t.elapsed(),
            Err(poisoned) => poisoned.into_inner().elapsed(),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();
        FormSnapshot {
            id: self.id,
            open: state.open,
            language: self.language,
            form: state.form.clone(),
            errors: state.errors.clone(),
            phone_info: state.phone_info.clone(),
            status: state.status,
            submitting: self.is_submitting(),
        }
    }

    fn publish(&self, message: Option<&str>) {
        let (status, open) = {
            let state = self.lock();
            (state.status, state.open)
        };
        // No subscribers is the common case.
        let _ = self.events.send(FormEvent {
            form_id: self.id,
            status,
            submitting: self.is_submitting(),
            open,
            message: message.map(str::to_string),
        });
    }

    /// Applies one keystroke's worth of input. The phone field is
    /// re-validated on every change so the panel can show live feedback.
    pub fn update_field(
        &self,
        field: IntakeField,
        value: String,
    ) -> Result<FormSnapshot, FieldInputError> {
        let event_type = match field {
            IntakeField::EventType if !value.trim().is_empty() => Some(
                EventType::parse(&value)
                    .ok_or_else(|| FieldInputError::UnknownEventType(value.clone()))?,
            ),
            _ => None,
        };
        let event_date = match field {
            IntakeField::EventDate if !value.trim().is_empty() => Some(
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map_err(|_| FieldInputError::InvalidDate(value.clone()))?,
            ),
            _ => None,
        };

        self.touch();
        {
            let mut state = self.lock();
            state.errors.clear(field);
            match field {
                IntakeField::Name => state.form.name = value,
                IntakeField::Company => state.form.company = value,
                IntakeField::Email => state.form.email = value,
                IntakeField::Description => state.form.description = value,
                IntakeField::EventType => state.form.event_type = event_type,
                IntakeField::EventDate => state.form.event_date = event_date,
                IntakeField::Phone => {
                    if value.trim().is_empty() {
                        state.phone_info = None;
                    } else {
                        let info = self.services.phones.validate(&value);
                        if info.is_valid {
                            state.errors.phone = None;
                            state.phone_info = Some(info);
                        } else {
                            state.errors.phone = info.error;
                            state.phone_info = None;
                        }
                    }
                    state.form.phone = value;
                }
            }
        }

        Ok(self.snapshot())
    }

    /// Runs the field validator and stores the result, the same way the
    /// submit button does before any network call.
    pub fn validate(&self) -> FieldErrors {
        self.touch();
        let mut state = self.lock();
        let errors = validate_intake(&state.form, self.language, &self.services.phones);
        let phone_info = if state.form.phone.trim().is_empty() {
            None
        } else {
            Some(self.services.phones.validate(&state.form.phone)).filter(|info| info.is_valid)
        };
        state.phone_info = phone_info;
        state.errors = errors.clone();
        errors
    }

    /// Sends the form to the content API and then the notification email.
    ///
    /// Both must succeed for `success`; on any failure the fields are kept so
    /// the user can retry. Closing the form cancels the attempt.
    pub async fn submit(
        self: &Arc<Self>,
        session: &SessionContext,
    ) -> Result<FormSnapshot, SubmitError> {
        self.touch();
        if !session.is_authenticated() {
            {
                let mut state = self.lock();
                state.status = SubmissionStatus::Error;
                state.errors.form = Some(NOT_LOGGED_IN.to_string());
            }
            self.publish(Some(NOT_LOGGED_IN));
            return Err(SubmitError::NotAuthenticated);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            tracing::debug!(form_id = %self.id, invalid = errors.len(), "submit blocked by validation");
            return Err(SubmitError::Invalid(errors));
        }

        // A successful attempt stays in `success` until its reset fires;
        // treat a second click in that window as a duplicate too.
        if self.lock().status == SubmissionStatus::Success
            || self
                .submitting
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let attempt = Attempt {
            form: self,
            settled: false,
        };

        let cancel = CancellationToken::new();
        *self.lock_pending() = Some(cancel.clone());

        let (request, params) = {
            let mut state = self.lock();
            state.status = SubmissionStatus::Idle;
            (
                DesignRequestSubmission::new(&state.form, state.phone_info.as_ref()),
                EmailTemplateParams::new(
                    &state.form,
                    state.phone_info.as_ref(),
                    &self.services.to_name,
                ),
            )
        };
        self.publish(None);

        tracing::info!(form_id = %self.id, company = %request.company, "submitting design request");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.deliver(session, &request, &params) => Some(result),
        };
        attempt.settle();

        match outcome {
            None => {
                tracing::info!(form_id = %self.id, "submission abandoned, form closed");
                self.publish(None);
                Err(SubmitError::Cancelled)
            }
            Some(Ok(())) => {
                {
                    let mut state = self.lock();
                    state.status = SubmissionStatus::Success;
                    state.errors.form = None;
                }
                self.publish(None);
                self.schedule_reset(cancel);
                Ok(self.snapshot())
            }
            Some(Err(e)) => {
                tracing::error!(form_id = %self.id, error = %format!("{e:#}"), "submission failed");
                self.lock_pending().take();
                {
                    let mut state = self.lock();
                    state.status = SubmissionStatus::Error;
                    state.errors.form = Some(SUBMISSION_FAILED.to_string());
                }
                self.publish(Some(SUBMISSION_FAILED));
                Err(SubmitError::Remote(format!("{e:#}")))
            }
        }
    }

    /// REST first; the email only goes out once the backend has the request.
    async fn deliver(
        &self,
        session: &SessionContext,
        request: &DesignRequestSubmission,
        params: &EmailTemplateParams,
    ) -> anyhow::Result<()> {
        self.services
            .backend
            .submit_design_request(session, request)
            .await
            .context("content API rejected the design request")?;
        self.services
            .notifier
            .send(params)
            .await
            .context("notification email failed")?;
        Ok(())
    }

    fn schedule_reset(self: &Arc<Self>, cancel: CancellationToken) {
        let form = Arc::downgrade(self);
        let delay = self.services.reset_delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(form) = form.upgrade() {
                        form.reset();
                    }
                }
            }
        });
    }

    /// Clears fields, errors and phone info, closes the panel and returns the
    /// status to idle.
    fn reset(&self) {
        self.lock_pending().take();
        {
            let mut state = self.lock();
            *state = FormState::default();
        }
        tracing::debug!(form_id = %self.id, "form reset after successful submission");
        self.publish(None);
    }

    pub fn open(&self) -> FormSnapshot {
        self.touch();
        self.lock().open = true;
        self.publish(None);
        self.snapshot()
    }

    /// Closes the panel. An in-flight attempt is cancelled and its late
    /// result ignored; a pending post-success reset is applied right away.
    pub fn close(&self) -> FormSnapshot {
        self.touch();
        if let Some(token) = self.lock_pending().take() {
            token.cancel();
        }
        let succeeded = self.lock().status == SubmissionStatus::Success;
        if succeeded {
            self.reset();
        } else {
            self.lock().open = false;
            self.publish(None);
        }
        self.snapshot()
    }
}

/// Live form instances by id.
pub struct FormRegistry {
    services: Arc<IntakeServices>,
    forms: Mutex<HashMap<Uuid, Arc<IntakeController>>>,
}

impl FormRegistry {
    pub fn new(services: IntakeServices) -> Self {
        Self {
            services: Arc::new(services),
            forms: Mutex::new(HashMap::new()),
        }
    }

    pub fn services(&self) -> &IntakeServices {
        &self.services
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<IntakeController>>> {
        match self.forms.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn create(&self, language: Language) -> Arc<IntakeController> {
        let form = Arc::new(IntakeController::new(language, Arc::clone(&self.services)));
        self.lock().insert(form.id(), Arc::clone(&form));
        tracing::debug!(form_id = %form.id(), language = language.as_str(), "form opened");
        form
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<IntakeController>> {
        self.lock().get(id).cloned()
    }

    /// Drops the form, cancelling anything it still has running.
    pub fn discard(&self, id: &Uuid) -> bool {
        let removed = self.lock().remove(id);
        match removed {
            Some(form) => {
                form.close();
                true
            }
            None => false,
        }
    }

    /// Evicts forms nobody has touched for `idle_ttl`. A form with an attempt
    /// in flight is kept until it settles.
    pub fn sweep(&self, idle_ttl: Duration) -> usize {
        let expired: Vec<Arc<IntakeController>> = {
            let mut forms = self.lock();
            let ids: Vec<Uuid> = forms
                .values()
                .filter(|f| !f.is_submitting() && f.idle_for() >= idle_ttl)
                .map(|f| f.id())
                .collect();
            ids.iter().filter_map(|id| forms.remove(id)).collect()
        };
        for form in &expired {
            form.close();
        }
        if !expired.is_empty() {
            tracing::debug!(evicted = expired.len(), "expired idle forms");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
