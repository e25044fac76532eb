pub mod http;

use async_trait::async_trait;

use crate::models::{
    AuthSession, Client, DesignRequestRecord, IntakeForm, Language, PhoneInfo, Project,
    RegistrationForm, TeamMember, User,
};
use crate::services::session::SessionContext;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no session token")]
    NotAuthenticated,

    #[error("session token rejected")]
    Unauthorized,

    #[error("content API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// The multipart body the content API expects for a new design request.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignRequestSubmission {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub contact: String,
    pub event_type: String,
    pub event_date: String,
    pub details: String,
    pub phone_country: Option<String>,
    pub phone_country_code: Option<String>,
}

impl DesignRequestSubmission {
    pub fn new(form: &IntakeForm, phone_info: Option<&PhoneInfo>) -> Self {
        Self {
            name: form.name.clone(),
            company: form.company.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            contact: form.contact().to_string(),
            event_type: form
                .event_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            event_date: form.event_date_string(),
            details: form.description.clone(),
            phone_country: phone_info.map(|p| p.country.clone()),
            phone_country_code: phone_info.map(|p| p.country_code.clone()),
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("company", self.company.clone()),
            ("phone", self.phone.clone()),
            ("email", self.email.clone()),
            ("contact", self.contact.clone()),
            ("event_type", self.event_type.clone()),
            ("event_date", self.event_date.clone()),
            ("details", self.details.clone()),
        ];
        if let Some(country) = &self.phone_country {
            fields.push(("phone_country", country.clone()));
        }
        if let Some(code) = &self.phone_country_code {
            fields.push(("phone_country_code", code.clone()));
        }
        fields
    }
}

/// The hosted content API: design requests, auth, profile and site content.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn submit_design_request(
        &self,
        session: &SessionContext,
        request: &DesignRequestSubmission,
    ) -> Result<(), ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError>;

    async fn register(&self, form: &RegistrationForm) -> Result<AuthSession, ApiError>;

    async fn social_login(&self, provider: &str, access_token: &str)
        -> Result<AuthSession, ApiError>;

    async fn logout(&self, session: &SessionContext) -> Result<(), ApiError>;

    async fn fetch_profile(&self, session: &SessionContext) -> Result<User, ApiError>;

    async fn fetch_user_requests(
        &self,
        session: &SessionContext,
        user_id: i64,
    ) -> Result<Vec<DesignRequestRecord>, ApiError>;

    async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn fetch_team(&self, language: Language) -> Result<Vec<TeamMember>, ApiError>;

    async fn fetch_clients(&self) -> Result<Vec<Client>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use chrono::NaiveDate;

    #[test]
    fn test_fields_include_phone_metadata_when_known() {
        let form = IntakeForm {
            name: "Omar".to_string(),
            company: "Atlas".to_string(),
            phone: "+33 1 42 68 53 00".to_string(),
            email: "omar@atlas.example".to_string(),
            event_type: Some(EventType::TradeShow),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            description: "Pavilion".to_string(),
        };
        let info = PhoneInfo::verified("FR".to_string(), "33".to_string(), "142685300".to_string());

        let fields = DesignRequestSubmission::new(&form, Some(&info)).fields();
        let get = |k: &str| {
            fields
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("contact"), Some("+33 1 42 68 53 00"));
        assert_eq!(get("event_type"), Some("trade_show"));
        assert_eq!(get("event_date"), Some("2026-03-14"));
        assert_eq!(get("details"), Some("Pavilion"));
        assert_eq!(get("phone_country"), Some("FR"));
        assert_eq!(get("phone_country_code"), Some("33"));

        let without = DesignRequestSubmission::new(&form, None).fields();
        assert_eq!(without.len(), 8);
    }
}
