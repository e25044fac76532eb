pub mod emailjs;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{IntakeForm, PhoneInfo};

/// Parameter names of the studio's "new design request" email template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplateParams {
    pub from_name: String,
    pub from_company: String,
    pub from_phone: String,
    pub from_email: String,
    pub event_type: String,
    pub event_date: String,
    pub message: String,
    pub phone_country: String,
    pub phone_country_code: String,
    pub to_name: String,
    pub timestamp: String,
}

impl EmailTemplateParams {
    pub fn new(form: &IntakeForm, phone_info: Option<&PhoneInfo>, to_name: &str) -> Self {
        let non_empty = |s: &str, default: &str| {
            if s.is_empty() {
                default.to_string()
            } else {
                s.to_string()
            }
        };
        Self {
            from_name: form.name.clone(),
            from_company: form.company.clone(),
            from_phone: form.phone.clone(),
            from_email: form.email.clone(),
            event_type: form
                .event_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            event_date: form.event_date_string(),
            message: form.description.clone(),
            phone_country: non_empty(
                phone_info.map(|p| p.country.as_str()).unwrap_or(""),
                "Unknown",
            ),
            phone_country_code: non_empty(
                phone_info.map(|p| p.country_code.as_str()).unwrap_or(""),
                "N/A",
            ),
            to_name: to_name.to_string(),
            timestamp: chrono::Local::now()
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
        }
    }
}

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(&self, params: &EmailTemplateParams) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_phone_info() {
        let form = IntakeForm {
            name: "Rania".to_string(),
            description: "Museum fit-out".to_string(),
            ..Default::default()
        };
        let params = EmailTemplateParams::new(&form, None, "Nijara Team");
        assert_eq!(params.phone_country, "Unknown");
        assert_eq!(params.phone_country_code, "N/A");
        assert_eq!(params.message, "Museum fit-out");
        assert_eq!(params.to_name, "Nijara Team");
        assert!(!params.timestamp.is_empty());

        // The length-only fallback leaves the calling code empty.
        let info = PhoneInfo::unverified("0508123947".to_string());
        let params = EmailTemplateParams::new(&form, Some(&info), "Nijara Team");
        assert_eq!(params.phone_country, "Unknown");
        assert_eq!(params.phone_country_code, "N/A");
    }
}
