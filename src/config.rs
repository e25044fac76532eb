use std::env;
use std::time::Duration;

use crate::models::Language;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub api_base_url: String,
    pub emailjs_url: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub emailjs_private_key: String,
    pub notify_to_name: String,
    pub reset_delay_ms: u64,
    pub http_timeout_secs: u64,
    pub default_language: Language,
    pub phone_strict: bool,
    pub form_idle_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://n-backend-six.vercel.app".to_string()),
            emailjs_url: env::var("EMAILJS_URL")
                .unwrap_or_else(|_| "https://api.emailjs.com/api/v1.0/email/send".to_string()),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
            emailjs_private_key: env::var("EMAILJS_PRIVATE_KEY").unwrap_or_default(),
            notify_to_name: env::var("NOTIFY_TO_NAME")
                .unwrap_or_else(|_| "Nijara Team".to_string()),
            reset_delay_ms: env::var("RESET_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            default_language: env::var("DEFAULT_LANGUAGE")
                .ok()
                .and_then(|v| Language::parse(&v))
                .unwrap_or_default(),
            phone_strict: env::var("PHONE_STRICT")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            form_idle_ttl_secs: env::var("FORM_IDLE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
        }
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn form_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.form_idle_ttl_secs)
    }

    /// Missing EmailJS credentials are allowed at startup but every
    /// notification will then fail, so say so once.
    pub fn emailjs_configured(&self) -> bool {
        !self.emailjs_service_id.is_empty()
            && !self.emailjs_template_id.is_empty()
            && !self.emailjs_public_key.is_empty()
    }
}
