use serde::{Deserialize, Serialize};

/// Why a phone number was rejected. Shown to users only through `message()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRejection {
    NoDigits,
    TooShort,
    TooLong,
    FakeOrTest,
    InvalidFormat,
}

impl PhoneRejection {
    pub fn message(&self) -> &'static str {
        match self {
            PhoneRejection::NoDigits => "Phone number must contain digits",
            PhoneRejection::TooShort => "Phone number is too short",
            PhoneRejection::TooLong => "Phone number is too long",
            PhoneRejection::FakeOrTest => "This appears to be a fake or test phone number",
            PhoneRejection::InvalidFormat => "Invalid phone number format",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneInfo {
    pub country: String,
    pub country_code: String,
    pub national_number: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PhoneRejection>,
    /// True only when the numbering-plan parse accepted the number.
    pub verified: bool,
}

impl PhoneInfo {
    pub fn rejected(reason: PhoneRejection) -> Self {
        Self {
            country: String::new(),
            country_code: String::new(),
            national_number: String::new(),
            is_valid: false,
            error: Some(reason.message().to_string()),
            reason: Some(reason),
            verified: false,
        }
    }

    pub fn verified(country: String, country_code: String, national_number: String) -> Self {
        Self {
            country,
            country_code,
            national_number,
            is_valid: true,
            error: None,
            reason: None,
            verified: true,
        }
    }

    pub fn unverified(digits: String) -> Self {
        Self {
            country: "Unknown".to_string(),
            country_code: String::new(),
            national_number: digits,
            is_valid: true,
            error: None,
            reason: None,
            verified: false,
        }
    }
}
