use crate::models::{
    FieldErrors, IntakeForm, Language, LoginErrors, LoginForm, PasswordStrength,
    RegistrationErrors, RegistrationForm, StrengthLabel,
};
use crate::services::phone::PhoneValidator;

pub const INVALID_EMAIL: &str = "Invalid email format";

/// Maps an intake form to its per-field errors. Pure; an empty result means
/// the form can be submitted.
pub fn validate_intake(
    form: &IntakeForm,
    language: Language,
    phones: &PhoneValidator,
) -> FieldErrors {
    let required = || Some(language.required_message().to_string());
    let mut errors = FieldErrors::default();

    if form.name.trim().is_empty() {
        errors.name = required();
    }
    if form.company.trim().is_empty() {
        errors.company = required();
    }

    if form.email.trim().is_empty() {
        errors.email = required();
    } else if !looks_like_email(&form.email) {
        errors.email = Some(INVALID_EMAIL.to_string());
    }

    if form.phone.trim().is_empty() {
        errors.phone = required();
    } else {
        let info = phones.validate(&form.phone);
        if !info.is_valid {
            errors.phone = info.error;
        }
    }

    if form.event_type.is_none() {
        errors.event_type = required();
    }
    if form.description.trim().is_empty() {
        errors.description = required();
    }

    errors
}

/// `\S+@\S+\.\S+` anywhere in the string.
pub fn looks_like_email(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars.iter().enumerate().any(|(i, c)| {
        if *c != '@' || i == 0 || chars[i - 1].is_whitespace() {
            return false;
        }
        let domain: Vec<char> = chars[i + 1..]
            .iter()
            .take_while(|c| !c.is_whitespace())
            .copied()
            .collect();
        domain
            .iter()
            .enumerate()
            .any(|(j, c)| *c == '.' && j > 0 && j + 1 < domain.len())
    })
}

pub fn validate_login(form: &LoginForm) -> LoginErrors {
    let mut errors = LoginErrors::default();

    if form.email.is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !looks_like_email(&form.email) {
        errors.email = Some("Please enter a valid email address".to_string());
    }

    if form.password.is_empty() {
        errors.password = Some("Password is required".to_string());
    } else if form.password.chars().count() < 6 {
        errors.password = Some("Password must be at least 6 characters".to_string());
    }

    errors
}

pub fn validate_registration(form: &RegistrationForm) -> RegistrationErrors {
    let mut errors = RegistrationErrors::default();

    if form.username.is_empty() {
        errors.username = Some("Username is required".to_string());
    } else if form.username.chars().count() < 3 {
        errors.username = Some("Username must be at least 3 characters".to_string());
    }

    if form.email.is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !looks_like_email(&form.email) {
        errors.email = Some("Please enter a valid email address".to_string());
    }

    if form.password.is_empty() {
        errors.password = Some("Password is required".to_string());
    } else if form.password.chars().count() < 8 {
        errors.password = Some("Password must be at least 8 characters".to_string());
    }

    if form.confirm_password.is_empty() {
        errors.confirm_password = Some("Please confirm your password".to_string());
    } else if form.password != form.confirm_password {
        errors.confirm_password = Some("Passwords do not match".to_string());
    }

    errors
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|ok| **ok).count() as u8;
    let label = match score {
        0..=2 => StrengthLabel::Weak,
        3 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    };
    PasswordStrength { score, label }
}
