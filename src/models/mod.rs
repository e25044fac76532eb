pub mod auth;
pub mod content;
pub mod intake;
pub mod language;
pub mod phone;
pub mod submission;
pub mod user;

pub use auth::{
    LoginErrors, LoginForm, PasswordStrength, RegistrationErrors, RegistrationForm, StrengthLabel,
};
pub use content::{
    Client, LocalizedClient, LocalizedImage, LocalizedMember, LocalizedProject, Project,
    TeamMember, Translations,
};
pub use intake::{EventType, FieldErrors, IntakeField, IntakeForm};
pub use language::Language;
pub use phone::{PhoneInfo, PhoneRejection};
pub use submission::{FormEvent, FormSnapshot, SubmissionStatus};
pub use user::{AuthSession, DesignRequestRecord, RequestStatus, User};
