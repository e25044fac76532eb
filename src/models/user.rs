use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::InProgress => "in_progress",
        }
    }
}

fn default_status() -> RequestStatus {
    RequestStatus::Pending
}

/// A design request as the content API returns it for the profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRequestRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub details: String,
    #[serde(default = "default_status")]
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Token plus user as returned by login, registration and social login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(alias = "key")]
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_reads_key() {
        let session: AuthSession =
            serde_json::from_str(r#"{"key":"abc123","user":{"id":7}}"#).unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.unwrap()["id"], 7);
    }

    #[test]
    fn test_request_record_defaults_status() {
        let record: DesignRequestRecord = serde_json::from_str(
            r#"{"id":1,"name":"Dana","contact":"+971501234567","event_type":"exhibition","details":"Stand","extra":true}"#,
        )
        .unwrap();
        assert_eq!(record.status, RequestStatus::Pending);
        assert_eq!(record.company, None);
    }
}
