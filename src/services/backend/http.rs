use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::multipart;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{ApiError, BackendApi, DesignRequestSubmission};
use crate::models::{
    AuthSession, Client, DesignRequestRecord, Language, Project, RegistrationForm, TeamMember,
    User,
};
use crate::services::session::SessionContext;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self, session: &SessionContext) -> Result<String, ApiError> {
        session
            .authorization_header()
            .ok_or(ApiError::NotAuthenticated)
    }
}

/// A 401 invalidates the caller's session.
async fn check(resp: Response, session: Option<&SessionContext>) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        if let Some(session) = session {
            session.clear();
        }
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn submit_design_request(
        &self,
        session: &SessionContext,
        request: &DesignRequestSubmission,
    ) -> Result<(), ApiError> {
        let auth = self.auth(session)?;
        let form = request
            .fields()
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            });

        let resp = self
            .client
            .post(self.url("/api/design-request/"))
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;
        check(resp, Some(session)).await?;

        tracing::info!(company = %request.company, "design request stored");
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        // The token endpoint keys accounts by username, which is the email here.
        let resp = self
            .client
            .post(self.url("/user/token/"))
            .json(&json!({ "username": email, "password": password }))
            .send()
            .await?;
        decode(check(resp, None).await?).await
    }

    async fn register(&self, form: &RegistrationForm) -> Result<AuthSession, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/auth/registration/"))
            .json(&json!({
                "username": form.username,
                "email": form.email,
                "password1": form.password,
                "password2": form.confirm_password,
            }))
            .send()
            .await?;
        decode(check(resp, None).await?).await
    }

    async fn social_login(
        &self,
        provider: &str,
        access_token: &str,
    ) -> Result<AuthSession, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/auth/social/login/"))
            .json(&json!({ "access_token": access_token, "provider": provider }))
            .send()
            .await?;
        decode(check(resp, None).await?).await
    }

    async fn logout(&self, session: &SessionContext) -> Result<(), ApiError> {
        let auth = self.auth(session)?;
        let resp = self
            .client
            .post(self.url("/api/auth/logout/"))
            .header(AUTHORIZATION, auth)
            .send()
            .await;
        session.clear();
        check(resp?, None).await?;
        Ok(())
    }

    async fn fetch_profile(&self, session: &SessionContext) -> Result<User, ApiError> {
        let auth = self.auth(session)?;
        let resp = self
            .client
            .get(self.url("/user/profile/"))
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        decode(check(resp, Some(session)).await?).await
    }

    async fn fetch_user_requests(
        &self,
        session: &SessionContext,
        user_id: i64,
    ) -> Result<Vec<DesignRequestRecord>, ApiError> {
        let auth = self.auth(session)?;
        let resp = self
            .client
            .get(self.url(&format!("/api/design-request-detail/{user_id}/")))
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        decode(check(resp, Some(session)).await?).await
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        let resp = self.client.get(self.url("/api/projects/")).send().await?;
        decode(check(resp, None).await?).await
    }

    async fn fetch_team(&self, language: Language) -> Result<Vec<TeamMember>, ApiError> {
        let resp = self
            .client
            .get(self.url("/api/team/"))
            .header(ACCEPT_LANGUAGE, language.as_str())
            .send()
            .await?;
        decode(check(resp, None).await?).await
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, ApiError> {
        let resp = self.client.get(self.url("/api/clients/")).send().await?;
        decode(check(resp, None).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            axum::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let session = SessionContext::with_token("stale");
        let result = check(response(401, ""), Some(&session)).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_other_failures_keep_session() {
        let session = SessionContext::with_token("tok");
        match check(response(500, "upstream down"), Some(&session)).await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_base_url_is_normalised() {
        let backend =
            HttpBackend::new("https://api.test/".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.url("/api/clients/"), "https://api.test/api/clients/");
    }
}
