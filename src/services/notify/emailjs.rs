use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{EmailNotifier, EmailTemplateParams};

pub struct EmailJsNotifier {
    url: String,
    service_id: String,
    template_id: String,
    public_key: String,
    private_key: String,
    client: reqwest::Client,
}

impl EmailJsNotifier {
    pub fn new(
        url: String,
        service_id: String,
        template_id: String,
        public_key: String,
        private_key: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build EmailJS client")?;
        Ok(Self {
            url,
            service_id,
            template_id,
            public_key,
            private_key,
            client,
        })
    }
}

#[async_trait]
impl EmailNotifier for EmailJsNotifier {
    async fn send(&self, params: &EmailTemplateParams) -> anyhow::Result<()> {
        let mut body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": params,
        });
        if !self.private_key.is_empty() {
            body["accessToken"] = json!(self.private_key);
        }

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("failed to call EmailJS")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("EmailJS error ({}): {}", status, text);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntakeForm;

    fn notifier(url: String, timeout: Duration) -> EmailJsNotifier {
        EmailJsNotifier::new(
            url,
            "svc".to_string(),
            "tpl".to_string(),
            "pub".to_string(),
            String::new(),
            timeout,
        )
        .unwrap()
    }

    fn params() -> EmailTemplateParams {
        let form = IntakeForm {
            name: "Rania".to_string(),
            ..Default::default()
        };
        EmailTemplateParams::new(&form, None, "Nijara Team")
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let notifier = notifier(format!("http://{addr}/send"), Duration::from_millis(200));
        let result = tokio::time::timeout(Duration::from_secs(5), notifier.send(&params()))
            .await
            .expect("client timeout should fire before the guard");
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to call EmailJS"));
    }
}
