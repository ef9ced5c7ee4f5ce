use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::MailConfig;

/// Plain-text message for a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail client setup failed: {0}")]
    Setup(String),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail API rejected message: status={status} body={body}")]
    Rejected { status: u16, body: String },

    #[error("Mail send timed out after {0:?}")]
    Timeout(Duration),
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// SendGrid v3 mail API client
pub struct HttpMailer {
    http_client: reqwest::Client,
    endpoint: String,
    authorization: HeaderValue,
    sender: String,
    sender_name: String,
}

impl HttpMailer {
    const SEND_PATH: &'static str = "/v3/mail/send";

    /// Build a client from config, `Ok(None)` when mail is not configured
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, MailError> {
        let (Some(api_key), Some(sender)) = (&config.api_key, &config.default_sender) else {
            return Ok(None);
        };

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| MailError::Setup(format!("Invalid MAIL_API_KEY: {}", e)))?;
        authorization.set_sensitive(true);

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Setup(e.to_string()))?;

        Ok(Some(Self {
            http_client,
            endpoint: format!("{}{}", config.api_url, Self::SEND_PATH),
            authorization,
            sender: sender.clone(),
            sender_name: config.sender_name.clone(),
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn payload(&self, message: &MailMessage) -> serde_json::Value {
        json!({
            "personalizations": [{
                "to": [{"email": message.to}],
                "subject": message.subject
            }],
            "from": {"email": self.sender, "name": self.sender_name},
            "content": [
                {"type": "text/plain", "value": message.body}
            ]
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.authorization.clone());

        let res = self
            .http_client
            .post(&self.endpoint)
            .headers(headers)
            .body(self.payload(message).to_string())
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(())
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 512;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
