//! HTTP mail-API client for notification dispatch.
//!
//! Sends the rendered notification as a plain-text e-mail through a
//! JSON mail API (Resend-style `{from, to, subject, text}` POST). The
//! sender address is part of the client configuration; recipients come
//! in per request.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{DispatchError, Dispatcher};

/// Configuration for the mail client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Mail API endpoint receiving the JSON payload
    pub api_url: String,
    /// Bearer token for the mail API
    pub api_key: Option<String>,
    /// Sender address
    pub from: String,
    /// Timeout applied to every request
    pub timeout_secs: u64,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "tasktriage@localhost".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Mail API client
pub struct MailClient {
    config: MailerConfig,
    client: reqwest::Client,
}

impl MailClient {
    /// Create a new mail client with a reusable HTTP client
    pub fn new(config: MailerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Dispatcher for MailClient {
    async fn dispatch(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        let mut request = self.client.post(&self.config.api_url).json(&serde_json::json!({
            "from": self.config.from,
            "to": to,
            "subject": subject,
            "text": body,
        }));

        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout(self.config.timeout_secs)
            } else {
                DispatchError::Transport(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected(format!(
                "HTTP {}: {}",
                status,
                detail.trim()
            )));
        }

        Ok(())
    }
}
