// src/telegram.rs
//! Telegram Bot API delivery with bounded retry.
//!
//! Failures are classified: transport errors, 5xx and rate limiting retry
//! with linearly increasing backoff; 4xx and API-level rejections of the
//! payload are permanent and fail immediately.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::digest::TRANSPORT_MAX_CHARS;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum SendError {
    /// The API accepted the request but rejected the message.
    #[error("telegram rejected the message: {description} (code {code})")]
    Rejected { code: i64, description: String },

    /// Non-2xx HTTP status from the endpoint.
    #[error("telegram HTTP error: {0}")]
    Http(StatusCode),

    /// Connection/timeout level failure.
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SendError::Transport(_) => true,
            SendError::Http(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            // 429 comes back as ok:false with error_code 429 as well.
            SendError::Rejected { code, .. } => *code == 429 || *code >= 500,
        }
    }
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramSender {
    token: String,
    chat_id: String,
    api_base: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl TelegramSender {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Point at a different API host; used by tests against a mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    /// Pre-flight credential check via `getMe`; no message is sent.
    pub async fn validate(&self) -> Result<(), SendError> {
        let url = format!("{}/bot{}/getMe", self.api_base, self.token);
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SendError::Http(status));
        }
        let body: ApiResponse = resp.json().await?;
        if !body.ok {
            return Err(SendError::Rejected {
                code: body.error_code.unwrap_or(0),
                description: body.description.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Deliver one message, retrying transient failures with linear backoff
    /// (2s, 4s, ...). Permanent rejections fail on the first attempt.
    pub async fn send(&self, text: &str) -> Result<(), SendError> {
        // Last-resort guard; the formatter already clamps well below this.
        let text = clamp_to_transport(text);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.send_once(&text).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    tracing::warn!(error = %e, attempt, "delivery failed, retrying");
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt) * 2)).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "delivery failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, text: &str) -> Result<(), SendError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = SendMessageBody {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // Telegram puts error details in the body even on non-2xx; the
            // status alone is enough to classify.
            return Err(SendError::Http(status));
        }
        let api: ApiResponse = resp.json().await?;
        if !api.ok {
            return Err(SendError::Rejected {
                code: api.error_code.unwrap_or(0),
                description: api.description.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

fn clamp_to_transport(text: &str) -> String {
    if text.chars().count() <= TRANSPORT_MAX_CHARS {
        return text.to_string();
    }
    tracing::warn!(
        len = text.chars().count(),
        "message exceeds transport limit, truncating"
    );
    let cut: String = text.chars().take(TRANSPORT_MAX_CHARS - 3).collect();
    format!("{cut}...")
}
