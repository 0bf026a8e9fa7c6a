//! # crumb-notify
//!
//! Delivers [`crumb_auth::Alert`]s to a group-bot webhook (WeCom-compatible `text`
//! messages). Delivery is best effort: [`Notifier::notify`] logs failures and returns.

use std::time::Duration;

use crumb_auth::{Alert, Notifier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MENTION_ALL: &str = "@all";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to build webhook HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("webhook request failed: {0}")]
    Request(reqwest::Error),

    #[error("webhook rejected the message (errcode {code}): {message}")]
    Rejected { code: i64, message: String },
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    msgtype: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    mentioned_list: Vec<&'a str>,
}

/// Bot webhook reply. Failures arrive as HTTP 200 with a non-zero `errcode`.
#[derive(Debug, Deserialize)]
struct WebhookReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

pub struct WebhookNotifier {
    http: reqwest::blocking::Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns `NotifyError::Build` if the HTTP client cannot be initialised.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `NotifyError::Build` if the HTTP client cannot be initialised.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Build)?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Deliver `alert` and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Request` on transport or HTTP status failures and
    /// `NotifyError::Rejected` when the bot answers with a non-zero `errcode`.
    pub fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&render(alert))
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| NotifyError::Request(e.without_url()))?;

        // Bodies that are not bot replies are treated as accepted.
        if let Ok(reply) = response.json::<WebhookReply>()
            && reply.errcode != 0
        {
            return Err(NotifyError::Rejected {
                code: reply.errcode,
                message: reply.errmsg,
            });
        }
        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, alert: &Alert) {
        tracing::warn!(title = %alert.title, "{}", alert.message);
        match self.send(alert) {
            Ok(()) => tracing::info!(title = %alert.title, "alert delivered"),
            Err(error) => tracing::error!(%error, title = %alert.title, "alert delivery failed"),
        }
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Webhook URLs embed their access key.
        f.debug_struct("WebhookNotifier")
            .field("url", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn render(alert: &Alert) -> TextMessage<'static> {
    let mut content = format!("{}\n{}", alert.title, alert.message);
    if !alert.suggestions.is_empty() {
        content.push_str("\n\nSuggestions:");
        for (index, suggestion) in alert.suggestions.iter().enumerate() {
            content.push_str(&format!("\n{}. {suggestion}", index + 1));
        }
    }

    TextMessage {
        msgtype: "text",
        text: TextBody {
            content,
            mentioned_list: if alert.mention_all {
                vec![MENTION_ALL]
            } else {
                Vec::new()
            },
        },
    }
}
