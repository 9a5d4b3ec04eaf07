// src/services/slack.rs

//! Chat reply dispatch via Slack `chat.postMessage`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Config, NotifyConfig, ResponseMessage};
use crate::services::Notifier;
use crate::utils::{http, preview};

const SERVICE: &str = "Slack API";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
    unfurl_links: bool,
    unfurl_media: bool,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts replies to a Slack channel or thread.
pub struct SlackNotifier {
    client: Client,
    settings: NotifyConfig,
    token: Option<String>,
}

impl SlackNotifier {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
        let client = http::create_async_client(&config.http, config.notify.timeout_secs)?;
        Ok(Self::with_client(client, config.notify.clone(), token))
    }

    pub fn with_client(client: Client, settings: NotifyConfig, token: Option<String>) -> Self {
        Self {
            client,
            settings,
            token,
        }
    }

    /// Check the configured token, returning it when usable.
    pub fn usable_token(&self) -> Result<&str> {
        let token = self
            .token
            .as_deref()
            .ok_or(AppError::MissingCredential("bot token"))?;

        let prefix = &self.settings.token_prefix;
        if !prefix.is_empty() && !token.starts_with(prefix.as_str()) {
            return Err(AppError::config(format!(
                "bot token does not start with {prefix} (got {})",
                preview(token, 5)
            )));
        }
        Ok(token)
    }

    /// Post one message, mapping every failure to an error.
    pub async fn post_message(&self, message: &ResponseMessage) -> Result<()> {
        let token = self.usable_token()?;

        let request = PostMessageRequest {
            channel: &message.channel,
            text: &message.text,
            thread_ts: message.thread_ts.as_deref(),
            unfurl_links: false,
            unfurl_media: false,
        };

        log::debug!(
            "Posting to {} (thread {:?}): {}",
            message.channel,
            message.thread_ts,
            preview(&message.text, 100)
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("Slack API response status: {}", status);
        if !status.is_success() {
            let body = http::body_preview(response, 200).await;
            log::debug!("Slack API response body: {}", body);
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            return Err(AppError::api(
                SERVICE,
                body.error.as_deref().unwrap_or("unknown error"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &ResponseMessage) {
        match self.post_message(message).await {
            Ok(()) => log::info!("Message sent to channel {}", message.channel),
            Err(e) => log::error!("Failed to send message to {}: {}", message.channel, e),
        }
    }
}
