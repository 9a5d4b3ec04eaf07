// src/webhook.rs

//! Transport-agnostic webhook endpoint.
//!
//! Maps an HTTP method and raw body to a status, content type and body. The
//! Lambda and local server adapters both delegate here.

use std::sync::Arc;

use crate::models::InboundPayload;
use crate::pipeline::{IntentPipeline, normalize};
use crate::utils::preview;

/// Headers attached to every response, preflight included.
pub const CORS_HEADERS: [(&str, &str); 2] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
];

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Response produced by [`respond`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl WebhookResponse {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some(TEXT_PLAIN),
            body: body.into(),
        }
    }

    fn preflight() -> Self {
        Self {
            status: 200,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn ok() -> Self {
        Self::text(200, "OK")
    }

    pub fn bad_request() -> Self {
        Self::text(400, "Invalid JSON")
    }

    pub fn internal_error() -> Self {
        Self::text(500, "Internal Server Error")
    }

    /// CORS headers plus the content type, if any.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = CORS_HEADERS.to_vec();
        if let Some(content_type) = self.content_type {
            headers.push(("Content-Type", content_type));
        }
        headers
    }
}

/// Handle one webhook request.
///
/// Once the body parses, the answer is 200 whatever happens downstream. The
/// pipeline runs on its own task so a panic inside it becomes a 500.
pub async fn respond(pipeline: &Arc<IntentPipeline>, method: &str, body: &str) -> WebhookResponse {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return WebhookResponse::preflight();
    }

    log::debug!("Received webhook: {}", preview(body, 500));

    match normalize(body) {
        Err(e) => {
            log::error!("Failed to parse JSON: {}", e);
            WebhookResponse::bad_request()
        }
        Ok(InboundPayload::UrlVerification { challenge }) => WebhookResponse::text(200, challenge),
        Ok(InboundPayload::EventCallback(event)) => {
            let pipeline = Arc::clone(pipeline);
            match tokio::spawn(async move { pipeline.handle(&event).await }).await {
                Ok(_) => WebhookResponse::ok(),
                Err(e) => {
                    log::error!("Error processing webhook: {}", e);
                    WebhookResponse::internal_error()
                }
            }
        }
        Ok(InboundPayload::Other) => WebhookResponse::ok(),
    }
}
