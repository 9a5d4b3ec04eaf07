// src/lambda/mod.rs

//! AWS Lambda handler for the webhook.
//!
//! This module adapts Lambda function URL invocations to the webhook endpoint:
//! 1. Decodes the function URL request (method + optionally base64 body)
//! 2. Runs the body through `webhook::respond`
//! 3. Encodes the status, CORS headers and body as a function URL response

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::{AppError, Result};
use crate::models::{Config, Secrets};
use crate::pipeline::IntentPipeline;
use crate::webhook::{self, WebhookResponse};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "CRAWLBOT_CONFIG";

/// Function URL invocation payload (the parts the webhook needs).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlRequest {
    #[serde(default)]
    pub request_context: RequestContext,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: HttpContext,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpContext {
    #[serde(default)]
    pub method: String,
}

impl FunctionUrlRequest {
    /// Request body as text, decoding base64 when flagged.
    pub fn decoded_body(&self) -> Result<String> {
        let raw = self.body.as_deref().unwrap_or_default();
        if !self.is_base64_encoded {
            return Ok(raw.to_string());
        }
        let bytes = STANDARD
            .decode(raw)
            .map_err(|e| AppError::validation(format!("body is not valid base64: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::validation(format!("body is not valid UTF-8: {e}")))
    }
}

/// Function URL response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<WebhookResponse> for FunctionUrlResponse {
    fn from(response: WebhookResponse) -> Self {
        let headers = response
            .headers()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            status_code: response.status,
            headers,
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event, pipeline))]
pub async fn handler(
    event: LambdaEvent<FunctionUrlRequest>,
    pipeline: Arc<IntentPipeline>,
) -> std::result::Result<FunctionUrlResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();
    let method = request.request_context.http.method.clone();

    let response = match request.decoded_body() {
        Ok(body) => webhook::respond(&pipeline, &method, &body).await,
        Err(e) => {
            error!("Rejecting request body: {}", e);
            WebhookResponse::bad_request()
        }
    };

    info!(
        "{} handled with status {} in {}ms",
        method,
        response.status,
        start.elapsed().as_millis()
    );
    Ok(response.into())
}

/// Load configuration suitable for Lambda environment.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => Config::load(&path)?,
        Err(_) => Config::default(),
    };

    // Override from environment if available
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Build the shared pipeline once per cold start.
pub fn build_pipeline() -> Result<Arc<IntentPipeline>> {
    let config = load_lambda_config()?;
    let secrets = Secrets::from_env();
    info!("Loaded configuration, secrets: {:?}", secrets);
    Ok(Arc::new(IntentPipeline::from_config(&config, &secrets)?))
}
