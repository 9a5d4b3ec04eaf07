// src/server.rs

//! Local HTTP server for the webhook endpoint.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::pipeline::IntentPipeline;
use crate::webhook::{self, WebhookResponse};

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let headers = self.headers();
        let mut response = (status, self.body).into_response();
        if self.content_type.is_none() {
            response.headers_mut().remove(CONTENT_TYPE);
        }
        for (name, value) in headers {
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                response
                    .headers_mut()
                    .insert(name, HeaderValue::from_static(value));
            }
        }
        response
    }
}

async fn handle_webhook(
    State(pipeline): State<Arc<IntentPipeline>>,
    method: Method,
    body: String,
) -> WebhookResponse {
    webhook::respond(&pipeline, method.as_str(), &body).await
}

/// Router serving the webhook on `/` and `/slack/events`.
pub fn router(pipeline: Arc<IntentPipeline>) -> Router {
    Router::new()
        .route("/", any(handle_webhook))
        .route("/slack/events", any(handle_webhook))
        .with_state(pipeline)
}

/// Serve on an already bound listener until the process stops.
pub async fn serve_listener(listener: TcpListener, pipeline: Arc<IntentPipeline>) -> Result<()> {
    log::info!("Webhook listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

/// Bind `addr` and serve.
pub async fn serve(addr: &str, pipeline: Arc<IntentPipeline>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, pipeline).await
}
