//! AWS Lambda entry point for crawlbot
//!
//! Deploy with `cargo lambda build --release --features lambda` and expose the
//! function through a function URL registered as the Events API request URL.
//!
//! ## Environment Variables
//!
//! - `FIRECRAWL_API_KEY`: crawl service API key
//! - `SLACK_BOT_TOKEN`: bot token used to post replies
//! - `CRAWLBOT_CONFIG`: optional path to a bundled TOML config
//! - `CRAWL_TIMEOUT_SECS`, `NOTIFY_TIMEOUT_SECS`: HTTP request timeouts
//! - `CRAWL_ENDPOINT`, `NOTIFY_ENDPOINT`: outbound API endpoints
//! - `GREET_UNMATCHED`: reply to messages with neither URLs nor intent
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawlbot::lambda::{self, FunctionUrlRequest};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("crawlbot Lambda starting...");
    let pipeline = lambda::build_pipeline()?;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<FunctionUrlRequest>| {
        let pipeline = Arc::clone(&pipeline);
        async move { lambda::handler(event, pipeline).await }
    }))
    .await
}
