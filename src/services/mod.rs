//! Service layer for the webhook.
//!
//! This module contains the outbound collaborators of the intent pipeline:
//! - Page crawling (`UrlCrawler`, implemented by `FirecrawlClient`)
//! - Reply dispatch (`Notifier`, implemented by `SlackNotifier` and `ConsoleNotifier`)

mod console;
mod firecrawl;
mod slack;

use async_trait::async_trait;

use crate::models::{CrawlResult, ResponseMessage};

pub use console::ConsoleNotifier;
pub use firecrawl::FirecrawlClient;
pub use slack::SlackNotifier;

/// Crawls one URL at a time.
#[async_trait]
pub trait UrlCrawler: Send + Sync {
    /// Crawl `url`.
    ///
    /// Transport errors, error statuses and missing credentials come back as
    /// a failed `CrawlResult`, never as a panic or error.
    async fn crawl(&self, url: &str) -> CrawlResult;
}

/// Delivers the composed reply.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Best effort: failures are logged, not returned.
    async fn notify(&self, message: &ResponseMessage);
}
