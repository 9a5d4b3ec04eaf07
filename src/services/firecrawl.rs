// src/services/firecrawl.rs

//! Crawl service client.
//!
//! Scrapes a single page through the Firecrawl `v1/scrape` API and reduces
//! the response to a `PageSummary`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlConfig, CrawlResult, PageSummary};
use crate::services::UrlCrawler;
use crate::utils::http;

const SERVICE: &str = "crawl API";
const SERVICE_KEY: &str = "crawl API key";

/// Request body for the scrape endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [String],
    include_tags: &'a [String],
    exclude_tags: &'a [String],
    wait_for: u64,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Crawl client backed by the Firecrawl scrape API.
pub struct FirecrawlClient {
    client: Client,
    settings: CrawlConfig,
    api_key: Option<String>,
}

impl FirecrawlClient {
    /// Create a client with its own timeout from `config.crawl`.
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self> {
        let client = http::create_async_client(&config.http, config.crawl.timeout_secs)?;
        Ok(Self::with_client(client, config.crawl.clone(), api_key))
    }

    pub fn with_client(client: Client, settings: CrawlConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            settings,
            api_key,
        }
    }

    /// Scrape one page.
    async fn scrape(&self, url: &str) -> Result<PageSummary> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential(SERVICE_KEY))?;

        let request = ScrapeRequest {
            url,
            formats: &self.settings.formats,
            include_tags: &self.settings.include_tags,
            exclude_tags: &self.settings.exclude_tags,
            wait_for: self.settings.wait_for_ms,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = http::body_preview(response, 200).await;
            log::error!("Crawl API error for {}: {} - {}", url, status, body);
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body: ScrapeResponse = response.json().await?;
        if !body.success {
            let message = body.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(AppError::Api {
                service: SERVICE,
                message,
            });
        }

        Ok(summarize(body.data.unwrap_or_default()))
    }
}

fn summarize(data: ScrapeData) -> PageSummary {
    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    let metadata = data.metadata.unwrap_or_default();
    PageSummary {
        title: non_blank(metadata.title),
        description: non_blank(metadata.description),
        word_count: data.markdown.as_deref().map(count_words),
    }
}

fn count_words(markdown: &str) -> usize {
    markdown.unicode_words().count()
}

/// Human-readable reason for a failed crawl.
fn failure_reason(error: &AppError) -> String {
    match error {
        AppError::Status { status, .. } => format!("API error: {status}"),
        AppError::Api { message, .. } => message.clone(),
        AppError::Http(e) if e.is_timeout() => "request timed out".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl UrlCrawler for FirecrawlClient {
    async fn crawl(&self, url: &str) -> CrawlResult {
        log::info!("Starting crawl for: {}", url);
        match self.scrape(url).await {
            Ok(summary) => {
                log::info!("Crawl successful for: {}", url);
                CrawlResult::success(url, summary)
            }
            Err(e) => {
                log::warn!("Crawl failed for {}: {}", url, e);
                CrawlResult::failure(url, failure_reason(&e))
            }
        }
    }
}
