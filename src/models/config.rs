//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the crawl service API key.
pub const CRAWL_API_KEY_ENV: &str = "FIRECRAWL_API_KEY";

/// Environment variable holding the chat bot token.
pub const BOT_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Outbound crawl service
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Outbound chat notifications
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Recrawl intent keywords
    #[serde(default)]
    pub intent: IntentConfig,

    /// Reply policy
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override selected values from key/value lookups (environment in Lambda).
    ///
    /// Unparsable numbers and booleans are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("CRAWL_ENDPOINT") {
            self.crawl.endpoint = endpoint;
        }
        if let Some(secs) = lookup("CRAWL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.crawl.timeout_secs = secs;
        }
        if let Some(endpoint) = lookup("NOTIFY_ENDPOINT") {
            self.notify.endpoint = endpoint;
        }
        if let Some(secs) = lookup("NOTIFY_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.notify.timeout_secs = secs;
        }
        if let Some(greet) = lookup("GREET_UNMATCHED").and_then(|v| v.parse().ok()) {
            self.pipeline.greet_unmatched = greet;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        validate_endpoint("crawl.endpoint", &self.crawl.endpoint)?;
        validate_endpoint("notify.endpoint", &self.notify.endpoint)?;
        if self.crawl.timeout_secs == 0 {
            return Err(AppError::validation("crawl.timeout_secs must be > 0"));
        }
        if self.notify.timeout_secs == 0 {
            return Err(AppError::validation("notify.timeout_secs must be > 0"));
        }
        if self.crawl.formats.is_empty() {
            return Err(AppError::validation("crawl.formats is empty"));
        }
        if self.intent.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::validation("No intent keywords defined"));
        }
        Ok(())
    }
}

fn validate_endpoint(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::validation(format!(
            "{name} must use http or https, got {other}"
        ))),
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for outbound requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
        }
    }
}

/// Crawl service request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Scrape endpoint
    #[serde(default = "defaults::crawl_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::crawl_timeout")]
    pub timeout_secs: u64,

    /// How long the service waits for the page before scraping
    #[serde(default = "defaults::wait_for")]
    pub wait_for_ms: u64,

    #[serde(default = "defaults::formats")]
    pub formats: Vec<String>,

    #[serde(default = "defaults::include_tags")]
    pub include_tags: Vec<String>,

    #[serde(default = "defaults::exclude_tags")]
    pub exclude_tags: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::crawl_endpoint(),
            timeout_secs: defaults::crawl_timeout(),
            wait_for_ms: defaults::wait_for(),
            formats: defaults::formats(),
            include_tags: defaults::include_tags(),
            exclude_tags: defaults::exclude_tags(),
        }
    }
}

/// Chat notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Message posting endpoint
    #[serde(default = "defaults::notify_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,

    /// Required bot token prefix (empty disables the check)
    #[serde(default = "defaults::token_prefix")]
    pub token_prefix: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::notify_endpoint(),
            timeout_secs: defaults::notify_timeout(),
            token_prefix: defaults::token_prefix(),
        }
    }
}

/// Recrawl intent detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    /// Substrings that mark a message as a recrawl request
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
        }
    }
}

/// Reply policy for the intent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reply with a help message when a message has neither URLs nor intent
    #[serde(default = "defaults::greet_unmatched")]
    pub greet_unmatched: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            greet_unmatched: defaults::greet_unmatched(),
        }
    }
}

/// Credentials for the outbound services, loaded once at startup.
#[derive(Clone, Default)]
pub struct Secrets {
    pub crawl_api_key: Option<String>,
    pub bot_token: Option<String>,
}

impl Secrets {
    /// Read both secrets from the process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            crawl_api_key: read(CRAWL_API_KEY_ENV),
            bot_token: read(BOT_TOKEN_ENV),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("crawl_api_key", &self.crawl_api_key.as_ref().map(|_| "<set>"))
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; crawlbot/0.1)".into()
    }

    // Crawl service defaults
    pub fn crawl_endpoint() -> String {
        "https://api.firecrawl.dev/v1/scrape".into()
    }
    pub fn crawl_timeout() -> u64 {
        15
    }
    pub fn wait_for() -> u64 {
        2000
    }
    pub fn formats() -> Vec<String> {
        vec!["markdown".into(), "html".into()]
    }
    pub fn include_tags() -> Vec<String> {
        vec!["title".into(), "description".into()]
    }
    pub fn exclude_tags() -> Vec<String> {
        vec!["nav".into(), "footer".into(), "aside".into()]
    }

    // Notification defaults
    pub fn notify_endpoint() -> String {
        "https://slack.com/api/chat.postMessage".into()
    }
    pub fn notify_timeout() -> u64 {
        10
    }
    pub fn token_prefix() -> String {
        "xoxb-".into()
    }

    // Intent defaults
    pub fn keywords() -> Vec<String> {
        [
            "recrawl",
            "re-crawl",
            "crawl",
            "refresh",
            "update",
            "reindex",
            "re-index",
            "process",
            "analyze",
            "scan",
            "check",
            "review",
            "firecrawl",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn greet_unmatched() -> bool {
        true
    }
}
