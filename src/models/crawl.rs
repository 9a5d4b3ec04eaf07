//! Crawl attempt results.

use serde::Serialize;

/// Outcome of one crawl attempt for one URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CrawlResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: CrawlOutcome,
}

/// What the crawl service reported.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlOutcome {
    Success(PageSummary),
    Failure { error: String },
}

/// Page details extracted from a successful crawl.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl CrawlResult {
    pub fn success(url: impl Into<String>, summary: PageSummary) -> Self {
        Self {
            url: url.into(),
            outcome: CrawlOutcome::Success(summary),
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: CrawlOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CrawlOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_failure() {
        let result = CrawlResult::failure("https://example.com", "API error: 500");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com",
                "status": "failure",
                "error": "API error: 500"
            })
        );
        assert!(!result.is_success());
    }

    #[test]
    fn test_serialize_success_skips_missing_fields() {
        let result = CrawlResult::success(
            "https://example.com",
            PageSummary {
                title: Some("Example".to_string()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["title"], "Example");
        assert!(json.get("word_count").is_none());
    }
}
