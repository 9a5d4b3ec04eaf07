// src/pipeline/compose.rs

//! Reply text composition.
//!
//! Crawl reports are built as an ordered list of fragments (header first,
//! then one block per URL in extraction order) joined once at the end.

use crate::models::{CrawlOutcome, CrawlResult};

pub const ASK_FOR_URL: &str = "🤔 I see you want to crawl something, but I didn't find any URLs in your message. Could you please include the URL you'd like me to process?";

pub const HELP: &str = "👋 Hi! I'm a crawling bot. Send me URLs with words like \"crawl\", \"analyze\", or \"process\" and I'll analyze them for you!";

/// Which reply a message gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Crawl every URL and report the results.
    CrawlReport(Vec<String>),
    /// Intent without URLs.
    AskForUrl,
    /// URLs without intent.
    ListUrls(Vec<String>),
    /// Neither.
    Help,
}

impl Reply {
    /// Pick the reply for an (intent, urls) pair.
    ///
    /// Returns `None` for the help case when greeting is disabled.
    pub fn decide(intent: bool, urls: Vec<String>, greet_unmatched: bool) -> Option<Self> {
        match (intent, urls.is_empty()) {
            (true, false) => Some(Self::CrawlReport(urls)),
            (true, true) => Some(Self::AskForUrl),
            (false, false) => Some(Self::ListUrls(urls)),
            (false, true) => greet_unmatched.then_some(Self::Help),
        }
    }
}

fn bullet_list(urls: &[String]) -> String {
    urls.iter()
        .map(|url| format!("• {url}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header line announcing the crawl.
pub fn crawl_header(urls: &[String]) -> String {
    format!(
        "🔥 Starting crawl analysis for {} URL(s)...\n{}",
        urls.len(),
        bullet_list(urls)
    )
}

/// One block per crawled URL.
pub fn crawl_block(result: &CrawlResult) -> String {
    match &result.outcome {
        CrawlOutcome::Success(summary) => {
            let mut lines = vec![format!("✅ **{}**", result.url)];
            if let Some(title) = &summary.title {
                lines.push(format!("📰 {title}"));
            }
            lines.push(format!(
                "📄 {}",
                summary
                    .description
                    .as_deref()
                    .unwrap_or("Content crawled successfully")
            ));
            if let Some(count) = summary.word_count {
                lines.push(format!("📊 Word count: {count}"));
            }
            lines.join("\n")
        }
        CrawlOutcome::Failure { error } => {
            format!("❌ **{}**\n💥 Failed to crawl: {}", result.url, error)
        }
    }
}

/// Full crawl report: header followed by one block per result, in order.
pub fn crawl_report(urls: &[String], results: &[CrawlResult]) -> String {
    std::iter::once(crawl_header(urls))
        .chain(results.iter().map(crawl_block))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// URLs found without a crawl request.
pub fn detected_urls(urls: &[String]) -> String {
    format!(
        "📎 I detected {} URL(s) in your message:\n{}\n\n💡 Say \"crawl\" or \"analyze\" to process them!",
        urls.len(),
        bullet_list(urls)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageSummary;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decide_branch_table() {
        let some = urls(&["https://a.com"]);
        assert_eq!(
            Reply::decide(true, some.clone(), true),
            Some(Reply::CrawlReport(some.clone()))
        );
        assert_eq!(Reply::decide(true, vec![], true), Some(Reply::AskForUrl));
        assert_eq!(
            Reply::decide(false, some.clone(), false),
            Some(Reply::ListUrls(some))
        );
        assert_eq!(Reply::decide(false, vec![], true), Some(Reply::Help));
        assert_eq!(Reply::decide(false, vec![], false), None);
    }

    #[test]
    fn test_crawl_report_layout() {
        let list = urls(&["https://a.com/x", "https://b.com/y"]);
        let results = vec![
            CrawlResult::success(
                "https://a.com/x",
                PageSummary {
                    title: Some("A".to_string()),
                    description: None,
                    word_count: Some(42),
                },
            ),
            CrawlResult::failure("https://b.com/y", "API error: 500"),
        ];

        assert_eq!(
            crawl_report(&list, &results),
            "🔥 Starting crawl analysis for 2 URL(s)...\n\
             • https://a.com/x\n\
             • https://b.com/y\n\
             \n\
             ✅ **https://a.com/x**\n\
             📰 A\n\
             📄 Content crawled successfully\n\
             📊 Word count: 42\n\
             \n\
             ❌ **https://b.com/y**\n\
             💥 Failed to crawl: API error: 500"
        );
    }

    #[test]
    fn test_success_block_without_metadata() {
        let result = CrawlResult::success("https://a.com/x", PageSummary::default());
        assert_eq!(
            crawl_block(&result),
            "✅ **https://a.com/x**\n📄 Content crawled successfully"
        );
    }

    #[test]
    fn test_detected_urls_lists_each_url() {
        let text = detected_urls(&urls(&["https://a.com", "https://b.com"]));
        assert!(text.starts_with("📎 I detected 2 URL(s)"));
        assert!(text.contains("• https://a.com\n• https://b.com"));
        assert!(text.contains("\"crawl\""));
    }
}
