// src/pipeline/handler.rs

//! Per-message intent pipeline.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, CrawlResult, MessageEvent, ResponseMessage, Secrets};
use crate::pipeline::compose::{self, Reply};
use crate::pipeline::intent::IntentClassifier;
use crate::services::{FirecrawlClient, Notifier, SlackNotifier, UrlCrawler};
use crate::utils::{preview, url::extract_urls};

/// Classifies a message, crawls when asked, and sends exactly one reply.
///
/// Holds no per-message state, so one instance serves every request.
pub struct IntentPipeline {
    classifier: IntentClassifier,
    crawler: Arc<dyn UrlCrawler>,
    notifier: Arc<dyn Notifier>,
    greet_unmatched: bool,
}

impl IntentPipeline {
    pub fn new(
        config: &Config,
        crawler: Arc<dyn UrlCrawler>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::from_config(&config.intent),
            crawler,
            notifier,
            greet_unmatched: config.pipeline.greet_unmatched,
        }
    }

    /// Wire the production collaborators.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Result<Self> {
        if secrets.crawl_api_key.is_none() {
            log::warn!("Crawl API key not set; crawl requests will report failures");
        }
        if secrets.bot_token.is_none() {
            log::warn!("Bot token not set; replies will not be delivered");
        }

        let crawler = FirecrawlClient::new(config, secrets.crawl_api_key.clone())?;
        let notifier = SlackNotifier::new(config, secrets.bot_token.clone())?;
        Ok(Self::new(config, Arc::new(crawler), Arc::new(notifier)))
    }

    /// Decide the reply for a message text without side effects.
    pub fn plan(&self, text: &str) -> Option<Reply> {
        let urls = extract_urls(text);
        let intent = self.classifier.detect(text);
        log::debug!("Extracted URLs: {:?}, recrawl intent: {}", urls, intent);
        Reply::decide(intent, urls, self.greet_unmatched)
    }

    /// Run one inbound event through the pipeline.
    ///
    /// Returns the reply that was dispatched, if any. Never fails: crawl
    /// failures end up in the reply text and dispatch failures are logged.
    pub async fn handle(&self, event: &MessageEvent) -> Option<ResponseMessage> {
        if !event.is_actionable() {
            log::info!(
                "Message ignored: type={}, bot_id={:?}, has_text={}",
                event.event_type,
                event.bot_id,
                event.text.as_deref().is_some_and(|t| !t.is_empty())
            );
            return None;
        }

        let text = event.text.as_deref().unwrap_or_default();
        log::info!(
            "Message from {} in {}: \"{}\"",
            event.user,
            event.channel,
            preview(text, 200)
        );

        let Some(reply) = self.plan(text) else {
            log::info!("No URLs and no recrawl intent; staying quiet");
            return None;
        };

        let response = ResponseMessage {
            channel: event.channel.clone(),
            thread_ts: event.reply_thread(),
            text: self.compose(reply).await,
        };

        log::debug!("Response text length: {}", response.text.len());
        self.notifier.notify(&response).await;
        Some(response)
    }

    async fn compose(&self, reply: Reply) -> String {
        match reply {
            Reply::CrawlReport(urls) => {
                log::info!("Processing recrawl request for {} URL(s)", urls.len());
                let results = self.crawl_all(&urls).await;
                compose::crawl_report(&urls, &results)
            }
            Reply::AskForUrl => {
                log::info!("Recrawl intent but no URLs found");
                compose::ASK_FOR_URL.to_string()
            }
            Reply::ListUrls(urls) => {
                log::info!("Found {} URL(s) but no recrawl intent", urls.len());
                compose::detected_urls(&urls)
            }
            Reply::Help => compose::HELP.to_string(),
        }
    }

    /// Crawl each URL in order, one at a time.
    async fn crawl_all(&self, urls: &[String]) -> Vec<CrawlResult> {
        stream::iter(urls)
            .then(|url| self.crawler.crawl(url))
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::PageSummary;

    /// Records every crawl; URLs containing "fail" come back as failures.
    #[derive(Default)]
    struct FakeCrawler {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UrlCrawler for FakeCrawler {
        async fn crawl(&self, url: &str) -> CrawlResult {
            self.calls.lock().unwrap().push(url.to_string());
            if url.contains("fail") {
                CrawlResult::failure(url, "API error: 500")
            } else {
                CrawlResult::success(
                    url,
                    PageSummary {
                        title: Some(format!("Title of {url}")),
                        description: Some("desc".to_string()),
                        word_count: Some(10),
                    },
                )
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<ResponseMessage>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &ResponseMessage) {
            self.sent.lock().unwrap().push(message.clone());
        }
    }

    fn pipeline(config: &Config) -> (IntentPipeline, Arc<FakeCrawler>, Arc<RecordingNotifier>) {
        let crawler = Arc::new(FakeCrawler::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let pipeline = IntentPipeline::new(
            config,
            Arc::clone(&crawler) as Arc<dyn UrlCrawler>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );
        (pipeline, crawler, notifier)
    }

    fn message(text: &str) -> MessageEvent {
        MessageEvent {
            event_type: "message".to_string(),
            text: Some(text.to_string()),
            channel: "C42".to_string(),
            user: "U7".to_string(),
            ts: "1700000000.000100".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_crawls_in_order_and_isolates_failures() {
        let (pipeline, crawler, notifier) = pipeline(&Config::default());
        let event = message(
            "recrawl https://a.com/1 https://fail.com/2 https://c.com/3 https://a.com/1",
        );

        let reply = pipeline.handle(&event).await.unwrap();

        assert_eq!(
            *crawler.calls.lock().unwrap(),
            vec!["https://a.com/1", "https://fail.com/2", "https://c.com/3"]
        );
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], reply);
        assert_eq!(reply.channel, "C42");
        assert_eq!(reply.thread_ts.as_deref(), Some("1700000000.000100"));

        let text = &reply.text;
        assert!(text.starts_with("🔥 Starting crawl analysis for 3 URL(s)"));
        let a = text.find("✅ **https://a.com/1**").unwrap();
        let b = text.find("❌ **https://fail.com/2**").unwrap();
        let c = text.find("✅ **https://c.com/3**").unwrap();
        assert!(a < b && b < c);
        assert!(text.contains("💥 Failed to crawl: API error: 500"));
    }

    #[tokio::test]
    async fn test_intent_without_urls_asks_for_one() {
        let (pipeline, crawler, notifier) = pipeline(&Config::default());
        let reply = pipeline.handle(&message("Can you ReCrawl this?")).await.unwrap();

        assert_eq!(reply.text, compose::ASK_FOR_URL);
        assert!(crawler.calls.lock().unwrap().is_empty());
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_urls_without_intent_are_listed() {
        let (pipeline, crawler, _notifier) = pipeline(&Config::default());
        let reply = pipeline
            .handle(&message("jumpstart parsely https://a.com/x and https://b.com/y"))
            .await
            .unwrap();

        assert!(reply.text.contains("• https://a.com/x\n• https://b.com/y"));
        assert!(crawler.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_plain_chatter_is_consistent() {
        let (pipeline, crawler, notifier) = pipeline(&Config::default());
        let first = pipeline.handle(&message("hello there")).await;
        let second = pipeline.handle(&message("hello there")).await;

        assert_eq!(first, second);
        assert_eq!(first.unwrap().text, compose::HELP);
        assert!(crawler.calls.lock().unwrap().is_empty());
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_chatter_silent_when_greeting_disabled() {
        let mut config = Config::default();
        config.pipeline.greet_unmatched = false;
        let (pipeline, _crawler, notifier) = pipeline(&config);

        assert!(pipeline.handle(&message("hello there")).await.is_none());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guard_skips_bots_and_textless_events() {
        let (pipeline, crawler, notifier) = pipeline(&Config::default());

        let mut bot = message("recrawl https://a.com");
        bot.bot_id = Some("B1".to_string());
        assert!(pipeline.handle(&bot).await.is_none());

        let mut textless = message("");
        textless.text = None;
        assert!(pipeline.handle(&textless).await.is_none());

        let mut reaction = message("recrawl https://a.com");
        reaction.event_type = "reaction_added".to_string();
        assert!(pipeline.handle(&reaction).await.is_none());

        assert!(crawler.calls.lock().unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replies_into_existing_thread() {
        let (pipeline, _crawler, _notifier) = pipeline(&Config::default());
        let mut event = message("hello");
        event.thread_ts = Some("1600000000.000001".to_string());

        let reply = pipeline.handle(&event).await.unwrap();
        assert_eq!(reply.thread_ts.as_deref(), Some("1600000000.000001"));
    }

    #[test]
    fn test_plan_uses_configured_keywords() {
        let mut config = Config::default();
        config.intent.keywords = vec!["jumpstart parsely".to_string()];
        let (pipeline, _crawler, _notifier) = pipeline(&config);

        assert_eq!(
            pipeline.plan("jumpstart parsely https://a.com/x"),
            Some(Reply::CrawlReport(vec!["https://a.com/x".to_string()]))
        );
        assert_eq!(
            pipeline.plan("recrawl https://a.com/x"),
            Some(Reply::ListUrls(vec!["https://a.com/x".to_string()]))
        );
    }
}
