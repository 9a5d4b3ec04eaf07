// src/pipeline/intent.rs

//! Recrawl intent detection.

use crate::models::IntentConfig;

/// Case-insensitive substring matcher over a fixed keyword list.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    keywords: Vec<String>,
}

impl IntentClassifier {
    /// Build a classifier; keywords are lower-cased and blanks dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn from_config(config: &IntentConfig) -> Self {
        Self::new(&config.keywords)
    }

    /// Whether `text` asks for a (re)crawl.
    pub fn detect(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::from_config(&IntentConfig::default())
    }
}
