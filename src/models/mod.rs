// src/models/mod.rs

//! Domain models for the webhook service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod crawl;
mod event;
mod message;

// Re-export all public types
pub use config::{
    BOT_TOKEN_ENV, CRAWL_API_KEY_ENV, Config, CrawlConfig, HttpConfig, IntentConfig,
    NotifyConfig, PipelineConfig, Secrets,
};
pub use crawl::{CrawlOutcome, CrawlResult, PageSummary};
pub use event::{InboundPayload, MESSAGE_EVENT_TYPE, MessageEvent};
pub use message::ResponseMessage;
