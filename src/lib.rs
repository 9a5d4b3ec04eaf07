// src/lib.rs

//! crawlbot: chat webhook that detects recrawl requests and reports crawl results

pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod utils;
pub mod webhook;
