//! Webhook processing stages.
//!
//! - `normalize`: classify a raw webhook body
//! - `IntentPipeline`: extract URLs, detect intent, crawl, reply

pub mod compose;
mod handler;
pub mod intent;
mod normalize;

pub use compose::Reply;
pub use handler::IntentPipeline;
pub use intent::IntentClassifier;
pub use normalize::normalize;
