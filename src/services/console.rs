//! Notifier that prints replies instead of posting them.

use async_trait::async_trait;

use crate::models::ResponseMessage;
use crate::services::Notifier;

/// Prints each reply to stdout. Used by the `simulate` command.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Text printed for one reply: a header line naming the target, then the body.
    pub fn render(message: &ResponseMessage) -> String {
        let thread = message.thread_ts.as_deref().unwrap_or("-");
        format!(
            "── reply to {} (thread {}) ──\n{}",
            message.channel, thread, message.text
        )
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, message: &ResponseMessage) {
        println!("{}", Self::render(message));
    }
}
