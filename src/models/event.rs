//! Inbound webhook payloads.

use serde::Deserialize;

/// `type` value of a plain chat message event.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// Classified webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Endpoint ownership handshake; the challenge is echoed back verbatim.
    UrlVerification { challenge: String },

    /// A wrapped event to run through the intent pipeline.
    EventCallback(MessageEvent),

    /// Anything else; acknowledged and ignored.
    Other,
}

/// One inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    /// Event type (e.g. `message`, `reaction_added`)
    #[serde(rename = "type", default)]
    pub event_type: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub channel: String,

    #[serde(default)]
    pub user: String,

    /// Present when the message was posted by a bot
    #[serde(default)]
    pub bot_id: Option<String>,

    /// Message timestamp, which doubles as its ID
    #[serde(default)]
    pub ts: String,

    /// Root timestamp when the message is itself a thread reply
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl MessageEvent {
    /// Whether the pipeline should act on this event.
    ///
    /// Bot messages are skipped to avoid reply loops.
    pub fn is_actionable(&self) -> bool {
        self.event_type == MESSAGE_EVENT_TYPE
            && self.bot_id.is_none()
            && self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Thread to reply into: the existing thread root, else the message itself.
    pub fn reply_thread(&self) -> Option<String> {
        self.thread_ts
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .or(Some(self.ts.as_str()).filter(|ts| !ts.is_empty()))
            .map(String::from)
    }
}
