//! Inbound chat messages relayed by the chat bridge.

use serde::{Deserialize, Serialize};

/// A chat message seen by the bridge in any channel the bot can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Channel the message was posted in; replies go back here.
    pub channel_id: String,
    /// Author of the message.
    pub author_id: String,
    /// Raw message text.
    pub content: String,
}

impl ChatMessage {
    /// Returns `true` if this message should start a report.
    ///
    /// The content must equal `trigger` exactly, and messages written by
    /// the bot itself never trigger.
    pub fn is_trigger(&self, trigger: &str, bot_user_id: Option<&str>) -> bool {
        if bot_user_id.is_some_and(|bot| bot == self.author_id) {
            return false;
        }
        self.content == trigger
    }
}
