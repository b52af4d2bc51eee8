// Device reply models
//
// Only the fields the library relies on are typed; everything else lands in
// a flattened `extra` map because field presence varies with firmware.

use serde::{Deserialize, Serialize};

use crate::codes::Mailbox;

/// An SMS entry from `messageList`.
///
/// Inbox entries carry `from` and `receivedTime`; outbox entries carry `to`
/// and `sendTime`. [`peer`](Self::peer) and [`time`](Self::time) pick
/// whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsMessage {
    /// Device-side index, used by delete and mark-read.
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_time: Option<String>,
    #[serde(default)]
    pub unread: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SmsMessage {
    /// Sender for inbox entries, recipient for outbox entries.
    pub fn peer(&self) -> &str {
        self.from
            .as_deref()
            .or(self.to.as_deref())
            .unwrap_or_default()
    }

    /// Received or send timestamp, as the device formats it.
    pub fn time(&self) -> &str {
        self.received_time
            .as_deref()
            .or(self.send_time.as_deref())
            .unwrap_or_default()
    }

    /// Mailbox the entry most likely came from.
    pub fn mailbox(&self) -> Mailbox {
        if self.from.is_some() {
            Mailbox::Inbox
        } else {
            Mailbox::Outbox
        }
    }
}

/// Reply to authenticator `GetAttempts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempts {
    #[serde(default)]
    pub attempt: Option<i64>,
    #[serde(default)]
    pub remaining_attempts: Option<i64>,
    #[serde(default)]
    pub remaining_time: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
