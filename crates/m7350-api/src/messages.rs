// Message (SMS) endpoints
//
// Mailbox listing, sending with send-status polling, saving drafts,
// deletion and read-marking. Messages are addressed by their device-side
// index within a mailbox, as returned by `read_messages`.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde_json::{Map, Value, json};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::client::{M7350Client, into_payload, result_of};
use crate::codes::{Mailbox, MessageAction, SendStatus};
use crate::error::Error;
use crate::models::SmsMessage;

/// Format a timestamp the way the message module expects `sendTime`.
///
/// `YYYY,MM,dd,HH,mm,ss` with a zero-based month, matching the JavaScript
/// `Date` fields the stock web UI sends.
pub fn format_send_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{:04},{:02},{:02},{:02},{:02},{:02}",
        at.year(),
        at.month0(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

fn outgoing(to: &str, text: &str) -> Value {
    json!({
        "to": to,
        "textContent": text,
        "sendTime": format_send_time(&Local::now()),
    })
}

fn mailbox_payload(mailbox: Mailbox) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("box".into(), Value::from(mailbox.code()));
    payload
}

impl M7350Client {
    /// Read every message in a mailbox, walking all pages.
    pub async fn read_messages(&self, mailbox: Mailbox) -> Result<Vec<SmsMessage>, Error> {
        debug!(%mailbox, "reading messages");
        let entries = self
            .fetch_paged(MessageAction::ReadMsg, mailbox_payload(mailbox), "messageList")
            .await?;

        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).map_err(|e| Error::Deserialization {
                    message: format!("invalid message entry: {e}"),
                    body: entry.to_string(),
                })
            })
            .collect()
    }

    /// Send a message and wait until the modem reports a final status.
    ///
    /// Polls `GetSendStatus` at the configured interval while it reports
    /// [`SendStatus::Sending`]. The returned status may still be a failure;
    /// use [`SendStatus::into_result`] to treat it as one.
    pub async fn send_message(&self, to: &str, text: &str) -> Result<SendStatus, Error> {
        self.start_send_message(to, text).await?;
        self.wait_for_send().await
    }

    /// Hand a message to the modem without waiting for transmission.
    ///
    /// A non-zero `result` means the modem refused the message, so the
    /// send status it reports afterwards belongs to an earlier send.
    pub async fn start_send_message(&self, to: &str, text: &str) -> Result<(), Error> {
        let mut payload = Map::new();
        payload.insert("sendMessage".into(), outgoing(to, text));

        debug!(to, len = text.chars().count(), "sending message");
        self.execute(MessageAction::SendMsg, payload).await?;
        debug!("send accepted");
        Ok(())
    }

    /// Current state of the last send.
    pub async fn send_status(&self) -> Result<SendStatus, Error> {
        let reply = self.request(MessageAction::GetSendStatus).await?;
        result_of(&reply)
            .map(SendStatus::from_code)
            .ok_or(Error::MissingField { field: "result" })
    }

    /// Poll the send status until it leaves [`SendStatus::Sending`].
    pub async fn wait_for_send(&self) -> Result<SendStatus, Error> {
        let poll = self.send_poll();
        let started = Instant::now();

        loop {
            let status = self.send_status().await?;
            if status.is_final() {
                debug!(%status, "send finished");
                return Ok(status);
            }
            if started.elapsed() >= poll.timeout {
                return Err(Error::SendTimeout {
                    waited_secs: poll.timeout.as_secs(),
                });
            }
            sleep(poll.interval).await;
        }
    }

    /// Store a message in the outbox without sending it.
    pub async fn save_message(&self, to: &str, text: &str) -> Result<(), Error> {
        let mut payload = Map::new();
        payload.insert("saveMessage".into(), outgoing(to, text));

        debug!(to, "saving message");
        self.execute(MessageAction::SaveMsg, payload).await?;
        Ok(())
    }

    /// Delete messages from a mailbox by index.
    pub async fn delete_messages(&self, mailbox: Mailbox, indices: &[u32]) -> Result<(), Error> {
        if indices.is_empty() {
            return Ok(());
        }

        let mut payload = mailbox_payload(mailbox);
        payload.insert("deleteMessages".into(), Value::from(indices.to_vec()));

        debug!(%mailbox, count = indices.len(), "deleting messages");
        self.execute(MessageAction::DelMsg, payload).await?;
        Ok(())
    }

    /// Mark inbox messages as read by index.
    pub async fn mark_read(&self, mailbox: Mailbox, indices: &[u32]) -> Result<(), Error> {
        if indices.is_empty() {
            return Ok(());
        }

        let mut payload = mailbox_payload(mailbox);
        payload.insert("markReadMessage".into(), Value::from(indices.to_vec()));

        debug!(%mailbox, count = indices.len(), "marking messages read");
        self.execute(MessageAction::MarkRead, payload).await?;
        Ok(())
    }

    /// Message module settings (SMS center, storage, reports).
    pub async fn message_config(&self) -> Result<Value, Error> {
        self.request(MessageAction::GetConfig).await
    }

    pub async fn set_message_config(&self, config: Value) -> Result<(), Error> {
        self.execute(MessageAction::SetConfig, into_payload(config)?)
            .await?;
        Ok(())
    }
}
