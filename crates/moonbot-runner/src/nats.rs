//! NATS pub/sub integration with the chat bridge.
//!
//! The chat bridge publishes every message it sees on `moonbot.messages`.
//! The runner subscribes there, and publishes each report message on
//! `moonbot.reports.{channel_id}` so the bridge can post it back to the
//! channel the trigger came from.

use moonbot_types::{ChatMessage, ReportMessage};
use tracing::{debug, info};

use crate::error::RunnerError;

/// Subject carrying inbound chat messages.
pub const MESSAGES_SUBJECT: &str = "moonbot.messages";

/// Subject prefix for outbound report messages.
const REPORTS_SUBJECT_PREFIX: &str = "moonbot.reports";

/// NATS client wrapper for the report runner.
#[derive(Clone)]
pub struct NatsClient {
    client: async_nats::Client,
}

impl NatsClient {
    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Nats`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, RunnerError> {
        info!(url = url, "connecting to NATS server");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| RunnerError::Nats(format!("failed to connect to {url}: {e}")))?;
        info!("NATS connection established");
        Ok(Self { client })
    }

    /// Subscribe to inbound chat messages.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Nats`] if the subscription fails.
    pub async fn subscribe_messages(&self) -> Result<async_nats::Subscriber, RunnerError> {
        debug!(subject = MESSAGES_SUBJECT, "subscribing to chat messages");
        let subscriber = self
            .client
            .subscribe(MESSAGES_SUBJECT.to_owned())
            .await
            .map_err(|e| {
                RunnerError::Nats(format!("failed to subscribe to {MESSAGES_SUBJECT}: {e}"))
            })?;
        info!(subject = MESSAGES_SUBJECT, "subscribed to chat messages");
        Ok(subscriber)
    }

    /// Subject a report for `channel_id` is published on.
    pub fn report_subject(channel_id: &str) -> String {
        format!("{REPORTS_SUBJECT_PREFIX}.{channel_id}")
    }

    /// Publish one report message to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Nats`] if serialization or publishing fails.
    pub async fn publish_report(
        &self,
        channel_id: &str,
        message: &ReportMessage,
    ) -> Result<(), RunnerError> {
        let subject = Self::report_subject(channel_id);
        let payload = serde_json::to_vec(message)
            .map_err(|e| RunnerError::Nats(format!("failed to serialize report message: {e}")))?;
        debug!(
            subject = subject,
            report_id = %message.report_id,
            kind = ?message.kind,
            "publishing report message"
        );
        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| RunnerError::Nats(format!("failed to publish to {subject}: {e}")))?;
        Ok(())
    }

    /// Flush pending publishes so a report's messages leave in order
    /// before the trigger is considered handled.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Nats`] if the flush operation fails.
    pub async fn flush(&self) -> Result<(), RunnerError> {
        self.client
            .flush()
            .await
            .map_err(|e| RunnerError::Nats(format!("flush failed: {e}")))
    }

    /// Deserialize a NATS message payload into a [`ChatMessage`].
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Serde`] if deserialization fails.
    pub fn deserialize_message(data: &[u8]) -> Result<ChatMessage, RunnerError> {
        Ok(serde_json::from_slice(data)?)
    }
}

impl std::fmt::Debug for NatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsClient")
            .field("connected", &true)
            .finish()
    }
}
