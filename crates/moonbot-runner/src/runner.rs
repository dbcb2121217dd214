//! Report runner: the pipeline from chat trigger to posted report.
//!
//! For every inbound message that matches the trigger command:
//! 1. Allocate a report id and capture `now` once
//! 2. Fetch the extraction report document
//! 3. On failure, post a single failure notice and stop
//! 4. Otherwise build the report sequence and post it in order
//!
//! Triggers are handled on their own tasks. The reconciliation engine only
//! reads the shared ore table, so concurrent reports need no locking.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use futures::StreamExt;
use moonbot_core::{ReportContext, build_report};
use moonbot_types::{ChatMessage, ReportId, ReportMessage};
use tracing::{debug, info, warn};

use crate::error::RunnerError;
use crate::nats::NatsClient;
use crate::seat::SeatClient;

/// The chat-triggered report runner.
pub struct ReportRunner {
    nats: NatsClient,
    seat: Arc<SeatClient>,
    ctx: Arc<ReportContext>,
    trigger: String,
    bot_user_id: Option<String>,
}

impl ReportRunner {
    /// Create a new runner.
    pub fn new(
        nats: NatsClient,
        seat: SeatClient,
        ctx: ReportContext,
        trigger: String,
        bot_user_id: Option<String>,
    ) -> Self {
        Self {
            nats,
            seat: Arc::new(seat),
            ctx: Arc::new(ctx),
            trigger,
            bot_user_id,
        }
    }

    /// Run the main trigger loop.
    ///
    /// Runs until the NATS subscription ends.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the NATS subscription fails.
    pub async fn run(&self) -> Result<(), RunnerError> {
        let mut subscriber = self.nats.subscribe_messages().await?;
        info!(trigger = self.trigger, "report runner started, awaiting triggers");

        while let Some(message) = subscriber.next().await {
            let chat = match NatsClient::deserialize_message(&message.payload) {
                Ok(chat) => chat,
                Err(e) => {
                    warn!(
                        subject = %message.subject,
                        error = %e,
                        "failed to deserialize chat message, skipping"
                    );
                    continue;
                }
            };

            if !chat.is_trigger(&self.trigger, self.bot_user_id.as_deref()) {
                continue;
            }

            let nats = self.nats.clone();
            let seat = Arc::clone(&self.seat);
            let ctx = Arc::clone(&self.ctx);
            tokio::spawn(async move {
                handle_trigger(&nats, &seat, &ctx, &chat).await;
            });
        }

        info!("NATS subscription ended, runner shutting down");
        Ok(())
    }
}

/// Handle one trigger end to end.
async fn handle_trigger(
    nats: &NatsClient,
    seat: &SeatClient,
    ctx: &ReportContext,
    chat: &ChatMessage,
) {
    let report_id = ReportId::new();
    let now = Utc::now().naive_utc();
    info!(
        report_id = %report_id,
        channel_id = chat.channel_id,
        author_id = chat.author_id,
        "report triggered"
    );

    let messages = produce_report(seat, ctx, report_id, now).await;

    for message in &messages {
        if let Err(e) = nats.publish_report(&chat.channel_id, message).await {
            warn!(
                report_id = %report_id,
                channel_id = chat.channel_id,
                error = %e,
                "failed to publish report message, abandoning report"
            );
            return;
        }
    }
    if let Err(e) = nats.flush().await {
        warn!(report_id = %report_id, error = %e, "failed to flush report messages");
        return;
    }

    info!(
        report_id = %report_id,
        channel_id = chat.channel_id,
        messages = messages.len(),
        "report posted"
    );
}

/// Fetch the document and turn it into the messages to post.
///
/// A fetch or decode failure yields exactly one failure notice.
pub async fn produce_report(
    seat: &SeatClient,
    ctx: &ReportContext,
    report_id: ReportId,
    now: NaiveDateTime,
) -> Vec<ReportMessage> {
    match seat.fetch().await {
        Ok(records) => {
            debug!(report_id = %report_id, records = records.len(), "report document fetched");
            build_report(report_id, &records, ctx, now)
        }
        Err(e) => {
            warn!(
                report_id = %report_id,
                url = seat.url(),
                error = %e,
                "report fetch failed"
            );
            vec![ReportMessage::failure(report_id, e.to_string())]
        }
    }
}
