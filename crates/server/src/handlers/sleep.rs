use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gridbot_discord::interaction::{snowflake_timestamp, CommandData, Interaction};
use gridbot_discord::response::{FollowUpMessage, InteractionResponse};
use tracing::warn;

use crate::webhook::FollowUpClient;

const DEFAULT_SLEEP_MS: i64 = 5000;

/// The deferred-flow example: the real reply cannot be produced inside the
/// platform's latency budget, so an immediate ack goes back and a detached
/// task delivers the content via the follow-up webhook. The task is never
/// joined; its failure is logged and dies with it.
pub fn handle(
    interaction: &Interaction,
    data: &CommandData,
    followups: Arc<dyn FollowUpClient>,
) -> InteractionResponse {
    let duration_ms = data.option_i64("time", DEFAULT_SLEEP_MS).max(0) as u64;
    let started = snowflake_timestamp(&interaction.id).unwrap_or_else(Utc::now);
    let interaction_id = interaction.id.clone();
    let application_id = interaction.application_id.clone();
    let token = interaction.token.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        let finished = Utc::now();

        let message = FollowUpMessage::new(format!(
            "zzzzz...\nSlept for {duration_ms}ms, from <t:{}:T> to <t:{}:T>",
            started.timestamp(),
            finished.timestamp()
        ));
        if let Err(error) = followups.create_followup(&application_id, &token, &message).await {
            warn!(
                event_name = "sleep.followup_failed",
                interaction_id = %interaction_id,
                error = %error,
                "failed to deliver deferred sleep reply"
            );
        }
    });

    InteractionResponse::deferred_channel_message()
}
