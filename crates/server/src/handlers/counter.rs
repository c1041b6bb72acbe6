use std::sync::Arc;

use gridbot_discord::counter::{self, CounterAction, CounterState};
use gridbot_discord::custom_id;
use gridbot_discord::interaction::{CommandData, ComponentData, Interaction, ModalSubmitData};
use gridbot_discord::response::{FollowUpMessage, InteractionResponse, MessageData};
use tracing::{info, warn};

use crate::dispatch::HandlerError;
use crate::webhook::FollowUpClient;

/// `/counter name:<str> value:<int>` — creates the message that carries all
/// future state. A name with a reserved delimiter is rejected here, before
/// anything is ever encoded.
pub fn command(data: &CommandData) -> Result<InteractionResponse, HandlerError> {
    let name = data.option_str("name", "Counter");
    let initial = data.option_i64("value", 0);

    match CounterState::new(name, initial) {
        Ok(state) => {
            Ok(InteractionResponse::channel_message(counter::render_message(&state)?))
        }
        Err(error) => Ok(InteractionResponse::channel_message(
            MessageData::new(error.to_string()).ephemeral(),
        )),
    }
}

/// Button activation. The control already embeds its resulting state, so
/// inc/dec/res are a decode + re-render; edit opens the modal; delete acks
/// immediately and hands cleanup to a detached task.
pub fn component(
    interaction: &Interaction,
    data: &ComponentData,
    followups: Arc<dyn FollowUpClient>,
) -> Result<InteractionResponse, HandlerError> {
    let decoded =
        custom_id::decode(&data.custom_id).ok_or(HandlerError::MalformedCustomId)?;
    let state = CounterState::from_decoded(&decoded);

    match decoded.action.as_deref().and_then(CounterAction::from_verb) {
        Some(CounterAction::Edit) => Ok(InteractionResponse::modal(counter::edit_modal(&state)?)),
        Some(CounterAction::Delete) => {
            tokio::spawn(run_delete_cleanup(
                followups,
                interaction.application_id.clone(),
                interaction.token.clone(),
                state,
            ));
            Ok(InteractionResponse::deferred_message_update())
        }
        _ => Ok(InteractionResponse::update_message(counter::render_message(&state)?)),
    }
}

pub fn modal_submit(data: &ModalSubmitData) -> Result<InteractionResponse, HandlerError> {
    let decoded =
        custom_id::decode(&data.custom_id).ok_or(HandlerError::MalformedCustomId)?;
    let pre_edit = CounterState::from_decoded(&decoded);
    let next = counter::apply_edit(&pre_edit, data.fields());
    Ok(InteractionResponse::update_message(counter::render_message(&next)?))
}

/// Best-effort delete of the original message, then an informational
/// follow-up. Fire-and-forget: the deferred ack has already gone back, so
/// both failure modes end here, in the log.
pub async fn run_delete_cleanup(
    followups: Arc<dyn FollowUpClient>,
    application_id: String,
    token: String,
    state: CounterState,
) {
    if let Err(error) = followups.delete_original(&application_id, &token).await {
        warn!(
            event_name = "counter.delete_failed",
            counter_name = %state.name,
            error = %error,
            "failed to delete counter message"
        );
        return;
    }

    let message = FollowUpMessage::new(format!(
        "Deleted counter **{}** with value {}",
        state.name, state.count
    ))
    .ephemeral();
    if let Err(error) = followups.create_followup(&application_id, &token, &message).await {
        warn!(
            event_name = "counter.delete_followup_failed",
            counter_name = %state.name,
            error = %error,
            "failed to post deletion notice"
        );
        return;
    }

    info!(
        event_name = "counter.deleted",
        counter_name = %state.name,
        count = state.count,
        "counter message deleted"
    );
}

#[cfg(test)]
mod tests {
    use gridbot_discord::counter::CounterState;
    use gridbot_discord::response::{Component, ResponseData, ResponseType};

    use crate::test_support::{
        component_interaction, modal_interaction, ComponentDataExt, FollowUpEvent,
        ModalDataExt, RecordingFollowUps,
    };

    use super::{command, component, modal_submit, run_delete_cleanup};

    fn command_data(options: serde_json::Value) -> gridbot_discord::interaction::CommandData {
        serde_json::from_value(serde_json::json!({ "name": "counter", "options": options }))
            .expect("parse")
    }

    fn button_ids(message: &gridbot_discord::response::MessageData) -> Vec<&str> {
        message.components[0]
            .components
            .iter()
            .map(|component| match component {
                Component::Button(button) => button.custom_id.as_str(),
                Component::TextInput(_) => panic!("expected button"),
            })
            .collect()
    }

    #[test]
    fn create_command_embeds_one_step_ahead_identifiers() {
        let response = command(&command_data(serde_json::json!([
            { "name": "name", "type": 3, "value": "Wins" },
            { "name": "value", "type": 4, "value": 3 }
        ])))
        .expect("command");

        assert_eq!(response.kind, ResponseType::ChannelMessageWithSource);
        let Some(ResponseData::Message(message)) = response.data else {
            panic!("expected message data");
        };
        assert_eq!(message.content.as_deref(), Some("**Wins**: 3"));
        assert_eq!(
            button_ids(&message),
            vec![
                "grid/counter/Wins;4;3/inc",
                "grid/counter/Wins;2;3/dec",
                "grid/counter/Wins;3;3/res",
                "grid/counter/Wins;3;3/edit",
                "grid/counter/Wins;3;3/delete",
            ]
        );
    }

    #[test]
    fn create_command_rejects_reserved_delimiters_ephemerally() {
        let response = command(&command_data(serde_json::json!([
            { "name": "name", "type": 3, "value": "a;b" }
        ])))
        .expect("command");

        let Some(ResponseData::Message(message)) = response.data else {
            panic!("expected message data");
        };
        assert_eq!(message.flags, Some(64), "validation failures are ephemeral");
        assert!(message.components.is_empty(), "no identifier may be encoded");
        assert_eq!(message.content.as_deref(), Some("Counter name cannot contain `;` or `/`"));
    }

    #[tokio::test]
    async fn inc_activation_updates_in_place() {
        let (followups, _events) = RecordingFollowUps::new();
        let interaction = component_interaction("grid/counter/Wins;4;3/inc");

        let response =
            component(&interaction, interaction.component_data(), followups).expect("component");
        assert_eq!(response.kind, ResponseType::UpdateMessage);
        let Some(ResponseData::Message(message)) = response.data else {
            panic!("expected message data");
        };
        assert_eq!(message.content.as_deref(), Some("**Wins**: 4"));
        assert_eq!(
            button_ids(&message),
            vec![
                "grid/counter/Wins;5;3/inc",
                "grid/counter/Wins;3;3/dec",
                "grid/counter/Wins;3;3/res",
                "grid/counter/Wins;4;3/edit",
                "grid/counter/Wins;4;3/delete",
            ]
        );
    }

    #[tokio::test]
    async fn edit_activation_opens_a_prefilled_modal() {
        let (followups, _events) = RecordingFollowUps::new();
        let interaction = component_interaction("grid/counter/Wins;4;3/edit");

        let response =
            component(&interaction, interaction.component_data(), followups).expect("component");
        assert_eq!(response.kind, ResponseType::Modal);
        let Some(ResponseData::Modal(modal)) = response.data else {
            panic!("expected modal data");
        };
        assert_eq!(modal.custom_id, "grid/counter/Wins;4;3");
        assert_eq!(modal.title, "Edit \"Wins\"");
    }

    #[tokio::test]
    async fn delete_activation_acks_before_cleanup_runs() {
        let (followups, mut events) = RecordingFollowUps::new();
        let interaction = component_interaction("grid/counter/Wins;4;3/delete");

        let response =
            component(&interaction, interaction.component_data(), followups).expect("component");
        assert_eq!(response.kind, ResponseType::DeferredMessageUpdate);
        assert_eq!(response.data, None);

        let first = tokio::time::timeout(std::time::Duration::from_secs(1), events.recv())
            .await
            .expect("cleanup within a second")
            .expect("channel open");
        assert!(matches!(first, FollowUpEvent::Deleted { .. }));
    }

    #[tokio::test]
    async fn delete_cleanup_posts_an_ephemeral_notice_on_success() {
        let (followups, mut events) = RecordingFollowUps::new();
        let state = CounterState { name: "Wins".to_string(), count: 4, initial: 3 };

        run_delete_cleanup(followups, "42".to_string(), "tok".to_string(), state).await;

        assert!(matches!(events.recv().await, Some(FollowUpEvent::Deleted { .. })));
        let Some(FollowUpEvent::Created { content, flags, .. }) = events.recv().await else {
            panic!("expected deletion notice");
        };
        assert_eq!(content, "Deleted counter **Wins** with value 4");
        assert_eq!(flags, Some(64));
    }

    #[tokio::test]
    async fn delete_cleanup_skips_the_notice_when_deletion_fails() {
        let (followups, mut events) = RecordingFollowUps::failing();
        let state = CounterState { name: "Wins".to_string(), count: 4, initial: 3 };

        run_delete_cleanup(followups, "42".to_string(), "tok".to_string(), state).await;

        assert!(matches!(events.recv().await, Some(FollowUpEvent::Deleted { .. })));
        assert!(events.try_recv().is_err(), "no follow-up after a failed delete");
    }

    #[test]
    fn modal_submit_applies_fields_with_fallback() {
        let interaction = modal_interaction(
            "grid/counter/Wins;4;3",
            &[("name", "Wins"), ("value", "abc"), ("initial", "3")],
        );

        let response = modal_submit(interaction.modal_data()).expect("modal submit");
        assert_eq!(response.kind, ResponseType::UpdateMessage);
        let Some(ResponseData::Message(message)) = response.data else {
            panic!("expected message data");
        };
        assert_eq!(
            message.content.as_deref(),
            Some("**Wins**: 4"),
            "unparsable value keeps the pre-edit count"
        );
    }

    #[test]
    fn modal_submit_renames_and_recounts() {
        let interaction = modal_interaction(
            "grid/counter/Wins;4;3",
            &[("name", "Losses"), ("value", "10"), ("initial", "0")],
        );

        let response = modal_submit(interaction.modal_data()).expect("modal submit");
        let Some(ResponseData::Message(message)) = response.data else {
            panic!("expected message data");
        };
        assert_eq!(message.content.as_deref(), Some("**Losses**: 10"));
        assert_eq!(button_ids(&message)[0], "grid/counter/Losses;11;0/inc");
    }
}
