//! Shared fixtures for handler and dispatch tests: recording stand-ins for
//! the outbound clients plus interaction builders.

use std::sync::Arc;

use async_trait::async_trait;
use gridbot_core::config::DisplayConfig;
use gridbot_core::UpstreamCallFailure;
use gridbot_discord::interaction::{
    CommandData, ComponentData, Interaction, InteractionPayload, ModalSubmitData,
};
use gridbot_discord::response::FollowUpMessage;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::dispatch::Dispatcher;
use crate::webhook::FollowUpClient;
use crate::wiki::{ContentUrls, PageUrl, WikiApi, WikiSearchPage, WikiSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowUpEvent {
    Created { application_id: String, token: String, content: String, flags: Option<u64> },
    Deleted { application_id: String, token: String },
}

/// Records every webhook call on a channel so tests can await detached
/// tasks. With `failing()` each call is still recorded but then errors.
pub struct RecordingFollowUps {
    events: UnboundedSender<FollowUpEvent>,
    fail: bool,
}

impl RecordingFollowUps {
    pub fn new() -> (Arc<Self>, UnboundedReceiver<FollowUpEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { events, fail: false }), receiver)
    }

    pub fn failing() -> (Arc<Self>, UnboundedReceiver<FollowUpEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { events, fail: true }), receiver)
    }

    fn outcome(&self) -> Result<(), UpstreamCallFailure> {
        if self.fail {
            Err(UpstreamCallFailure::Request("stubbed webhook failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FollowUpClient for RecordingFollowUps {
    async fn create_followup(
        &self,
        application_id: &str,
        token: &str,
        message: &FollowUpMessage,
    ) -> Result<(), UpstreamCallFailure> {
        let _ = self.events.send(FollowUpEvent::Created {
            application_id: application_id.to_string(),
            token: token.to_string(),
            content: message.content.clone(),
            flags: message.flags,
        });
        self.outcome()
    }

    async fn delete_original(
        &self,
        application_id: &str,
        token: &str,
    ) -> Result<(), UpstreamCallFailure> {
        let _ = self.events.send(FollowUpEvent::Deleted {
            application_id: application_id.to_string(),
            token: token.to_string(),
        });
        self.outcome()
    }
}

/// Canned Wikipedia answers: an Earth summary and a two-page search result,
/// one of which has no description.
#[derive(Default)]
pub struct StubWiki;

#[async_trait]
impl WikiApi for StubWiki {
    async fn summary(&self, _title: &str) -> Result<WikiSummary, UpstreamCallFailure> {
        Ok(WikiSummary {
            title: "Earth".to_string(),
            extract: "Earth is the third planet from the Sun.".to_string(),
            description: Some("Third planet from the Sun".to_string()),
            timestamp: Some("2026-01-01T00:00:00Z".to_string()),
            content_urls: Some(ContentUrls {
                desktop: PageUrl { page: "https://en.wikipedia.org/wiki/Earth".to_string() },
            }),
            thumbnail: None,
        })
    }

    async fn search(
        &self,
        _query: &str,
        _limit: u8,
    ) -> Result<Vec<WikiSearchPage>, UpstreamCallFailure> {
        Ok(vec![
            WikiSearchPage {
                title: "Earth".to_string(),
                description: Some("Third planet from the Sun".to_string()),
            },
            WikiSearchPage { title: "Earth science".to_string(), description: None },
        ])
    }
}

pub fn raw_interaction(value: Value) -> Interaction {
    serde_json::from_value(value).expect("interaction fixture should parse")
}

pub fn command_interaction(name: &str, options: Value) -> Interaction {
    raw_interaction(json!({
        "id": "175928847299117063",
        "application_id": "42",
        "type": 2,
        "token": "tok",
        "data": { "name": name, "options": options }
    }))
}

pub fn component_interaction(custom_id: &str) -> Interaction {
    raw_interaction(json!({
        "id": "175928847299117063",
        "application_id": "42",
        "type": 3,
        "token": "tok",
        "data": { "custom_id": custom_id, "component_type": 2 }
    }))
}

pub fn modal_interaction(custom_id: &str, fields: &[(&str, &str)]) -> Interaction {
    let rows: Vec<Value> = fields
        .iter()
        .map(|(field, value)| {
            json!({
                "type": 1,
                "components": [{ "type": 4, "custom_id": field, "value": value }]
            })
        })
        .collect();
    raw_interaction(json!({
        "id": "175928847299117063",
        "application_id": "42",
        "type": 5,
        "token": "tok",
        "data": { "custom_id": custom_id, "components": rows }
    }))
}

pub trait CommandDataExt {
    fn command_data(&self) -> &CommandData;
}

impl CommandDataExt for Interaction {
    fn command_data(&self) -> &CommandData {
        match &self.payload {
            InteractionPayload::Command(data) | InteractionPayload::Autocomplete(data) => data,
            other => panic!("fixture is not a command interaction: {other:?}"),
        }
    }
}

pub trait ComponentDataExt {
    fn component_data(&self) -> &ComponentData;
}

impl ComponentDataExt for Interaction {
    fn component_data(&self) -> &ComponentData {
        match &self.payload {
            InteractionPayload::Component(data) => data,
            other => panic!("fixture is not a component interaction: {other:?}"),
        }
    }
}

pub trait ModalDataExt {
    fn modal_data(&self) -> &ModalSubmitData;
}

impl ModalDataExt for Interaction {
    fn modal_data(&self) -> &ModalSubmitData {
        match &self.payload {
            InteractionPayload::Modal(data) => data,
            other => panic!("fixture is not a modal interaction: {other:?}"),
        }
    }
}

/// A dispatcher wired to the recording follow-up client and the stub wiki.
pub fn dispatcher() -> (Dispatcher, UnboundedReceiver<FollowUpEvent>) {
    let (followups, events) = RecordingFollowUps::new();
    let dispatcher = Dispatcher::new(
        followups,
        Arc::new(StubWiki),
        DisplayConfig { hostname: "pod-7".to_string() },
    );
    (dispatcher, events)
}
