use std::sync::Arc;

use gridbot_core::config::DisplayConfig;
use gridbot_core::UpstreamCallFailure;
use gridbot_discord::custom_id::EncodeError;
use gridbot_discord::interaction::Interaction;
use gridbot_discord::response::InteractionResponse;
use gridbot_discord::routing::{
    self, AutocompleteName, ClassifyError, CommandName, ComponentKind, ModalKind, Route,
};
use thiserror::Error;
use tracing::info;

use crate::handlers;
use crate::webhook::FollowUpClient;
use crate::wiki::WikiApi;

/// Failure inside a handler, after classification succeeded. Maps to a 500
/// at the HTTP surface.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("custom_id failed to decode after classification")]
    MalformedCustomId,
    #[error("wiki lookup failed: {0}")]
    Wiki(#[from] UpstreamCallFailure),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Classifies an inbound interaction and hands it to the matching handler.
/// Owns the shared clients so handlers stay free functions.
pub struct Dispatcher {
    followups: Arc<dyn FollowUpClient>,
    wiki: Arc<dyn WikiApi>,
    display: DisplayConfig,
}

impl Dispatcher {
    pub fn new(
        followups: Arc<dyn FollowUpClient>,
        wiki: Arc<dyn WikiApi>,
        display: DisplayConfig,
    ) -> Self {
        Self { followups, wiki, display }
    }

    pub async fn dispatch(
        &self,
        interaction: &Interaction,
    ) -> Result<InteractionResponse, DispatchError> {
        let route = routing::classify(interaction)?;

        let response = match route {
            Route::Ping => InteractionResponse::pong(),
            Route::Command(CommandName::Ping, data) => handlers::ping::handle(data, &self.display),
            Route::Command(CommandName::Sleep, data) => {
                handlers::sleep::handle(interaction, data, Arc::clone(&self.followups))
            }
            Route::Command(CommandName::Wiki, data) => {
                handlers::wiki::command(data, self.wiki.as_ref()).await?
            }
            Route::Command(CommandName::Counter, data) => handlers::counter::command(data)?,
            Route::Autocomplete(AutocompleteName::Wiki, data) => {
                handlers::wiki::autocomplete(data, self.wiki.as_ref()).await?
            }
            Route::Component(ComponentKind::Counter, data) => {
                handlers::counter::component(interaction, data, Arc::clone(&self.followups))?
            }
            Route::Modal(ModalKind::Counter, data) => handlers::counter::modal_submit(data)?,
        };

        info!(
            event_name = "interaction.dispatched",
            interaction_id = %interaction.id,
            response_type = response.kind as u8,
            "interaction handled"
        );
        Ok(response)
    }
}
