use std::sync::Arc;

use gridbot_core::config::{AppConfig, ConfigError, ConfigOverrides};
use thiserror::Error;
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::webhook::DiscordWebhookClient;
use crate::wiki::WikipediaClient;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap(overrides: ConfigOverrides) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(overrides)?;
    bootstrap_with_config(config)
}

/// Wires the outbound clients into a dispatcher. There is nothing to
/// connect to or migrate; all state travels inside custom_ids.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let followups = Arc::new(
        DiscordWebhookClient::new(&config.discord).map_err(BootstrapError::HttpClient)?,
    );
    let wiki =
        Arc::new(WikipediaClient::new(&config.wiki).map_err(BootstrapError::HttpClient)?);
    let dispatcher = Arc::new(Dispatcher::new(followups, wiki, config.display.clone()));

    info!(event_name = "system.bootstrap.ready", "outbound clients initialized");
    Ok(Application { config, dispatcher })
}
