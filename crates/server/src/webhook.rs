use std::time::Duration;

use async_trait::async_trait;
use gridbot_core::config::DiscordConfig;
use gridbot_core::UpstreamCallFailure;
use gridbot_discord::response::FollowUpMessage;
use reqwest::StatusCode;

pub const USER_AGENT: &str = concat!("gridbot/", env!("CARGO_PKG_VERSION"));

/// Outbound follow-up calls keyed by the one-time token carried on the
/// original event. Every call site treats a failure as log-and-continue;
/// nothing here may affect a response already sent to the platform.
#[async_trait]
pub trait FollowUpClient: Send + Sync {
    async fn create_followup(
        &self,
        application_id: &str,
        token: &str,
        message: &FollowUpMessage,
    ) -> Result<(), UpstreamCallFailure>;

    /// Deletes the message the interaction originated from. The platform
    /// answers 204 on success.
    async fn delete_original(
        &self,
        application_id: &str,
        token: &str,
    ) -> Result<(), UpstreamCallFailure>;
}

pub struct DiscordWebhookClient {
    http: reqwest::Client,
    api_base: String,
}

impl DiscordWebhookClient {
    pub fn new(config: &DiscordConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.followup_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, api_base: config.api_base.trim_end_matches('/').to_string() })
    }

    fn webhook_url(&self, application_id: &str, token: &str) -> String {
        format!("{}/webhooks/{application_id}/{token}", self.api_base)
    }
}

#[async_trait]
impl FollowUpClient for DiscordWebhookClient {
    async fn create_followup(
        &self,
        application_id: &str,
        token: &str,
        message: &FollowUpMessage,
    ) -> Result<(), UpstreamCallFailure> {
        let response = self
            .http
            .post(self.webhook_url(application_id, token))
            .json(message)
            .send()
            .await
            .map_err(|error| UpstreamCallFailure::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamCallFailure::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn delete_original(
        &self,
        application_id: &str,
        token: &str,
    ) -> Result<(), UpstreamCallFailure> {
        let url = format!("{}/messages/@original", self.webhook_url(application_id, token));
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|error| UpstreamCallFailure::Request(error.to_string()))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(UpstreamCallFailure::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
