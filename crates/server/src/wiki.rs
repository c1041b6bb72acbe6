use std::time::Duration;

use async_trait::async_trait;
use gridbot_core::config::WikiConfig;
use gridbot_core::UpstreamCallFailure;
use serde::Deserialize;

use crate::webhook::USER_AGENT;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct WikiSummary {
    pub title: String,
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content_urls: Option<ContentUrls>,
    #[serde(default)]
    pub thumbnail: Option<WikiImage>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ContentUrls {
    pub desktop: PageUrl,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PageUrl {
    pub page: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct WikiImage {
    pub source: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct WikiSearchPage {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pages: Vec<WikiSearchPage>,
}

/// The one external content source: Wikipedia's REST API. Behind a trait so
/// handler tests run against a stub.
#[async_trait]
pub trait WikiApi: Send + Sync {
    async fn summary(&self, title: &str) -> Result<WikiSummary, UpstreamCallFailure>;
    async fn search(&self, query: &str, limit: u8)
        -> Result<Vec<WikiSearchPage>, UpstreamCallFailure>;
}

pub struct WikipediaClient {
    http: reqwest::Client,
    summary_base: String,
    search_base: String,
}

impl WikipediaClient {
    pub fn new(config: &WikiConfig) -> Result<Self, reqwest::Error> {
        // Redirect following matters here: summary lookups for alternate
        // titles answer 301/302 to the canonical page.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            summary_base: config.summary_base.trim_end_matches('/').to_string(),
            search_base: config.search_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WikiApi for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<WikiSummary, UpstreamCallFailure> {
        let path_title = title.trim().replace(' ', "_");
        let url = format!("{}/page/summary/{path_title}", self.summary_base);
        let response = self
            .http
            .get(url)
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

        response.json().await.map_err(|error| UpstreamCallFailure::Request(error.to_string()))
    }

    async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<WikiSearchPage>, UpstreamCallFailure> {
        let url = format!("{}/search/page", self.search_base);
        let response = self
            .http
            .get(url)
            .query(&[("q", query), ("limit", &limit.to_string())])
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

        let parsed: SearchResponse =
            response.json().await.map_err(|error| UpstreamCallFailure::Request(error.to_string()))?;
        Ok(parsed.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchResponse, WikiSummary};

    #[test]
    fn summary_parses_with_optional_fields_absent() {
        let summary: WikiSummary = serde_json::from_str(
            r#"{ "title": "Earth", "extract": "Third planet from the Sun." }"#,
        )
        .expect("parse");
        assert_eq!(summary.title, "Earth");
        assert_eq!(summary.thumbnail, None);
        assert_eq!(summary.content_urls, None);
    }

    #[test]
    fn search_response_parses_page_list() {
        let response: SearchResponse = serde_json::from_str(
            r#"{ "pages": [
                { "id": 9228, "key": "Earth", "title": "Earth", "description": "Third planet from the Sun" },
                { "id": 1, "key": "Earth_science", "title": "Earth science" }
            ] }"#,
        )
        .expect("parse");
        assert_eq!(response.pages.len(), 2);
        assert_eq!(response.pages[0].description.as_deref(), Some("Third planet from the Sun"));
        assert_eq!(response.pages[1].description, None);
    }
}
