//! Search backend access.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::entry::LogEntry;
use crate::error::{SinkError, SinkResult};

/// Operations the sink needs from a search backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndexClient: Send + Sync {
    async fn index_exists(&self, index: &str) -> SinkResult<bool>;

    /// Creates `index`, returning whether the backend acknowledged it.
    async fn create_index(&self, index: &str) -> SinkResult<bool>;

    async fn index_document(&self, index: &str, entry: &LogEntry) -> SinkResult<()>;
}

#[derive(Deserialize)]
struct CreateIndexResponse {
    #[serde(default)]
    acknowledged: bool,
}

/// Elasticsearch / OpenSearch REST client
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElasticsearchClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> SinkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn index_url(&self, index: &str) -> String {
        format!("{}/{}", self.base_url, index)
    }

    async fn backend_error(response: reqwest::Response) -> SinkError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SinkError::Backend { status, body }
    }
}

#[async_trait]
impl IndexClient for ElasticsearchClient {
    async fn index_exists(&self, index: &str) -> SinkResult<bool> {
        let response = self.client.head(self.index_url(index)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn create_index(&self, index: &str) -> SinkResult<bool> {
        let response = self.client.put(self.index_url(index)).send().await?;

        if !response.status().is_success() {
            return Err(Self::backend_error(response).await);
        }

        let body: CreateIndexResponse = response.json().await?;
        Ok(body.acknowledged)
    }

    async fn index_document(&self, index: &str, entry: &LogEntry) -> SinkResult<()> {
        let response = self
            .client
            .post(format!("{}/_doc", self.index_url(index)))
            .json(entry)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::backend_error(response).await);
        }

        Ok(())
    }
}
