//! Dashboard API access
//!
//! `DashboardApi` is the seam the feed and poller depend on; the HTTP
//! implementation talks to the gateway's `/api` routes.

use async_trait::async_trait;
use newsdesk_common::{
    analytics::AnalyticsResponse,
    api::{ArticleListResponse, ArticleView, ReportListResponse, SearchRequest, SearchResponse, SourceListResponse},
    errors::ErrorResponse,
    query::ArticleQuery,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Operations the dashboard performs against the data service
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticleListResponse>;

    async fn get_article(&self, id: Uuid) -> Result<ArticleView>;

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    async fn list_reports(&self, page: u64, limit: u64) -> Result<ReportListResponse>;

    async fn analytics(&self, days: i64) -> Result<AnalyticsResponse>;

    async fn sources(&self) -> Result<SourceListResponse>;
}

/// reqwest-backed client for the gateway
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDashboardClient {
    /// Create a client rooted at `base_url` (for example `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl { url: base_url });
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Decode a success body, or turn the server's error body into `ClientError::Status`
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });

        tracing::debug!(status = status.as_u16(), %message, "API call failed");

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticleListResponse> {
        let response = self
            .client
            .get(self.url("/articles"))
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_article(&self, id: Uuid) -> Result<ArticleView> {
        let response = self
            .client
            .get(self.url(&format!("/articles/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let response = self
            .client
            .post(self.url("/articles/search"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_reports(&self, page: u64, limit: u64) -> Result<ReportListResponse> {
        let response = self
            .client
            .get(self.url("/reports"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn analytics(&self, days: i64) -> Result<AnalyticsResponse> {
        let response = self
            .client
            .get(self.url("/analytics"))
            .query(&[("days", days)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn sources(&self) -> Result<SourceListResponse> {
        let response = self.client.get(self.url("/sources")).send().await?;
        Self::decode(response).await
    }
}
