//! HTTP client for the feedback admin API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{AnalyticsSummary, FeedbackRecord};
use crate::{Error, Result};

/// Header carrying the pre-shared key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Upper bound on how much of an error body is kept in `Error::BadStatus`.
const ERROR_BODY_LIMIT: usize = 512;

/// Client for the two read-only admin endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    analytics_timeout: Duration,
    feedback_timeout: Duration,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            analytics_timeout: config.analytics_timeout,
            feedback_timeout: config.feedback_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the aggregate analytics summary.
    pub async fn fetch_analytics(&self) -> Result<AnalyticsSummary> {
        let url = format!("{}/admin/analytics", self.base_url);
        let request = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.analytics_timeout);

        self.execute("analytics", request).await
    }

    /// Fetch up to `limit` feedback records.
    pub async fn fetch_feedbacks(&self, limit: u32) -> Result<Vec<FeedbackRecord>> {
        let url = format!("{}/admin/feedbacks", self.base_url);
        let request = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("limit", limit)])
            .timeout(self.feedback_timeout);

        self.execute("feedbacks", request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let request_id = Uuid::new_v4();
        info!(%request_id, endpoint, "Fetching from admin API");

        let result = send_and_decode(request).await;
        match &result {
            Ok(_) => info!(%request_id, endpoint, "Fetch succeeded"),
            Err(e) => error!(
                %request_id,
                endpoint,
                kind = e.kind().map(|k| k.as_str()).unwrap_or("OTHER"),
                "Fetch failed: {}",
                e
            ),
        }
        result
    }
}

async fn send_and_decode<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(Error::from_transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::BadStatus {
            status: status.as_u16(),
            body: truncate(&body, ERROR_BODY_LIMIT),
        });
    }

    let bytes = response.bytes().await.map_err(Error::from_transport)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
