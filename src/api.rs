use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    config::NetworkConfig,
    payload::{AiInsightPayload, AnalyticsPayload, ScrapeRequest, ScrapeResponse, ServerStatus},
};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const AI_INSIGHT_PATH: &str = "/api/ai-insight";
pub const SCRAPE_PATH: &str = "/api/scrape";
pub const STATUS_PATH: &str = "/api/dashboard";

/// Failures talking to the analytics API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned error status: {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Server reported an error: {0}")]
    Upstream(String),
}

/// API client for the flight analytics server.
#[derive(Clone, Debug)]
pub struct FlightApiClient {
    client: reqwest::Client,
    base_url: String,
    scrape_timeout: Duration,
}

impl FlightApiClient {
    /// Create a new API client with configurable timeouts.
    pub fn new(base_url: impl Into<String>, network_config: &NetworkConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            scrape_timeout: Duration::from_secs(network_config.scrape_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the aggregated analytics of the latest scrape.
    ///
    /// A payload carrying the server's `error` field is reported as
    /// [`ApiError::Upstream`].
    pub async fn fetch_analytics(&self) -> Result<AnalyticsPayload, ApiError> {
        let payload: AnalyticsPayload = self.get_json(ANALYZE_PATH).await?;
        if let Some(message) = payload.error {
            return Err(ApiError::Upstream(message));
        }
        tracing::debug!(
            total_flights = ?payload.total_flights,
            rows = payload.all_flights.len(),
            "Analytics payload received"
        );
        Ok(payload)
    }

    /// Fetch the generated markdown insight.
    pub async fn fetch_ai_insight(&self) -> Result<AiInsightPayload, ApiError> {
        let payload: AiInsightPayload = self.get_json(AI_INSIGHT_PATH).await?;
        if let Some(ref message) = payload.error {
            tracing::debug!(error = %message, "AI insight endpoint reported an error");
        }
        Ok(payload)
    }

    /// Fetch server health and data availability.
    pub async fn fetch_status(&self) -> Result<ServerStatus, ApiError> {
        self.get_json(STATUS_PATH).await
    }

    /// Ask the server to run a scrape. Any non-2xx status is a failure.
    pub async fn submit_scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, ApiError> {
        tracing::debug!(
            origin = %request.origin,
            destination = %request.destination,
            start = %request.start_date,
            end = %request.end_date,
            "Submitting scrape request"
        );

        let response = self
            .client
            .post(self.url(SCRAPE_PATH))
            .timeout(self.scrape_timeout)
            .json(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: SCRAPE_PATH,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            // Body details are logged only; the status decides the outcome.
            if let Ok(body) = response.text().await {
                if let Ok(detail) = serde_json::from_str::<ScrapeResponse>(&body) {
                    tracing::warn!(
                        status = ?detail.status,
                        details = ?detail.details,
                        "Scrape rejected by server"
                    );
                }
            }
            return Err(ApiError::Status {
                endpoint: SCRAPE_PATH,
                status,
            });
        }

        Self::decode(SCRAPE_PATH, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        tracing::debug!(url = %self.url(endpoint), "GET");

        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status });
        }

        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> NetworkConfig {
        NetworkConfig {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            scrape_timeout_secs: 600,
        }
    }

    #[test]
    fn test_api_client_creation() {
        let result = FlightApiClient::new("http://127.0.0.1:8000", &network());
        assert!(result.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = FlightApiClient::new("http://127.0.0.1:8000/", &network()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url(ANALYZE_PATH), "http://127.0.0.1:8000/api/analyze");
    }

    #[test]
    fn test_status_error_mentions_code() {
        let err = ApiError::Status {
            endpoint: SCRAPE_PATH,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = err.to_string();
        assert!(message.contains("/api/scrape"));
        assert!(message.contains("500"));
    }

    #[test]
    fn test_upstream_error_carries_message() {
        let err = ApiError::Upstream("No flight data available.".to_string());
        assert_eq!(
            err.to_string(),
            "Server reported an error: No flight data available."
        );
    }
}
