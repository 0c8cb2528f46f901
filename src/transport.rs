//! GraphQL request transport.
//!
//! One POST per query against the GitHub GraphQL endpoint, with transient
//! failures retried by middleware so the rest of the crate never retries
//! anything itself. Errors are split so the binary can print an actionable
//! diagnostic: a 5xx points at GitHub's status page, a 4xx at the caller's
//! token or query. A declared `errors` array is always fatal: a response
//! that is only partially valid must never become a silently-incomplete
//! record set.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Public GitHub GraphQL endpoint. Override with `GITHUB_GRAPHQL_URL` for
/// GitHub Enterprise.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("prtriage/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error(
        "GitHub API error: {status}\n\
         GitHub may be experiencing an outage. Check https://www.githubstatus.com for details."
    )]
    Server { status: StatusCode },

    #[error("GitHub rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("GraphQL errors: {messages}")]
    Graphql { messages: String },

    #[error("unexpected response from GitHub: {0}")]
    Decode(String),
}

/// GraphQL response envelope. `errors` may accompany otherwise-valid `data`
/// (partial success); we treat any declared error as fatal.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Body shape GitHub uses for REST-style rejections (bad credentials etc.).
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

pub struct GraphqlTransport {
    client: ClientWithMiddleware,
    endpoint: Url,
    token: String,
}

impl GraphqlTransport {
    pub fn new(token: String, endpoint: Url) -> anyhow::Result<Self> {
        let base = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(100), Duration::from_secs(5))
            .build_with_max_retries(3);

        let client = ClientBuilder::new(base)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Executes one query and deserializes the `data` payload into `T`.
    pub async fn execute<T>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, TransportError>
    where
        T: serde::de::DeserializeOwned,
    {
        let payload = serde_json::json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|source| TransportError::Network {
                url: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(TransportError::Server { status });
        }
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            return Err(TransportError::Rejected { status, message });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TransportError::Graphql { messages });
        }

        let data = envelope
            .data
            .ok_or_else(|| TransportError::Decode("response carried no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
