//! HTTP client for the arena vote service

use crate::error::{ClientError, ClientResult};
use arena_common::api::{ErrorResponse, LeaderboardResponse, VoteRequest, VoteResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for arena API requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ArenaClient {
    http_client: Client,
    /// Endpoint without trailing slash, e.g. `http://127.0.0.1:5731`
    base_url: String,
}

impl ArenaClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /leaderboard`
    pub async fn fetch_leaderboard(&self) -> ClientResult<LeaderboardResponse> {
        let url = format!("{}/leaderboard", self.base_url);
        debug!("Fetching leaderboard from {}", url);

        let response = self.http_client.get(&url).send().await?;
        let body: LeaderboardResponse = decode(response).await?;
        if !body.ok {
            return Err(ClientError::Server {
                status: 200,
                message: "leaderboard response not ok".to_string(),
            });
        }
        Ok(body)
    }

    /// `POST /vote`
    pub async fn submit_vote(&self, vote: &VoteRequest) -> ClientResult<VoteResponse> {
        let url = format!("{}/vote", self.base_url);
        debug!(
            "Submitting vote {} vs {} ({}) to {}",
            vote.model_a, vote.model_b, vote.winner, url
        );

        let response = self.http_client.post(&url).json(vote).send().await?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error status into [`ClientError::Server`]
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or_else(|_| status.to_string());
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
