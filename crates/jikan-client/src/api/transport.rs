//! HTTP GET seam between the retry loop and the network.

use super::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::config::JikanConfig;
use std::time::Duration;

/// Status and raw body of one completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a single GET request, without retries
///
/// Uses `async_trait` so the client can hold `Box<dyn Transport>` as well as
/// concrete transports.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        (**self).get(url).await
    }
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with a request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub fn from_config(config: &JikanConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs), &config.user_agent)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
