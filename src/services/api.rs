// src/services/api.rs

//! Homework API client.
//!
//! Issues one authenticated GET per cycle and hands back the decoded JSON
//! untouched. Shape checks happen in the validation stage.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Anything that can answer "what changed since `from_date`?".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch the raw response for updates newer than `from_date`.
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// HTTP client for the homework status endpoint.
pub struct ApiClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl ApiClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl HomeworkSource for ApiClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        log::debug!("Requesting {} with from_date={}", self.endpoint, from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppError::Decode(e.to_string()))
    }
}
