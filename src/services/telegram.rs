// src/services/telegram.rs

//! Chat delivery through the Telegram Bot API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;

/// Destination for outbound messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single message.
    async fn send(&self, message: &str) -> Result<()>;
}

/// Outcome of a best-effort delivery.
#[derive(Debug)]
pub enum Delivery {
    Sent,
    Failed(AppError),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Deliver `message`, logging the outcome instead of propagating it.
///
/// Failed messages are not retried.
pub async fn notify<N: Notifier + ?Sized>(notifier: &N, message: &str) -> Delivery {
    match notifier.send(message).await {
        Ok(()) => {
            log::info!("Message sent to chat: {}", message);
            Delivery::Sent
        }
        Err(e) => {
            log::error!("Failed to send message: {}", e);
            Delivery::Failed(e)
        }
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram bot bound to a single chat.
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, token: &str, chat_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                token
            ),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: message,
        };

        // Transport errors are reported without the URL, which embeds the bot token.
        let response = self
            .client
            .post(&self.send_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::delivery(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::delivery(e.without_url()))?;

        match serde_json::from_str::<BotResponse>(&body) {
            Ok(reply) if reply.ok && status.is_success() => Ok(()),
            Ok(reply) => Err(AppError::delivery(format!(
                "HTTP {}: {}",
                status.as_u16(),
                reply.description.unwrap_or_else(|| "no description".into())
            ))),
            Err(_) => Err(AppError::delivery(format!(
                "HTTP {}: unexpected reply",
                status.as_u16()
            ))),
        }
    }
}
