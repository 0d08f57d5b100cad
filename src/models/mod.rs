// src/models/mod.rs

//! Domain models for the notifier.

mod config;
mod credentials;
mod homework;

// Re-export all public types
pub use config::{ApiConfig, Config, LoggingConfig, PollConfig, TelegramConfig, TransportPolicy};
pub use credentials::{CHAT_ID, Credentials, PRACTICUM_TOKEN, TELEGRAM_CHAT_ID, TELEGRAM_TOKEN};
pub use homework::{ApiEnvelope, Homework, HomeworkStatus};
