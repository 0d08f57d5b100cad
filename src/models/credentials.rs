//! Startup credentials read from the process environment.

use std::fmt;

use crate::error::{AppError, Result};

/// Environment variable holding the homework API OAuth token.
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id.
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
/// Older name for [`TELEGRAM_CHAT_ID`], still honored.
pub const CHAT_ID: &str = "CHAT_ID";

/// Tokens required to poll the API and deliver messages.
///
/// Read once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl Credentials {
    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary lookup function.
    ///
    /// Blank values are treated as missing. The error names the first
    /// missing variable in declaration order. The chat id falls back to
    /// `CHAT_ID` when `TELEGRAM_CHAT_ID` is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| read(name).ok_or(AppError::MissingCredential(name));

        Ok(Self {
            practicum_token: require(PRACTICUM_TOKEN)?,
            telegram_token: require(TELEGRAM_TOKEN)?,
            chat_id: read(TELEGRAM_CHAT_ID)
                .or_else(|| read(CHAT_ID))
                .ok_or(AppError::MissingCredential(TELEGRAM_CHAT_ID))?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
