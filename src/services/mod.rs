//! Service layer for the notifier.
//!
//! This module contains the external collaborators of the poll loop:
//! - Homework status fetching (`ApiClient`)
//! - Chat delivery (`TelegramNotifier`)

mod api;
mod telegram;

pub use api::{ApiClient, HomeworkSource};
pub use telegram::{Delivery, Notifier, TelegramNotifier, notify};
