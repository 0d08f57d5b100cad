// src/pipeline/run.rs

//! Startup sequence for the notifier.

use crate::error::Result;
use crate::models::{Config, Credentials};
use crate::services::{ApiClient, TelegramNotifier};
use crate::utils::log::CRITICAL;

use super::poll::Poller;

/// Check config and credentials, then start polling.
///
/// Nothing touches the network until every credential is present. With
/// `once` set a single cycle runs and the function returns.
pub async fn run_notifier<F>(config: Config, lookup: F, once: bool) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    config.validate()?;

    let credentials = Credentials::from_lookup(lookup).inspect_err(|e| {
        log::error!(target: CRITICAL, "Cannot start: {}", e);
    })?;

    log::info!("Homework notifier starting...");

    let source = ApiClient::new(&config.api, &credentials.practicum_token)?;
    let notifier = TelegramNotifier::new(
        &config.telegram,
        &credentials.telegram_token,
        &credentials.chat_id,
    )?;
    let mut poller = Poller::new(source, notifier, config.poll);

    if once {
        let outcome = poller.run_cycle().await?;
        log::info!("Cycle finished: {:?}", outcome);
        return Ok(());
    }

    poller.run().await
}
