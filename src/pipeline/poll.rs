// src/pipeline/poll.rs

//! Poll loop.
//!
//! Each cycle runs fetch → validate → format → notify and then classifies
//! the result:
//!
//! - a status change is sent to the chat and the cursor moves to "now"
//! - an empty `homeworks` list is logged at debug level and skipped
//! - an undecodable body is logged and skipped
//! - any other failure is reported to the chat once per distinct message
//!
//! Network failures stop the loop unless `TransportPolicy::Retry` is set.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{PollConfig, TransportPolicy};
use crate::services::{HomeworkSource, Notifier, notify};

use super::format::{failure_message, format_status};
use super::validate::{Validation, validate};

/// Mutable state carried between cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` for the next request
    pub cursor: i64,
    /// Last failure text sent to the chat
    pub last_error: Option<String>,
}

/// Classified result of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was rendered and handed to the notifier
    StatusChanged { message: String, delivered: bool },
    /// The API had no updates since the cursor
    NothingNew,
    /// The response body could not be decoded
    Undecodable,
    /// The cycle failed; `notified` is false for repeated messages
    Failed { message: String, notified: bool },
}

/// Owns the cursor and error memory and drives the pipeline.
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    config: PollConfig,
    state: PollState,
    clock: fn() -> i64,
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

impl<S: HomeworkSource, N: Notifier> Poller<S, N> {
    /// Create a poller whose first query starts at `initial_from_date`
    /// or, when unset, at the current time.
    pub fn new(source: S, notifier: N, config: PollConfig) -> Self {
        Self::with_clock(source, notifier, config, unix_now)
    }

    /// Create a poller with a custom time source.
    pub fn with_clock(source: S, notifier: N, config: PollConfig, clock: fn() -> i64) -> Self {
        let cursor = config.initial_from_date.unwrap_or_else(clock);
        Self {
            source,
            notifier,
            config,
            state: PollState {
                cursor,
                last_error: None,
            },
            clock,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Poll forever, sleeping the configured interval after every cycle.
    ///
    /// Returns only when a network failure is fatal under the configured policy.
    pub async fn run(&mut self) -> Result<()> {
        let interval = self.config.interval();
        log::info!(
            "Polling every {}s starting from {}",
            interval.as_secs(),
            self.state.cursor
        );

        loop {
            self.run_cycle().await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// Run a single cycle without sleeping.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let outcome = match self.check_updates().await {
            Ok(Some(message)) => {
                let delivered = notify(&self.notifier, &message).await.is_sent();
                self.state.cursor = (self.clock)();
                CycleOutcome::StatusChanged { message, delivered }
            }
            Ok(None) => {
                log::debug!("No new statuses since {}", self.state.cursor);
                if self.config.advance_cursor_on_idle {
                    self.state.cursor = (self.clock)();
                }
                CycleOutcome::NothingNew
            }
            Err(e) => self.handle_failure(e).await?,
        };

        Ok(outcome)
    }

    /// Fetch, validate and render; `None` means nothing changed.
    async fn check_updates(&self) -> Result<Option<String>> {
        let response = self.source.fetch(self.state.cursor).await?;
        match validate(response)? {
            Validation::Found(record) => format_status(&record).map(Some),
            Validation::NothingNew => Ok(None),
        }
    }

    async fn handle_failure(&mut self, error: AppError) -> Result<CycleOutcome> {
        if error.is_soft() {
            log::warn!("Skipping cycle: {}", error);
            return Ok(CycleOutcome::Undecodable);
        }

        if error.is_transport() && self.config.transport_policy == TransportPolicy::Fatal {
            log::error!("Homework API unreachable, stopping: {}", error);
            return Err(error);
        }

        log::error!("{}", error);
        let message = failure_message(&error);
        let notified = self.state.last_error.as_deref() != Some(message.as_str());
        if notified {
            notify(&self.notifier, &message).await;
            self.state.last_error = Some(message.clone());
        }

        Ok(CycleOutcome::Failed { message, notified })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::models::HomeworkStatus;

    const START: i64 = 1_000;
    const NOW: i64 = 2_000;

    fn fixed_clock() -> i64 {
        NOW
    }

    /// Replays scripted responses and records requested cursors.
    #[derive(Clone, Default)]
    struct ScriptedSource {
        responses: Arc<Mutex<VecDeque<Result<Value>>>>,
        cursors: Arc<Mutex<Vec<i64>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                cursors: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl HomeworkSource for ScriptedSource {
        async fn fetch(&self, from_date: i64) -> Result<Value> {
            self.cursors.lock().unwrap().push(from_date);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &str) -> Result<()> {
            self.sent.lock().unwrap().push(message.to_string());
            if self.fail {
                return Err(AppError::delivery("chat unavailable"));
            }
            Ok(())
        }
    }

    fn poll_config() -> PollConfig {
        PollConfig {
            initial_from_date: Some(START),
            ..PollConfig::default()
        }
    }

    fn poller(
        responses: Vec<Result<Value>>,
        config: PollConfig,
    ) -> (
        Poller<ScriptedSource, RecordingNotifier>,
        ScriptedSource,
        RecordingNotifier,
    ) {
        let source = ScriptedSource::new(responses);
        let notifier = RecordingNotifier::default();
        let poller = Poller::with_clock(source.clone(), notifier.clone(), config, fixed_clock);
        (poller, source, notifier)
    }

    fn transport_error() -> AppError {
        // A builder error is the simplest reqwest::Error to construct offline.
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        AppError::Transport(err)
    }

    #[tokio::test]
    async fn test_status_change_notifies_and_resets_cursor() {
        let (mut poller, source, notifier) = poller(
            vec![Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]}))],
            poll_config(),
        );

        let outcome = poller.run_cycle().await.unwrap();

        let expected = format!(
            "Status changed for submission \"hw1\". {}",
            HomeworkStatus::Approved.verdict()
        );
        assert_eq!(
            outcome,
            CycleOutcome::StatusChanged {
                message: expected.clone(),
                delivered: true
            }
        );
        assert_eq!(*notifier.sent.lock().unwrap(), vec![expected]);
        assert_eq!(*source.cursors.lock().unwrap(), vec![START]);
        assert_eq!(poller.state().cursor, NOW);
    }

    #[tokio::test]
    async fn test_nothing_new_is_silent_and_keeps_cursor() {
        let (mut poller, _source, notifier) =
            poller(vec![Ok(json!({"homeworks": []}))], poll_config());

        assert_eq!(poller.run_cycle().await.unwrap(), CycleOutcome::NothingNew);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(poller.state().cursor, START);
        assert_eq!(poller.state().last_error, None);
    }

    #[tokio::test]
    async fn test_nothing_new_advances_cursor_when_configured() {
        let config = PollConfig {
            advance_cursor_on_idle: true,
            ..poll_config()
        };
        let (mut poller, _source, _notifier) = poller(vec![Ok(json!({"homeworks": []}))], config);

        poller.run_cycle().await.unwrap();
        assert_eq!(poller.state().cursor, NOW);
    }

    #[tokio::test]
    async fn test_identical_errors_notify_once() {
        let api_error = || Ok(json!({"error": {"error": "token expired"}}));
        let (mut poller, _source, notifier) = poller(vec![api_error(), api_error()], poll_config());

        let first = poller.run_cycle().await.unwrap();
        let second = poller.run_cycle().await.unwrap();

        assert!(matches!(first, CycleOutcome::Failed { notified: true, .. }));
        assert!(matches!(second, CycleOutcome::Failed { notified: false, .. }));
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Program failure: "));
        assert!(sent[0].contains("token expired"));
    }

    #[tokio::test]
    async fn test_distinct_errors_notify_each_time() {
        let (mut poller, _source, notifier) = poller(
            vec![
                Err(AppError::UnexpectedStatus(500)),
                Err(AppError::UnexpectedStatus(502)),
            ],
            poll_config(),
        );

        poller.run_cycle().await.unwrap();
        poller.run_cycle().await.unwrap();

        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
        assert_eq!(
            poller.state().last_error.as_deref(),
            Some("Program failure: Endpoint unavailable. Code 502")
        );
    }

    #[tokio::test]
    async fn test_error_memory_survives_success() {
        let record = json!({"homeworks": [{"homework_name": "hw1", "status": "reviewing"}]});
        let (mut poller, _source, notifier) = poller(
            vec![
                Err(AppError::UnexpectedStatus(500)),
                Ok(record),
                Err(AppError::UnexpectedStatus(500)),
            ],
            poll_config(),
        );

        for _ in 0..3 {
            poller.run_cycle().await.unwrap();
        }

        // failure, status change; the repeated failure stays suppressed
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_record_is_reported() {
        let (mut poller, _source, notifier) = poller(
            vec![Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "lost"}]}))],
            poll_config(),
        );

        let outcome = poller.run_cycle().await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Failed { notified: true, .. }));
        assert!(notifier.sent.lock().unwrap()[0].contains("lost"));
        assert_eq!(poller.state().cursor, START);
    }

    #[tokio::test]
    async fn test_decode_error_is_soft() {
        let (mut poller, _source, notifier) = poller(
            vec![Err(AppError::Decode("expected value".into()))],
            poll_config(),
        );

        assert_eq!(poller.run_cycle().await.unwrap(), CycleOutcome::Undecodable);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(poller.state().last_error, None);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal_by_default() {
        let (mut poller, _source, notifier) = poller(vec![Err(transport_error())], poll_config());

        let err = poller.run_cycle().await.unwrap_err();
        assert!(err.is_transport());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_retried_when_configured() {
        let config = PollConfig {
            transport_policy: TransportPolicy::Retry,
            ..poll_config()
        };
        let (mut poller, _source, notifier) = poller(vec![Err(transport_error())], config);

        let outcome = poller.run_cycle().await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Failed { notified: true, .. }));
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_cycle() {
        let source = ScriptedSource::new(vec![Ok(
            json!({"homeworks": [{"homework_name": "hw1", "status": "rejected"}]}),
        )]);
        let notifier = RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        };
        let mut poller = Poller::with_clock(source, notifier, poll_config(), fixed_clock);

        let outcome = poller.run_cycle().await.unwrap();
        assert!(matches!(
            outcome,
            CycleOutcome::StatusChanged {
                delivered: false,
                ..
            }
        ));
        assert_eq!(poller.state().cursor, NOW);
    }

    #[tokio::test]
    async fn test_cursor_defaults_to_clock() {
        let (poller, _source, _notifier) = poller(vec![], PollConfig::default());
        assert_eq!(poller.state().cursor, NOW);
    }
}
