//! Poll pipeline stages.
//!
//! - `validate`: Check the decoded response and pick the newest record
//! - `format`: Render a record into the outbound chat message
//! - `poll`: Drive fetch → validate → format → notify on a fixed interval
//! - `run`: Check config and credentials, then start the poll loop

pub mod format;
pub mod poll;
pub mod run;
pub mod validate;

pub use format::{failure_message, format_status};
pub use poll::{CycleOutcome, PollState, Poller};
pub use run::run_notifier;
pub use validate::{Validation, validate};
