// src/pipeline/format.rs

//! Status message rendering.

use serde_json::Value;

use crate::error::Result;
use crate::models::Homework;

/// Render the chat message for a homework record.
///
/// Pure function of the record's name and status.
pub fn format_status(record: &Value) -> Result<String> {
    let homework = Homework::try_from(record)?;
    Ok(render(&homework))
}

/// Render an already-typed homework.
pub fn render(homework: &Homework) -> String {
    format!(
        "Status changed for submission \"{}\". {}",
        homework.name,
        homework.status.verdict()
    )
}

/// Render the chat message reporting a failed cycle.
pub fn failure_message(error: &impl std::fmt::Display) -> String {
    format!("Program failure: {error}")
}
