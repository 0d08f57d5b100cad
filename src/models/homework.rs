//! Homework records, the status catalog, and the API response envelope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Review status reported by the homework API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// All statuses known to the catalog.
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Status code as sent by the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "The reviewer checked the work and liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review.",
            Self::Rejected => "The reviewer checked the work and left remarks.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single submission's review status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    /// Submission name (`homework_name`)
    pub name: String,

    /// Review status (`status`)
    pub status: HomeworkStatus,
}

impl TryFrom<&Value> for Homework {
    type Error = AppError;

    /// Checks run in order: record shape, name, status.
    fn try_from(value: &Value) -> Result<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| AppError::malformed_record(format!("expected an object, got {value}")))?;
        if record.is_empty() {
            return Err(AppError::malformed_record("record is empty"));
        }

        let name = record
            .get("homework_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(AppError::MissingField("homework_name"))?;

        let status = match record.get("status") {
            Some(Value::String(code)) => code.parse()?,
            Some(other) => return Err(AppError::UnknownStatus(other.to_string())),
            None => return Err(AppError::UnknownStatus("<missing>".to_string())),
        };

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }
}

/// Typed view of a decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope {
    /// Top-level `error` key was present and truthy
    Error(String),
    /// `homeworks` sequence, newest first
    Homeworks(Vec<Value>),
    /// Mapping with neither recognized key
    Unrecognized(Map<String, Value>),
}

impl ApiEnvelope {
    /// Classify a decoded response before any field access.
    pub fn decode(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(AppError::malformed_response(
                "expected a JSON object at the top level",
            ));
        };

        if let Some(error) = map.get("error").filter(|e| is_truthy(e)) {
            return Ok(Self::Error(error_detail(error)));
        }

        match map.remove("homeworks") {
            Some(Value::Array(homeworks)) => Ok(Self::Homeworks(homeworks)),
            Some(other) => Err(AppError::malformed_response(format!(
                "'homeworks' is not a list: {other}"
            ))),
            None => Ok(Self::Unrecognized(map)),
        }
    }
}

/// Extract `error.error`, falling back to the raw value.
fn error_detail(error: &Value) -> String {
    match error.get("error") {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => match error {
            Value::String(detail) => detail.clone(),
            other => other.to_string(),
        },
    }
}

/// JSON truthiness: null, false, zero and empty containers are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
