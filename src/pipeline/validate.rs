// src/pipeline/validate.rs

//! Response validation stage.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiEnvelope;

/// What a well-formed response says about the tracked submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Most recent homework record (first in the list)
    Found(Value),
    /// Empty `homeworks` list; not an operational failure
    NothingNew,
}

/// Check a decoded response and pick the newest homework record.
///
/// Order inside `homeworks` is taken as served; the first element wins.
pub fn validate(response: Value) -> Result<Validation> {
    match ApiEnvelope::decode(response)? {
        ApiEnvelope::Error(detail) => Err(AppError::Api(detail)),
        ApiEnvelope::Homeworks(homeworks) => Ok(homeworks
            .into_iter()
            .next()
            .map_or(Validation::NothingNew, Validation::Found)),
        ApiEnvelope::Unrecognized(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(AppError::malformed_response(format!(
                "unrecognized keys in server response: [{}]",
                keys.join(", ")
            )))
        }
    }
}
