//! HTTP client for the survey endpoint.
//!
//! One GET, one attempt, no retry and no pagination. A failed fetch or an
//! unparsable body aborts the whole run with a single terminal error;
//! individual field values that fail numeric coercion do not — they
//! default to 0 and the record still counts (see [`coerce_number`]).

use crate::models::SurveyRecord;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort the fetch pipeline.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to survey endpoint: {0}")]
    Connect(reqwest::Error),

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response body is not a JSON array")]
    NotAnArray,
}

/// The remote survey response source.
pub struct SurveySource {
    client: reqwest::Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl SurveySource {
    /// Creates a source for the given endpoint URL.
    pub fn new(endpoint: &str, timeout_seconds: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(SourceError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout_seconds,
        })
    }

    /// Fetches the raw response collection.
    ///
    /// Exactly one attempt; any failure is surfaced to the caller as a
    /// single [`SourceError`] and nothing is aggregated in that case.
    pub async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        info!("Fetching survey responses from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    SourceError::Connect(e)
                } else {
                    SourceError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let body = response.text().await.map_err(SourceError::Request)?;
        debug!("Received {} bytes from endpoint", body.len());

        parse_body(&body)
    }
}

/// Parses the response body into a list of raw records.
pub fn parse_body(body: &str) -> Result<Vec<Value>, SourceError> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(SourceError::NotAnArray),
    }
}

/// Converts raw records into typed [`SurveyRecord`]s.
///
/// Records missing an id (or carrying id 0) get one assigned from source
/// order, starting at 1.
pub fn normalize(raw: &[Value]) -> Vec<SurveyRecord> {
    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                warn!("response #{} is not an object, treating as blank", index + 1);
            }
            SurveyRecord {
                id: coerce_id(item.get("id"), index),
                q3: coerce_number(item.get("q3")),
                q4: coerce_number(item.get("q4")),
                q5: coerce_number(item.get("q5")),
                q6: coerce_number(item.get("q6")),
                q7: coerce_number(item.get("q7")),
                q8_pre: coerce_number(item.get("q8_pre")),
                q8_post: coerce_number(item.get("q8_post")),
                q10: coerce_number(item.get("q10")),
                q12: coerce_number(item.get("q12")),
                q13: coerce_number(item.get("q13")),
                q14: coerce_text(item.get("q14")),
                q15: coerce_text(item.get("q15")),
            }
        })
        .collect()
}

/// Coerces a raw field value to a number.
///
/// Missing values, nulls, and anything that does not parse default to
/// 0.0 — a deliberate leniency: a blank answer lowers the mean rather
/// than excluding the record. Numeric strings are accepted since the
/// endpoint sometimes delivers scores as text.
pub(crate) fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn coerce_id(value: Option<&Value>, index: usize) -> u64 {
    value
        .and_then(Value::as_u64)
        .filter(|&id| id > 0)
        .unwrap_or(index as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE: &str = include_str!("../../fixtures/responses.json");

    #[test]
    fn test_parse_body_accepts_array() {
        let raw = parse_body(r#"[{"id": 1, "q3": 5}]"#).unwrap();
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_parse_body_rejects_invalid_json() {
        assert!(matches!(
            parse_body("not json"),
            Err(SourceError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_body_rejects_non_array() {
        assert!(matches!(
            parse_body(r#"{"error": "script not deployed"}"#),
            Err(SourceError::NotAnArray)
        ));
    }

    #[test]
    fn test_coerce_number_policy() {
        assert_eq!(coerce_number(Some(&json!(4))), 4.0);
        assert_eq!(coerce_number(Some(&json!(4.5))), 4.5);
        assert_eq!(coerce_number(Some(&json!("3"))), 3.0);
        assert_eq!(coerce_number(Some(&json!(" 3.5 "))), 3.5);
        assert_eq!(coerce_number(Some(&json!("not a number"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn test_normalize_assigns_ids_from_source_order() {
        let raw = vec![
            json!({"q3": 5}),
            json!({"id": 7, "q3": 4}),
            json!({"id": 0, "q3": 3}),
        ];

        let records = normalize(&raw);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 7);
        // id 0 counts as absent, same as the original source.
        assert_eq!(records[2].id, 3);
    }

    #[test]
    fn test_normalize_keeps_comments_and_drops_blanks() {
        let raw = vec![json!({"q14": "很感動", "q15": ""})];
        let records = normalize(&raw);
        assert_eq!(records[0].q14.as_deref(), Some("很感動"));
        assert_eq!(records[0].q15, None);
    }

    #[test]
    fn test_fixture_round_trip() {
        let raw = parse_body(FIXTURE).unwrap();
        let records = normalize(&raw);

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].q3, 5.0);
        // Respondent 2 sent q10 as a string.
        assert_eq!(records[1].q10, 4.0);
        // Respondent 3 left q12 blank.
        assert_eq!(records[2].q12, 0.0);
        assert!(records[3].q14.is_some());
    }
}
