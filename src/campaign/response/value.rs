// SPDX-License-Identifier: MIT

//! Raw answer values and their normalized form

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::no_response::NoResponse;

/// A validated, canonical response value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseValue {
    NoResponse(NoResponse),
    Number(f64),
    Text(String),
    /// A point in time that keeps the offset it was given in
    Timestamp(DateTime<FixedOffset>),
}

impl ResponseValue {
    /// Short name of the value's kind, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseValue::NoResponse(_) => "no-response",
            ResponseValue::Number(_) => "number",
            ResponseValue::Text(_) => "text",
            ResponseValue::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_no_response(&self) -> Option<NoResponse> {
        match self {
            ResponseValue::NoResponse(nr) => Some(*nr),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            ResponseValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

/// An answer as handed over by a submission, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    NoResponse(NoResponse),
    /// Already in the internal temporal representation
    Timestamp(DateTime<FixedOffset>),
    /// A point in time in UTC
    Instant(DateTime<Utc>),
    /// A wall-clock date-time in an explicit zone
    Zoned {
        local: NaiveDateTime,
        zone: FixedOffset,
    },
    Number(f64),
    Text(String),
    /// Any JSON shape without a more specific variant (objects, arrays, ...)
    Json(Value),
}

impl RawValue {
    /// Short name of the value's kind, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::NoResponse(_) => "no-response",
            RawValue::Timestamp(_) => "timestamp",
            RawValue::Instant(_) => "instant",
            RawValue::Zoned { .. } => "zoned date-time",
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "text",
            RawValue::Json(_) => "json",
        }
    }
}

impl From<ResponseValue> for RawValue {
    fn from(value: ResponseValue) -> Self {
        match value {
            ResponseValue::NoResponse(nr) => RawValue::NoResponse(nr),
            ResponseValue::Number(n) => RawValue::Number(n),
            ResponseValue::Text(s) => RawValue::Text(s),
            ResponseValue::Timestamp(ts) => RawValue::Timestamp(ts),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RawValue::Text(s),
            Value::Number(n) => match n.as_f64() {
                Some(f) => RawValue::Number(f),
                None => RawValue::Json(Value::Number(n)),
            },
            other => RawValue::Json(other),
        }
    }
}

impl From<NoResponse> for RawValue {
    fn from(value: NoResponse) -> Self {
        RawValue::NoResponse(value)
    }
}

impl From<DateTime<FixedOffset>> for RawValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        RawValue::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::Instant(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_from_json() {
        assert_eq!(RawValue::from(json!("SKIPPED")), RawValue::Text("SKIPPED".into()));
        assert_eq!(RawValue::from(json!(4)), RawValue::Number(4.0));
        assert_eq!(RawValue::from(json!(true)), RawValue::Json(json!(true)));
        assert_eq!(RawValue::from(json!(null)), RawValue::Json(json!(null)));
    }

    #[test]
    fn test_response_value_serializes_flat() {
        let ts = DateTime::parse_from_rfc3339("2012-05-01T10:00:00-07:00").unwrap();
        assert_eq!(
            serde_json::to_value(ResponseValue::Timestamp(ts)).unwrap(),
            json!("2012-05-01T10:00:00-07:00")
        );
        assert_eq!(
            serde_json::to_value(ResponseValue::NoResponse(NoResponse::Skipped)).unwrap(),
            json!("SKIPPED")
        );
        assert_eq!(
            serde_json::to_value(ResponseValue::Number(2.5)).unwrap(),
            json!(2.5)
        );
    }

    #[test]
    fn test_response_value_converts_back_to_raw() {
        let value = ResponseValue::Text("coffee".to_string());
        assert_eq!(RawValue::from(value), RawValue::Text("coffee".to_string()));
    }
}
