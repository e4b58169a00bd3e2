// SPDX-License-Identifier: MIT

//! Timestamp prompts
//!
//! Answers are points in time that keep the offset they were given in.
//! Conditions on timestamp prompts are never allowed: exact date matches are
//! unreliable across granularities and zones.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use super::{validate_no_response, Prompt, PromptType};
use crate::campaign::condition::ConditionValuePair;
use crate::campaign::response::{NoResponse, RawValue, ResponseValue};
use crate::error::DomainError;

/// Internal date-time format with an explicit offset
const INTERNAL_FORMAT_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S%.f%:z";
/// Internal date-time format, read as UTC
const INTERNAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// ISO-8601 date-times carrying an offset, beyond what RFC 3339 accepts.
/// `%#z` takes `Z`, `+hh`, `+hhmm` and `+hh:mm`.
const ISO_FORMATS_WITH_OFFSET: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
/// ISO-8601 date-times without an offset, read as UTC
const ISO_FORMATS_LOCAL: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const ISO_DATE: &str = "%Y-%m-%d";

type TextParser = fn(&str) -> Option<ResponseValue>;

/// Tried in order; later parsers accept looser syntax.
const TEXT_PARSERS: [TextParser; 3] = [parse_no_response, parse_internal_value, parse_iso8601_value];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampPrompt;

impl PromptType for TimestampPrompt {
    fn validate_condition_value_pair(
        &self,
        prompt: &Prompt,
        pair: &ConditionValuePair,
    ) -> Result<(), DomainError> {
        Err(DomainError::illegal_condition(
            prompt.id(),
            pair,
            "conditions are not allowed for timestamp prompts",
        ))
    }

    fn validate_value(
        &self,
        prompt: &Prompt,
        value: RawValue,
    ) -> Result<ResponseValue, DomainError> {
        match value {
            RawValue::NoResponse(no_response) => validate_no_response(prompt, no_response),
            RawValue::Timestamp(timestamp) => Ok(ResponseValue::Timestamp(timestamp)),
            RawValue::Instant(instant) => Ok(ResponseValue::Timestamp(instant.fixed_offset())),
            RawValue::Zoned { local, zone } => zone
                .from_local_datetime(&local)
                .single()
                .map(ResponseValue::Timestamp)
                .ok_or_else(|| {
                    DomainError::invalid_value(
                        prompt.id(),
                        format!("{} does not exist in zone {}", local, zone),
                    )
                }),
            RawValue::Text(text) => validate_text(prompt, &text),
            other => Err(DomainError::invalid_value(
                prompt.id(),
                format!("a {} value could not be converted to a date", other.kind()),
            )),
        }
    }
}

fn validate_text(prompt: &Prompt, text: &str) -> Result<ResponseValue, DomainError> {
    match TEXT_PARSERS.iter().find_map(|parser| parser(text)) {
        Some(ResponseValue::NoResponse(no_response)) => validate_no_response(prompt, no_response),
        Some(value) => Ok(value),
        None => Err(DomainError::invalid_value(
            prompt.id(),
            format!("the string '{}' could not be converted to a date", text),
        )),
    }
}

/// Parse text as a point in time, using the internal format first and
/// falling back to ISO-8601
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    parse_internal(text).or_else(|| parse_iso8601(text))
}

fn parse_no_response(text: &str) -> Option<ResponseValue> {
    text.parse::<NoResponse>().ok().map(ResponseValue::NoResponse)
}

fn parse_internal_value(text: &str) -> Option<ResponseValue> {
    parse_internal(text).map(ResponseValue::Timestamp)
}

fn parse_iso8601_value(text: &str) -> Option<ResponseValue> {
    parse_iso8601(text).map(ResponseValue::Timestamp)
}

fn parse_internal(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text, INTERNAL_FORMAT_WITH_OFFSET)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, INTERNAL_FORMAT)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

fn parse_iso8601(text: &str) -> Option<DateTime<FixedOffset>> {
    // ISO-8601 allows a comma before the fraction
    let text = text.replace(',', ".");
    let text = with_minutes(&text).unwrap_or(text);
    let text = text.as_str();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }

    if let Some(timestamp) = ISO_FORMATS_WITH_OFFSET
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(timestamp);
    }

    if let Some(naive) = ISO_FORMATS_LOCAL
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(text, ISO_DATE)
        .ok()
        .or_else(|| parse_year_month(text))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// `2012-05-01T10` and `2012-05-01T10-07` become `2012-05-01T10:00...`;
/// chrono needs the minutes to build a time.
fn with_minutes(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() < 13 || bytes[10] != b'T' {
        return None;
    }
    if !bytes[11..13].iter().all(u8::is_ascii_digit) {
        return None;
    }
    match bytes.get(13) {
        None | Some(b'Z' | b'z' | b'+' | b'-') => {
            Some(format!("{}:00{}", &text[..13], &text[13..]))
        }
        _ => None,
    }
}

/// `YYYY-MM`, read as the first of the month
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    if text.len() != 7 || text.as_bytes()[4] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", text), ISO_DATE).ok()
}
