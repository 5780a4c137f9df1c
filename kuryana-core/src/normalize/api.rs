//! JSON API responses (threads, seasonal calendar)
//!
//! These are passed through once their shape is confirmed.

use serde_json::Value;

use crate::error::ParseError;
use crate::transport::RawResponse;

/// Decode the body, turning an API `error` member into a [`ParseError`].
///
/// 404 is a missing resource and any other 4xx is a rejected parameter
/// (such as an unknown `sort`). Errors on 2xx or 5xx mean the API changed.
fn json(raw: &RawResponse) -> Result<Value, ParseError> {
    let value: Value = serde_json::from_slice(&raw.body)?;
    if let Some(err) = value.get("error").filter(|_| value.get("threads").is_none()) {
        let message = err
            .as_str()
            .map_or_else(|| err.to_string(), str::to_string);
        return Err(match raw.http_status {
            404 => ParseError::not_found(message),
            400..=499 => ParseError::rejected(message),
            _ => ParseError::changed(format!("upstream API error: {message}")),
        });
    }
    Ok(value)
}

pub(crate) fn threads(raw: &RawResponse) -> Result<Value, ParseError> {
    let value = json(raw)?;
    match value.get("threads") {
        Some(Value::Array(_)) => Ok(value),
        Some(_) => Err(ParseError::changed("threads member is not an array")),
        None => Err(ParseError::changed("threads response has no threads member")),
    }
}

pub(crate) fn seasonal(raw: &RawResponse) -> Result<Value, ParseError> {
    let value = json(raw)?;
    let Some(entries) = value.as_array() else {
        return Err(ParseError::changed("seasonal calendar is not an array"));
    };
    if let Some(index) = entries
        .iter()
        .position(|entry| entry.get("id").is_none() || entry.get("title").is_none())
    {
        return Err(ParseError::changed(format!(
            "seasonal calendar entry {index} lacks id or title"
        )));
    }
    Ok(value)
}
