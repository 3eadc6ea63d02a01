//! Result decoder.
//!
//! Every channel response goes through [`check_remote_error`] first: a line
//! beginning with the error marker wins over any structured content. The rest
//! of the response is then parsed as JSON and classified as a primitive or a
//! `{result, type}` record whose `result` is a handle.

use crate::config::ProtocolConfig;
use crate::error::{BridgeError, Result};
use crate::value::Handle;
use serde::Deserialize;
use serde_json::Value as Json;

/// A decoded wrapped result, before handles are turned into proxies.
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapped {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Handle { handle: Handle, type_name: String },
}

/// Failure record produced by the remote `dive` helper.
#[derive(Debug, Deserialize)]
struct DiveFailure {
    missing: String,
    reached: Option<String>,
}

/// Raise the first `!!!` line of a response as a remote error.
pub fn check_remote_error(response: &str) -> Result<()> {
    let marker = ProtocolConfig::ERROR_MARKER;
    match response.lines().find(|line| line.starts_with(marker)) {
        Some(line) => Err(BridgeError::Remote {
            message: line[marker.len()..].trim().to_string(),
        }),
        None => Ok(()),
    }
}

fn parse(response: &str) -> Result<Json> {
    check_remote_error(response)?;
    let body = response.trim();
    if body.is_empty() {
        return Err(BridgeError::protocol("empty response where a value was expected"));
    }
    serde_json::from_str(body).map_err(|e| BridgeError::Protocol {
        message: format!("unparseable response {:?}: {}", truncate(body), e),
        source: Some(e),
    })
}

/// Decode a single wrapped result.
pub fn decode_wrapped(response: &str) -> Result<Wrapped> {
    wrapped_from_json(parse(response)?)
}

/// Decode a dive response, which is either a wrapped result or a failure record.
pub fn decode_dive(response: &str) -> Result<Wrapped> {
    let json = parse(response)?;
    if json.get("missing").is_some() {
        let failure: DiveFailure = serde_json::from_value(json)?;
        return Err(BridgeError::Dive {
            reached: failure.reached,
            missing: failure.missing,
        });
    }
    wrapped_from_json(json)
}

/// Decode a list of wrapped results.
pub fn decode_wrapped_list(response: &str) -> Result<Vec<Wrapped>> {
    match parse(response)? {
        Json::Array(items) => items.into_iter().map(wrapped_from_json).collect(),
        other => Err(unexpected("an array of wrapped results", &other)),
    }
}

/// Decode a list of property names.
pub fn decode_names(response: &str) -> Result<Vec<String>> {
    match parse(response)? {
        Json::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Json::String(s) => Ok(s),
                other => Err(unexpected("a property name", &other)),
            })
            .collect(),
        other => Err(unexpected("an array of property names", &other)),
    }
}

/// Decode a list of freshly linked handles.
pub fn decode_handles(response: &str) -> Result<Vec<Handle>> {
    match parse(response)? {
        Json::Array(items) => items.iter().map(handle_from_json).collect(),
        other => Err(unexpected("an array of handles", &other)),
    }
}

/// Decode a bare boolean.
pub fn decode_bool(response: &str) -> Result<bool> {
    match parse(response)? {
        Json::Bool(b) => Ok(b),
        other => Err(unexpected("a boolean", &other)),
    }
}

fn wrapped_from_json(json: Json) -> Result<Wrapped> {
    match json {
        Json::Object(mut record) => {
            let Some(result) = record.remove("result") else {
                return Err(BridgeError::protocol(
                    "record without a result field; composite values must travel as handles",
                ));
            };
            match record.remove("type") {
                Some(Json::String(type_name)) if !type_name.is_empty() => Ok(Wrapped::Handle {
                    handle: handle_from_json(&result)?,
                    type_name,
                }),
                Some(Json::Null) | Some(Json::String(_)) | None => primitive_from_json(result),
                Some(other) => Err(unexpected("a type name", &other)),
            }
        }
        other => primitive_from_json(other),
    }
}

fn primitive_from_json(json: Json) -> Result<Wrapped> {
    match json {
        Json::Null => Ok(Wrapped::Null),
        Json::Bool(b) => Ok(Wrapped::Bool(b)),
        Json::Number(n) => Ok(Wrapped::Number(n)),
        Json::String(s) => Ok(Wrapped::String(s)),
        other => Err(BridgeError::protocol(format!(
            "inline composite value {}; expected a primitive or a handle",
            truncate(&other.to_string())
        ))),
    }
}

fn handle_from_json(json: &Json) -> Result<Handle> {
    json.as_u64()
        .and_then(Handle::new)
        .ok_or_else(|| unexpected("a positive integer handle", json))
}

fn unexpected(expected: &str, got: &Json) -> BridgeError {
    BridgeError::protocol(format!(
        "expected {}, got {}",
        expected,
        truncate(&got.to_string())
    ))
}

fn truncate(s: &str) -> String {
    const LIMIT: usize = 120;
    match s.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
