//! Inline payload codec: `__reselector__start__::<json>::__reselector__end__`.

#[cfg(feature = "napi")]
use napi_derive::napi;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

pub const START_MARKER: &str = "__reselector__start__::";
pub const END_MARKER: &str = "::__reselector__end__";

lazy_static! {
    static ref PAYLOAD_RE: Regex =
        Regex::new(r"__reselector__start__::(.*?)::__reselector__end__").unwrap();
}

/// Serializes `value` to a single-line comment body.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).map_err(Error::Serialize)?;
    Ok(format!("{}{}{}", START_MARKER, json, END_MARKER))
}

/// Raw JSON text of the first payload in `content`, if any.
pub fn find_payload(content: &str) -> Option<&str> {
    PAYLOAD_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|payload| !payload.is_empty())
}

/// Reads the first payload out of `content`. No markers, or nothing between
/// them, is `Ok(None)`; markers around invalid JSON is an error.
pub fn decode<T: DeserializeOwned>(content: &str) -> Result<Option<T>> {
    match find_payload(content) {
        Some(payload) => serde_json::from_str(payload)
            .map(Some)
            .map_err(Error::MalformedPayload),
        None => Ok(None),
    }
}

pub fn decode_value(content: &str) -> Result<Option<serde_json::Value>> {
    decode(content)
}

#[cfg(feature = "napi")]
#[napi]
pub fn build_comment_native(json: String) -> napi::Result<String> {
    let value: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| napi::Error::from_reason(format!("Payload parse error: {}", e)))?;
    encode(&value).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn read_comment_native(content: String) -> napi::Result<Option<String>> {
    let value = decode_value(&content).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(value.map(|v| v.to_string()))
}
