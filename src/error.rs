// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hugh_lib` library.
//!
//! Errors reported by the bridge itself (pairing refusals, rejected
//! requests) are kept apart from transport failures so callers can tell a
//! bridge that said "no" from a bridge that could not be reached.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Bridge error code for an unknown or revoked credential.
pub const UNAUTHORIZED_USER: u64 = 1;

/// Bridge error code returned while the pairing link button has not been pressed.
pub const LINK_BUTTON_NOT_PRESSED: u64 = 101;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Pairing was refused by the bridge, or re-pairing during a request
    /// retry did not produce a credential.
    #[error("authentication error: {0}")]
    Auth(BridgeError),

    /// An authenticated request was rejected by the bridge.
    #[error("API error: {0}")]
    Api(BridgeError),

    /// The bridge could not be reached or did not answer with JSON.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The bridge answered with a shape the endpoint does not allow.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid access to a record field.
    #[error("field error: {0}")]
    Field(#[from] FieldError),
}

impl Error {
    /// Returns the bridge payload for [`Error::Auth`] and [`Error::Api`].
    #[must_use]
    pub fn bridge_error(&self) -> Option<&BridgeError> {
        match self {
            Self::Auth(err) | Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// An `error` object reported by the bridge, kept verbatim.
///
/// The bridge answers failed calls with `[{"error": {"type": 1, "address":
/// "/lights", "description": "unauthorized user"}}]`. The inner object is
/// stored unmodified; the accessors only read from it.
///
/// # Examples
///
/// ```
/// use hugh_lib::error::BridgeError;
/// use serde_json::json;
///
/// let err = BridgeError::new(json!({"type": 101, "address": "", "description": "link button not pressed"}));
/// assert_eq!(err.error_type(), Some(101));
/// assert!(err.is_link_button_not_pressed());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeError {
    payload: Value,
}

impl BridgeError {
    /// Wraps a bridge `error` object.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consumes the error and returns the raw payload.
    #[must_use]
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Returns the numeric `type` code, if present.
    #[must_use]
    pub fn error_type(&self) -> Option<u64> {
        self.payload.get("type").and_then(Value::as_u64)
    }

    /// Returns the resource address the error refers to, if present.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.payload.get("address").and_then(Value::as_str)
    }

    /// Returns the bridge's description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.payload.get("description").and_then(Value::as_str)
    }

    /// Whether the bridge rejected the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.error_type() == Some(UNAUTHORIZED_USER)
    }

    /// Whether the bridge is waiting for its link button.
    #[must_use]
    pub fn is_link_button_not_pressed(&self) -> bool {
        self.error_type() == Some(LINK_BUTTON_NOT_PRESSED)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.error_type(), self.description()) {
            (Some(code), Some(desc)) => write!(f, "type {code}: {desc}"),
            (Some(code), None) => write!(f, "type {code}"),
            _ => write!(f, "{}", self.payload),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Errors raised below the bridge protocol: connection, HTTP status, JSON.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The bridge answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body text.
        body: String,
    },

    /// Invalid bridge address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to the shape of bridge responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// A resource identifier does not convert to its declared type.
    #[error("invalid {kind} identifier: {id}")]
    InvalidIdentifier {
        /// The resource kind being parsed.
        kind: &'static str,
        /// The identifier as sent by the bridge.
        id: String,
    },
}

/// Errors related to reading and writing record fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The record has no field with this name.
    #[error("no such field: {0}")]
    NoSuchField(String),

    /// The field is structural and cannot be written.
    #[error("field is read-only: {0}")]
    ReadOnly(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bridge_error_accessors() {
        let err = BridgeError::new(json!({
            "type": 1,
            "address": "/lights",
            "description": "unauthorized user"
        }));
        assert_eq!(err.error_type(), Some(1));
        assert_eq!(err.address(), Some("/lights"));
        assert_eq!(err.description(), Some("unauthorized user"));
        assert!(err.is_unauthorized());
        assert!(!err.is_link_button_not_pressed());
    }

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::new(json!({"type": 7, "description": "invalid value"}));
        assert_eq!(err.to_string(), "type 7: invalid value");

        let err = BridgeError::new(json!({"type": 7}));
        assert_eq!(err.to_string(), "type 7");
    }

    #[test]
    fn bridge_error_without_type() {
        let err = BridgeError::new(json!({"description": "odd"}));
        assert_eq!(err.error_type(), None);
        assert!(!err.is_unauthorized());
        assert_eq!(err.to_string(), r#"{"description":"odd"}"#);
    }

    #[test]
    fn payload_is_kept_verbatim() {
        let payload = json!({"type": 3, "address": "/lights/9", "description": "resource not available", "extra": [1]});
        let err = Error::Api(BridgeError::new(payload.clone()));
        assert_eq!(err.bridge_error().unwrap().payload(), &payload);
    }

    #[test]
    fn transport_error_is_not_a_bridge_error() {
        let err: Error = TransportError::InvalidAddress(String::new()).into();
        assert!(err.bridge_error().is_none());
    }

    #[test]
    fn field_error_display() {
        let err = FieldError::NoSuchField("hue".to_string());
        assert_eq!(err.to_string(), "no such field: hue");
        let err: Error = err.into();
        assert!(matches!(err, Error::Field(FieldError::NoSuchField(_))));
    }
}
