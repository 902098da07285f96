// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Tuya bridge library.
//!
//! This module provides the error hierarchy for failures across the library:
//! HTTP communication with the bridge service, JSON payload parsing, and
//! device discovery.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when talking
/// to the local Tuya bridge service.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during HTTP communication with the bridge.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a bridge response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Device discovery gave up after exhausting its retry budget.
    #[error("device discovery exhausted after {attempts} attempts")]
    DiscoveryExhausted {
        /// Number of list-devices attempts made before giving up.
        attempts: u32,
    },
}

/// Errors related to HTTP communication with the bridge service.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// The bridge answered HTTP 200 but the body-level status was not "OK".
    #[error("bridge rejected request: {0}")]
    Rejected(String),
}

/// Errors related to parsing bridge responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::UnexpectedStatus(500);
        assert_eq!(err.to_string(), "unexpected HTTP status 500");
    }

    #[test]
    fn rejected_error_display() {
        let err = ProtocolError::Rejected("ERROR".to_string());
        assert_eq!(err.to_string(), "bridge rejected request: ERROR");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("dps".to_string());
        assert_eq!(err.to_string(), "missing field in response: dps");
    }

    #[test]
    fn error_from_parse_error() {
        let parse_err = ParseError::MissingField("devices".to_string());
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Parse(ParseError::MissingField(_))));
    }

    #[test]
    fn discovery_exhausted_display() {
        let err = Error::DiscoveryExhausted { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "device discovery exhausted after 3 attempts"
        );
    }
}
