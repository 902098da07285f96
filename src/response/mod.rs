// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed payloads for the bridge's JSON responses.
//!
//! The bridge wraps every reply in a small JSON envelope: list and command
//! endpoints carry a body-level `status` field ("OK" on success), while the
//! status endpoint returns either a `dps` data-point map or an `Err` code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{BridgeErrorCode, Dps};

/// One device entry in a `GET /devices` response.
///
/// The `id` is an opaque identifier, stable across sessions; `name` is the
/// display label shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Opaque device identifier.
    pub id: String,
    /// Display label.
    pub name: String,
}

/// Response body of `GET /devices`.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::response::DeviceListResponse;
///
/// let body = r#"{"status":"OK","devices":[{"id":"abc","name":"Lamp"}]}"#;
/// let resp: DeviceListResponse = serde_json::from_str(body).unwrap();
/// assert!(resp.is_ok());
/// assert_eq!(resp.devices[0].name, "Lamp");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceListResponse {
    /// Body-level status field; "OK" on success.
    pub status: Option<String>,
    /// Discovered devices. Absent on failure.
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

impl DeviceListResponse {
    /// Returns `true` if the body-level status equals "OK".
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}

/// Response body of `GET /{id}/status`.
///
/// Exactly one of `dps` or `err` is meaningful: a healthy device reports its
/// data points, an unreachable one an error code.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::response::StatusResponse;
/// use tuya_bridge_lib::types::BridgeErrorCode;
///
/// let healthy: StatusResponse = serde_json::from_str(r#"{"dps":{"20":true}}"#).unwrap();
/// assert_eq!(healthy.power(), Some(true));
///
/// let offline: StatusResponse = serde_json::from_str(r#"{"Err":"905"}"#).unwrap();
/// assert_eq!(offline.error_code(), Some(BridgeErrorCode::Offline));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Data-point map, keyed by DPS index as a string.
    pub dps: Option<HashMap<String, serde_json::Value>>,
    /// Bridge error code. The bridge serializes it as a string.
    #[serde(rename = "Err")]
    pub err: Option<serde_json::Value>,
}

impl StatusResponse {
    /// Returns the power data point (DPS 20), if present.
    ///
    /// Only a strict boolean `true` counts as on; any other value (including
    /// truthy strings) is off.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.dps
            .as_ref()?
            .get(Dps::Power.key())
            .map(|v| v == &serde_json::Value::Bool(true))
    }

    /// Returns the parsed bridge error code, if the response carries one.
    ///
    /// The bridge sends codes as strings (`"905"`), but numeric values are
    /// accepted too.
    #[must_use]
    pub fn error_code(&self) -> Option<BridgeErrorCode> {
        let raw = self.err.as_ref()?;
        let code = match raw {
            serde_json::Value::String(s) => s.parse::<u16>().ok()?,
            serde_json::Value::Number(n) => u16::try_from(n.as_u64()?).ok()?,
            _ => return None,
        };
        BridgeErrorCode::from_code(code)
    }

    /// Returns `true` if the response carries an `Err` field.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.err.is_some()
    }
}

/// Response body of the `/on` and `/off` command endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    /// Body-level status field; "OK" on success.
    pub status: Option<String>,
}

impl CommandResponse {
    /// Returns `true` if the body-level status equals "OK".
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_list_ok() {
        let body = r#"{"status":"OK","devices":[{"id":"abc","name":"Lamp"}]}"#;
        let resp: DeviceListResponse = serde_json::from_str(body).unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.devices.len(), 1);
        assert_eq!(resp.devices[0].id, "abc");
        assert_eq!(resp.devices[0].name, "Lamp");
    }

    #[test]
    fn device_list_not_ok() {
        let body = r#"{"status":"ERROR"}"#;
        let resp: DeviceListResponse = serde_json::from_str(body).unwrap();
        assert!(!resp.is_ok());
        assert!(resp.devices.is_empty());
    }

    #[test]
    fn device_list_missing_status() {
        let resp: DeviceListResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.is_ok());
    }

    #[test]
    fn status_power_on() {
        let resp: StatusResponse = serde_json::from_str(r#"{"dps":{"20":true}}"#).unwrap();
        assert_eq!(resp.power(), Some(true));
        assert!(!resp.is_error());
    }

    #[test]
    fn status_power_off() {
        let resp: StatusResponse = serde_json::from_str(r#"{"dps":{"20":false}}"#).unwrap();
        assert_eq!(resp.power(), Some(false));
    }

    #[test]
    fn status_power_requires_strict_bool() {
        // "true" as a string must not count as on
        let resp: StatusResponse = serde_json::from_str(r#"{"dps":{"20":"true"}}"#).unwrap();
        assert_eq!(resp.power(), Some(false));
    }

    #[test]
    fn status_power_missing_dps() {
        let resp: StatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.power(), None);
    }

    #[test]
    fn status_power_missing_index() {
        let resp: StatusResponse = serde_json::from_str(r#"{"dps":{"22":50}}"#).unwrap();
        assert_eq!(resp.power(), None);
    }

    #[test]
    fn status_error_code_string() {
        let resp: StatusResponse = serde_json::from_str(r#"{"Err":"905"}"#).unwrap();
        assert_eq!(resp.error_code(), Some(BridgeErrorCode::Offline));
        assert!(resp.is_error());
    }

    #[test]
    fn status_error_code_numeric() {
        let resp: StatusResponse = serde_json::from_str(r#"{"Err":902}"#).unwrap();
        assert_eq!(resp.error_code(), Some(BridgeErrorCode::Timeout));
    }

    #[test]
    fn status_error_code_unknown() {
        let resp: StatusResponse = serde_json::from_str(r#"{"Err":"123"}"#).unwrap();
        assert_eq!(resp.error_code(), None);
        assert!(resp.is_error());
    }

    #[test]
    fn command_response_ok() {
        let resp: CommandResponse = serde_json::from_str(r#"{"status":"OK"}"#).unwrap();
        assert!(resp.is_ok());
    }

    #[test]
    fn command_response_not_ok() {
        let resp: CommandResponse = serde_json::from_str(r#"{"status":"FAIL"}"#).unwrap();
        assert!(!resp.is_ok());
    }
}
