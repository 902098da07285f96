// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the local Tuya bridge service.
//!
//! The bridge exposes a small REST surface: `GET /devices` for enumeration,
//! `GET /{id}/status` for one device's data points, and `GET /{id}/on` /
//! `GET /{id}/off` for power commands. This module is pure request/response;
//! retry and polling policy live one layer up.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, ParseError, ProtocolError};
use crate::response::{CommandResponse, DeviceListResponse, DeviceRecord, StatusResponse};
use crate::state::StatusUpdate;

// ============================================================================
// BridgeConfig - Connection parameters for the bridge service
// ============================================================================

/// Configuration for connecting to the bridge service.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::bridge::BridgeConfig;
/// use std::time::Duration;
///
/// // Default bridge address
/// let config = BridgeConfig::default();
///
/// // Explicit address with a custom timeout
/// let config = BridgeConfig::new("http://10.0.0.5:5000")
///     .with_timeout(Duration::from_secs(5));
///
/// // Environment override (TUYA_BRIDGE_URL), falling back to the default
/// let config = BridgeConfig::from_env();
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    base_url: String,
    timeout: Duration,
}

impl BridgeConfig {
    /// Default bridge address on the local network.
    pub const DEFAULT_BASE_URL: &'static str = "http://192.168.0.177:5000";
    /// Environment variable overriding the bridge address.
    pub const ENV_BASE_URL: &'static str = "TUYA_BRIDGE_URL";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the specified base URL.
    ///
    /// A trailing slash is stripped so paths can be appended directly.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration from the `TUYA_BRIDGE_URL` environment
    /// variable, falling back to the default bridge address.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_BASE_URL) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates a [`BridgeClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<BridgeClient, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(BridgeClient {
            base_url: self.base_url,
            client,
        })
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

// ============================================================================
// BridgeClient - Request/response client for the bridge REST surface
// ============================================================================

/// HTTP client for the bridge service.
///
/// One instance is shared by the discovery loop and every bulb tracker;
/// construct it once and inject it (there is no global singleton).
///
/// # Examples
///
/// ```no_run
/// use tuya_bridge_lib::bridge::BridgeConfig;
///
/// # async fn example() -> tuya_bridge_lib::Result<()> {
/// let client = BridgeConfig::from_env().into_client()?;
/// let devices = client.list_devices().await?;
/// for device in &devices {
///     println!("{} ({})", device.name, device.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BridgeClient {
    base_url: String,
    client: Client,
}

impl BridgeClient {
    /// Returns the base URL of the bridge.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a device-scoped endpoint.
    fn device_url(&self, id: &str, endpoint: &str) -> String {
        format!("{}/{}/{endpoint}", self.base_url, urlencoding::encode(id))
    }

    /// Issues a GET request and returns the body on HTTP success.
    async fn get_body(&self, url: &str) -> Result<String, ProtocolError> {
        tracing::debug!(url = %url, "Sending bridge request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if !response.status().is_success() {
            return Err(ProtocolError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received bridge response");

        Ok(body)
    }

    /// Fetches the list of devices known to the bridge.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the HTTP status is not success,
    /// the body cannot be parsed, or the body-level status is not "OK".
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = format!("{}/devices", self.base_url);
        let body = self.get_body(&url).await?;

        let response: DeviceListResponse =
            serde_json::from_str(&body).map_err(ParseError::Json)?;

        if !response.is_ok() {
            return Err(ProtocolError::Rejected(
                response.status.unwrap_or_else(|| "missing status".to_string()),
            )
            .into());
        }

        Ok(response.devices)
    }

    /// Fetches the current status of one device.
    ///
    /// A response carrying the offline error code is a successful fetch
    /// reporting `online = false`; the cached power value is left for the
    /// caller to preserve.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the body carries a non-offline
    /// error code, or the body has neither an error code nor a `dps` map.
    pub async fn status(&self, id: &str) -> Result<StatusUpdate, Error> {
        let url = self.device_url(id, "status");
        let body = self.get_body(&url).await?;

        let response: StatusResponse = serde_json::from_str(&body).map_err(ParseError::Json)?;

        if response.is_error() {
            if response.error_code().is_some_and(|code| code.is_offline()) {
                tracing::debug!(device_id = %id, "Bridge reports device offline");
                return Ok(StatusUpdate::offline());
            }
            return Err(ProtocolError::Rejected(format!(
                "status error for device {id}: {:?}",
                response.err
            ))
            .into());
        }

        if response.dps.is_none() {
            return Err(ParseError::MissingField("dps".to_string()).into());
        }

        // dps["20"] must be a strict boolean true; a missing power data
        // point reads as off, matching the bridge contract.
        Ok(StatusUpdate::online(response.power().unwrap_or(false)))
    }

    /// Commands a device's power state via the `/on` or `/off` endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body-level status is
    /// not "OK".
    pub async fn set_power(&self, id: &str, on: bool) -> Result<(), Error> {
        let endpoint = if on { "on" } else { "off" };
        let url = self.device_url(id, endpoint);
        let body = self.get_body(&url).await?;

        let response: CommandResponse = serde_json::from_str(&body).map_err(ParseError::Json)?;

        if !response.is_ok() {
            return Err(ProtocolError::Rejected(
                response.status.unwrap_or_else(|| "missing status".to_string()),
            )
            .into());
        }

        Ok(())
    }
}
