// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device discovery and accessory registration.
//!
//! The [`Platform`] runs once per session: it retires accessories restored
//! from a prior run, asks the bridge for the device list (with bounded
//! retry), and builds one tracker/accessory pair per discovered device.

use std::sync::Arc;
use std::time::Duration;

use crate::accessory::{AccessoryRecord, BulbAccessory, HostPlatform};
use crate::bridge::BridgeClient;
use crate::bulb::{PollOptions, TuyaBulb};
use crate::error::Error;
use crate::response::DeviceRecord;

/// Retry policy for device discovery.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::platform::DiscoveryOptions;
/// use std::time::Duration;
///
/// let options = DiscoveryOptions::new()
///     .with_retry_delay(Duration::from_secs(30))
///     .with_max_attempts(5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    retry_delay: Duration,
    max_attempts: u32,
}

impl DiscoveryOptions {
    /// Default delay between list-devices attempts.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
    /// Default total attempt budget.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Creates options with the defaults (10 s delay, 3 attempts).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the total attempt budget.
    ///
    /// A budget of zero is treated as one attempt.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Returns the total attempt budget.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            retry_delay: Self::DEFAULT_RETRY_DELAY,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Session-scoped discovery loop.
///
/// Holds the injected bridge client and host boundary; call
/// [`discover`](Self::discover) once the host signals startup is complete.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tuya_bridge_lib::accessory::HostPlatform;
/// use tuya_bridge_lib::bridge::BridgeConfig;
/// use tuya_bridge_lib::platform::Platform;
///
/// # async fn example(host: Arc<dyn HostPlatform>) -> tuya_bridge_lib::Result<()> {
/// let client = BridgeConfig::from_env().into_client()?;
/// let platform = Platform::new(client, host);
///
/// let accessories = platform.discover().await;
/// println!("registered {} accessories", accessories.len());
/// # Ok(())
/// # }
/// ```
pub struct Platform {
    client: BridgeClient,
    host: Arc<dyn HostPlatform>,
    discovery: DiscoveryOptions,
    polling: PollOptions,
}

impl Platform {
    /// Creates a platform with default discovery and polling options.
    #[must_use]
    pub fn new(client: BridgeClient, host: Arc<dyn HostPlatform>) -> Self {
        Self {
            client,
            host,
            discovery: DiscoveryOptions::default(),
            polling: PollOptions::default(),
        }
    }

    /// Sets the discovery retry policy.
    #[must_use]
    pub fn with_discovery_options(mut self, options: DiscoveryOptions) -> Self {
        self.discovery = options;
        self
    }

    /// Sets the polling periods used for each tracked bulb.
    #[must_use]
    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.polling = options;
        self
    }

    /// Runs the discovery sequence and returns the registered accessories.
    ///
    /// Accessories restored from a prior session are unregistered
    /// unconditionally before enumeration; the current design does not
    /// reconcile them with freshly discovered devices. If every
    /// list-devices attempt fails, the exhaustion is logged and an empty
    /// vec is returned: the session proceeds with zero accessories.
    pub async fn discover(&self) -> Vec<BulbAccessory> {
        self.retire_cached_accessories();

        let devices = match self.fetch_device_list().await {
            Ok(devices) => devices,
            Err(err) => {
                tracing::warn!(error = %err, "Giving up on device enumeration");
                return Vec::new();
            }
        };

        tracing::info!(count = devices.len(), "Found local devices from the bridge");

        devices
            .into_iter()
            .map(|device| self.register_device(device))
            .collect()
    }

    /// Unregisters every accessory the host restored from a prior session.
    fn retire_cached_accessories(&self) {
        for record in self.host.cached_accessories() {
            tracing::warn!(accessory = %record.display_name(), "Removing zombie accessory");
            self.host.unregister(&record);
        }
    }

    /// Fetches the device list with bounded retry.
    async fn fetch_device_list(&self) -> Result<Vec<DeviceRecord>, Error> {
        for attempt in 1..=self.discovery.max_attempts() {
            match self.client.list_devices().await {
                Ok(devices) => return Ok(devices),
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "Device enumeration failed");
                }
            }

            if attempt < self.discovery.max_attempts() {
                tracing::warn!(
                    delay_secs = self.discovery.retry_delay().as_secs(),
                    "Retrying device enumeration"
                );
                tokio::time::sleep(self.discovery.retry_delay()).await;
            }
        }

        Err(Error::DiscoveryExhausted {
            attempts: self.discovery.max_attempts(),
        })
    }

    /// Builds the tracker/accessory pair for one device and registers it.
    fn register_device(&self, device: DeviceRecord) -> BulbAccessory {
        tracing::debug!(device_id = %device.id, name = %device.name, "Processing device");

        let record = AccessoryRecord::for_device(device.clone());
        let handle = self.host.register(&record);

        let bulb = Arc::new(TuyaBulb::spawn(device, self.client.clone(), self.polling));
        BulbAccessory::new(bulb, handle)
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("base_url", &self.client.base_url())
            .field("discovery", &self.discovery)
            .field("polling", &self.polling)
            .finish_non_exhaustive()
    }
}
