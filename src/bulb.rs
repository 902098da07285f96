// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-bulb state tracker.
//!
//! A [`TuyaBulb`] owns the authoritative cached state for one device and two
//! background tasks:
//!
//! - the **refresh** task polls the bridge's status endpoint and merges the
//!   result into the cache;
//! - the **watch** task diffs the cache against the previous snapshot and
//!   publishes one [`StateChange`] per observed transition.
//!
//! The watch period is shorter than the refresh period, so transitions are
//! observed within one watch tick of the refresh that produced them without
//! extra network calls. Both tasks are aborted when the bulb is dropped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::bridge::BridgeClient;
use crate::error::Result;
use crate::event::EventBus;
use crate::response::DeviceRecord;
use crate::state::{BulbState, StateChange};

/// Polling periods for a bulb tracker.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::bulb::PollOptions;
/// use std::time::Duration;
///
/// let options = PollOptions::new()
///     .with_refresh_interval(Duration::from_secs(10))
///     .with_watch_interval(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    refresh_interval: Duration,
    watch_interval: Duration,
}

impl PollOptions {
    /// Default period for fetching status from the bridge.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
    /// Default period for diffing state and emitting changes.
    pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates options with the default periods (5 s refresh, 1 s watch).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the refresh period.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the watch period.
    #[must_use]
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }

    /// Returns the refresh period.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Returns the watch period.
    #[must_use]
    pub fn watch_interval(&self) -> Duration {
        self.watch_interval
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
            watch_interval: Self::DEFAULT_WATCH_INTERVAL,
        }
    }
}

/// State pair guarded by one lock so a watch pass sees a consistent view.
#[derive(Debug, Default)]
struct StatePair {
    current: BulbState,
    previous: BulbState,
}

/// Data shared between the tracker handle and its background tasks.
#[derive(Debug)]
struct Shared {
    device: DeviceRecord,
    client: BridgeClient,
    state: RwLock<StatePair>,
    events: EventBus,
}

/// State tracker for one Tuya bulb.
///
/// Created via [`TuyaBulb::spawn`]; dropping the tracker cancels its
/// polling tasks.
///
/// # Examples
///
/// ```no_run
/// use tuya_bridge_lib::bridge::BridgeConfig;
/// use tuya_bridge_lib::bulb::{PollOptions, TuyaBulb};
/// use tuya_bridge_lib::response::DeviceRecord;
/// use tuya_bridge_lib::state::StateChange;
///
/// # async fn example() -> tuya_bridge_lib::Result<()> {
/// let client = BridgeConfig::from_env().into_client()?;
/// let device = DeviceRecord { id: "abc".into(), name: "Lamp".into() };
///
/// let bulb = TuyaBulb::spawn(device, client, PollOptions::new());
/// let mut changes = bulb.subscribe();
///
/// bulb.turn_on().await?;
/// assert!(bulb.power());
///
/// while let Ok(change) = changes.recv().await {
///     match change {
///         StateChange::Power(on) => println!("power: {on}"),
///         StateChange::Online(up) => println!("online: {up}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TuyaBulb {
    shared: Arc<Shared>,
    refresh_task: JoinHandle<()>,
    watch_task: JoinHandle<()>,
}

impl TuyaBulb {
    /// Starts tracking a device.
    ///
    /// Spawns the refresh and watch tasks immediately; the first refresh
    /// fires right away, so state is usually known within one round-trip.
    #[must_use]
    pub fn spawn(device: DeviceRecord, client: BridgeClient, options: PollOptions) -> Self {
        let shared = Arc::new(Shared {
            device,
            client,
            state: RwLock::new(StatePair::default()),
            events: EventBus::new(),
        });

        let refresh_task = tokio::spawn(refresh_loop(
            Arc::clone(&shared),
            options.refresh_interval(),
        ));
        let watch_task = tokio::spawn(watch_loop(Arc::clone(&shared), options.watch_interval()));

        Self {
            shared,
            refresh_task,
            watch_task,
        }
    }

    /// Returns the tracked device record.
    #[must_use]
    pub fn device(&self) -> &DeviceRecord {
        &self.shared.device
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.shared.device.id
    }

    /// Returns the device display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.device.name
    }

    /// Returns the cached power state, defaulting unknown to `false`.
    ///
    /// Never performs a network round-trip.
    #[must_use]
    pub fn power(&self) -> bool {
        self.shared.state.read().current.power()
    }

    /// Returns the cached online state (`None` until first reported).
    #[must_use]
    pub fn online(&self) -> Option<bool> {
        self.shared.state.read().current.online()
    }

    /// Subscribes to state changes emitted by the watch cycle.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.shared.events.subscribe()
    }

    /// Turns the bulb on.
    ///
    /// On success the commanded value is merged into the cache immediately,
    /// without waiting for the next refresh.
    ///
    /// # Errors
    ///
    /// Returns error if the command request fails or the bridge rejects it;
    /// the cached state is left unchanged in that case.
    pub async fn turn_on(&self) -> Result<()> {
        self.set_power(true).await
    }

    /// Turns the bulb off.
    ///
    /// # Errors
    ///
    /// Same as [`turn_on`](Self::turn_on).
    pub async fn turn_off(&self) -> Result<()> {
        self.set_power(false).await
    }

    async fn set_power(&self, on: bool) -> Result<()> {
        self.shared
            .client
            .set_power(&self.shared.device.id, on)
            .await?;

        tracing::info!(device_id = %self.shared.device.id, on, "Bulb power command accepted");

        self.shared.state.write().current.set_power(on);
        Ok(())
    }
}

impl Drop for TuyaBulb {
    fn drop(&mut self) {
        self.refresh_task.abort();
        self.watch_task.abort();
    }
}

/// Periodically fetches status from the bridge and merges it into the cache.
///
/// Fetch failures carry no new information: they are logged and the cache is
/// left untouched, so a transient network error never flips `online`.
async fn refresh_loop(shared: Arc<Shared>, period: Duration) {
    let mut ticker = tokio::time::interval(period);

    loop {
        ticker.tick().await;

        tracing::debug!(device_id = %shared.device.id, "Polling bulb state");

        match shared.client.status(&shared.device.id).await {
            Ok(update) => {
                shared.state.write().current.merge(&update);
            }
            Err(err) => {
                tracing::error!(
                    device_id = %shared.device.id,
                    error = %err,
                    "Failed to refresh bulb state"
                );
            }
        }
    }
}

/// Periodically diffs the cache against the previous snapshot and publishes
/// one change per transitioned field, then snapshots unconditionally.
async fn watch_loop(shared: Arc<Shared>, period: Duration) {
    let mut ticker = tokio::time::interval(period);

    loop {
        ticker.tick().await;

        let changes = {
            let mut pair = shared.state.write();
            let changes = pair.current.diff(&pair.previous);
            pair.previous = pair.current;
            changes
        };

        for change in changes {
            tracing::info!(device_id = %shared.device.id, change = ?change, "Bulb state changed");
            shared.events.publish(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_options_defaults() {
        let options = PollOptions::new();
        assert_eq!(options.refresh_interval(), Duration::from_secs(5));
        assert_eq!(options.watch_interval(), Duration::from_secs(1));
    }

    #[test]
    fn poll_options_chained() {
        let options = PollOptions::new()
            .with_refresh_interval(Duration::from_millis(50))
            .with_watch_interval(Duration::from_millis(10));

        assert_eq!(options.refresh_interval(), Duration::from_millis(50));
        assert_eq!(options.watch_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn drop_aborts_polling_tasks() {
        let client = crate::bridge::BridgeConfig::new("http://127.0.0.1:1")
            .into_client()
            .unwrap();
        let device = DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        };

        let bulb = TuyaBulb::spawn(device, client, PollOptions::new());
        let refresh = bulb.refresh_task.abort_handle();
        let watch = bulb.watch_task.abort_handle();

        drop(bulb);

        // Give the runtime a moment to process the aborts
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(refresh.is_finished());
        assert!(watch.is_finished());
    }
}
