// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-platform accessory adapter.
//!
//! The host platform (the home-automation bridge this library plugs into) is
//! an external collaborator, modeled by the [`HostPlatform`] and
//! [`AccessoryHandle`] traits. A [`BulbAccessory`] sits between one tracked
//! bulb and one registered host accessory: it forwards state changes up into
//! characteristic updates and relays user commands down into the tracker.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::bulb::TuyaBulb;
use crate::error::Result;
use crate::response::DeviceRecord;
use crate::state::StateChange;

/// Identity of one host-visible accessory.
///
/// The UUID is derived deterministically from the device id, so the same
/// physical bulb maps to the same accessory across sessions.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::accessory::AccessoryRecord;
/// use tuya_bridge_lib::response::DeviceRecord;
///
/// let device = DeviceRecord { id: "abc".into(), name: "Lamp".into() };
/// let record = AccessoryRecord::for_device(device.clone());
/// assert_eq!(record.uuid, AccessoryRecord::for_device(device).uuid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessoryRecord {
    /// Stable accessory UUID, derived from the device id.
    pub uuid: Uuid,
    /// The device this accessory represents.
    pub device: DeviceRecord,
}

impl AccessoryRecord {
    /// Creates a record for a device, deriving the accessory UUID from the
    /// device id.
    #[must_use]
    pub fn for_device(device: DeviceRecord) -> Self {
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, device.id.as_bytes());
        Self { uuid, device }
    }

    /// Returns the display name of the accessory.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.device.name
    }
}

/// Host-platform side of one registered accessory.
///
/// Implementations push values into the host's characteristic layer.
pub trait AccessoryHandle: Send + Sync {
    /// Pushes a new power value to the host characteristic.
    fn update_power(&self, on: bool);

    /// Surfaces a communication failure so the host marks the accessory
    /// unreachable.
    fn communication_failure(&self);
}

/// Host-platform boundary for accessory registration.
///
/// The discovery loop uses this to retire accessories restored from a prior
/// session and to register freshly discovered ones.
pub trait HostPlatform: Send + Sync {
    /// Returns accessories the host restored from a prior session.
    fn cached_accessories(&self) -> Vec<AccessoryRecord>;

    /// Registers an accessory and returns the handle for characteristic
    /// updates.
    fn register(&self, record: &AccessoryRecord) -> Arc<dyn AccessoryHandle>;

    /// Unregisters an accessory.
    fn unregister(&self, record: &AccessoryRecord);
}

/// Adapter between one tracked bulb and one host accessory.
///
/// Owns a forwarding task that consumes the bulb's state changes:
///
/// - power change → push the new value to the host;
/// - offline → surface a communication failure;
/// - back online → push the current power value to resynchronize the host.
///
/// Dropping the accessory cancels the forwarding task.
pub struct BulbAccessory {
    record: AccessoryRecord,
    bulb: Arc<TuyaBulb>,
    forward_task: JoinHandle<()>,
}

impl BulbAccessory {
    /// Creates the adapter and starts forwarding bulb events to the host
    /// handle.
    #[must_use]
    pub fn new(bulb: Arc<TuyaBulb>, handle: Arc<dyn AccessoryHandle>) -> Self {
        let record = AccessoryRecord::for_device(bulb.device().clone());
        let rx = bulb.subscribe();
        let forward_task = tokio::spawn(forward_loop(rx, Arc::clone(&bulb), handle));

        Self {
            record,
            bulb,
            forward_task,
        }
    }

    /// Returns the accessory record.
    #[must_use]
    pub fn record(&self) -> &AccessoryRecord {
        &self.record
    }

    /// Returns the accessory UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.record.uuid
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.record.display_name()
    }

    /// Returns the tracked bulb.
    #[must_use]
    pub fn bulb(&self) -> &Arc<TuyaBulb> {
        &self.bulb
    }

    /// Host-issued read of the power characteristic.
    ///
    /// Answers from the cache; never performs a network round-trip.
    #[must_use]
    pub fn power(&self) -> bool {
        self.bulb.power()
    }

    /// Host-issued write of the power characteristic.
    ///
    /// # Errors
    ///
    /// Propagates command failures so the host can surface a communication
    /// failure instead of silently dropping the write.
    pub async fn set_power(&self, on: bool) -> Result<()> {
        tracing::info!(accessory = %self.record.display_name(), on, "Host set power");

        if on {
            self.bulb.turn_on().await
        } else {
            self.bulb.turn_off().await
        }
    }
}

impl Drop for BulbAccessory {
    fn drop(&mut self) {
        self.forward_task.abort();
    }
}

impl std::fmt::Debug for BulbAccessory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulbAccessory")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

/// Consumes bulb state changes and pushes them into the host handle.
async fn forward_loop(
    mut rx: broadcast::Receiver<StateChange>,
    bulb: Arc<TuyaBulb>,
    handle: Arc<dyn AccessoryHandle>,
) {
    loop {
        match rx.recv().await {
            Ok(StateChange::Power(on)) => {
                handle.update_power(on);
            }
            Ok(StateChange::Online(false)) => {
                tracing::warn!(device_id = %bulb.id(), "Bulb went offline");
                handle.communication_failure();
            }
            Ok(StateChange::Online(true)) => {
                tracing::info!(device_id = %bulb.id(), "Bulb came back online");
                handle.update_power(bulb.power());
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                // Resynchronize after losing events
                tracing::warn!(device_id = %bulb.id(), missed, "Event stream lagged");
                handle.update_power(bulb.power());
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uuid_is_stable() {
        let device = DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        };

        let a = AccessoryRecord::for_device(device.clone());
        let b = AccessoryRecord::for_device(device);
        assert_eq!(a.uuid, b.uuid);
    }

    #[test]
    fn record_uuid_differs_per_device() {
        let a = AccessoryRecord::for_device(DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        });
        let b = AccessoryRecord::for_device(DeviceRecord {
            id: "def".to_string(),
            name: "Lamp".to_string(),
        });

        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn record_uuid_ignores_name() {
        let a = AccessoryRecord::for_device(DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        });
        let b = AccessoryRecord::for_device(DeviceRecord {
            id: "abc".to_string(),
            name: "Renamed Lamp".to_string(),
        });

        assert_eq!(a.uuid, b.uuid);
    }

    #[test]
    fn record_display_name() {
        let record = AccessoryRecord::for_device(DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        });
        assert_eq!(record.display_name(), "Lamp");
    }

    #[test]
    fn record_serde_round_trip() {
        let record = AccessoryRecord::for_device(DeviceRecord {
            id: "abc".to_string(),
            name: "Lamp".to_string(),
        });

        let json = serde_json::to_string(&record).unwrap();
        let back: AccessoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
