// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya Bridge Lib - expose Tuya bulbs behind a local HTTP bridge as
//! home-automation accessories.
//!
//! This library polls a local bridge service over HTTP for device state and
//! device lists, tracks per-bulb state with edge-triggered change
//! notifications, and adapts each bulb to a host platform's accessory and
//! characteristic model.
//!
//! # Architecture
//!
//! - **Bridge client**: request/response HTTP client for the bridge's REST
//!   surface (`/devices`, `/{id}/status`, `/{id}/on`, `/{id}/off`)
//! - **Bulb tracker**: per-device polling loop with a cached state pair and
//!   a faster change-detection cycle emitting typed state changes
//! - **Accessory adapter**: forwards state changes into host characteristic
//!   updates and relays host commands to the tracker
//! - **Platform**: one-shot-per-session discovery with bounded retry
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tuya_bridge_lib::accessory::HostPlatform;
//! use tuya_bridge_lib::{BridgeConfig, Platform};
//!
//! # async fn example(host: Arc<dyn HostPlatform>) -> tuya_bridge_lib::Result<()> {
//! // Bridge address from TUYA_BRIDGE_URL, or the default
//! let client = BridgeConfig::from_env().into_client()?;
//!
//! // Run discovery once the host has finished launching
//! let platform = Platform::new(client, host);
//! let accessories = platform.discover().await;
//!
//! for accessory in &accessories {
//!     println!("{} is {}", accessory.display_name(),
//!         if accessory.power() { "on" } else { "off" });
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Watching a Single Bulb
//!
//! ```no_run
//! use tuya_bridge_lib::bulb::{PollOptions, TuyaBulb};
//! use tuya_bridge_lib::response::DeviceRecord;
//! use tuya_bridge_lib::state::StateChange;
//! use tuya_bridge_lib::BridgeConfig;
//!
//! # async fn example() -> tuya_bridge_lib::Result<()> {
//! let client = BridgeConfig::from_env().into_client()?;
//! let device = DeviceRecord { id: "abc".into(), name: "Lamp".into() };
//!
//! let bulb = TuyaBulb::spawn(device, client, PollOptions::new());
//! let mut changes = bulb.subscribe();
//!
//! while let Ok(change) = changes.recv().await {
//!     match change {
//!         StateChange::Power(on) => println!("power: {on}"),
//!         StateChange::Online(up) => println!("online: {up}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod accessory;
pub mod bridge;
pub mod bulb;
pub mod error;
pub mod event;
pub mod platform;
pub mod response;
pub mod state;
pub mod types;

pub use accessory::{AccessoryHandle, AccessoryRecord, BulbAccessory, HostPlatform};
pub use bridge::{BridgeClient, BridgeConfig};
pub use bulb::{PollOptions, TuyaBulb};
pub use error::{Error, ParseError, ProtocolError, Result};
pub use event::EventBus;
pub use platform::{DiscoveryOptions, Platform};
pub use response::DeviceRecord;
pub use state::{BulbState, StateChange, StatusUpdate};
pub use types::{BridgeErrorCode, Dps};
