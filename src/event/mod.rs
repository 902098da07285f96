// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event distribution for bulb state changes.
//!
//! Each tracked bulb owns an [`EventBus`] that broadcasts
//! [`StateChange`](crate::state::StateChange) values to any number of
//! subscribers. The accessory adapter is the primary consumer.

mod event_bus;

pub use event_bus::EventBus;
