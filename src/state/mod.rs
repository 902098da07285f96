// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb state tracking and change detection.
//!
//! [`BulbState`] is the cached view of one bulb: every field starts unknown
//! and is filled in as the bridge reports it. [`StateChange`] is the closed
//! set of per-field transitions emitted when two snapshots differ.

mod bulb_state;
mod state_change;

pub use bulb_state::{BulbState, StatusUpdate};
pub use state_change::StateChange;
