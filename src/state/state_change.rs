// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

/// A single observed transition in a bulb's state.
///
/// Changes are emitted by the tracker's watch cycle, one per field whose
/// value differs from the previous snapshot. Subscribers receive them via
/// the bulb's event bus.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::state::StateChange;
///
/// let change = StateChange::Power(true);
/// assert!(change.is_power());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Power state changed.
    Power(bool),
    /// Online state changed.
    Online(bool),
}

impl StateChange {
    /// Returns `true` if this is a power change.
    #[must_use]
    pub fn is_power(&self) -> bool {
        matches!(self, Self::Power(_))
    }

    /// Returns `true` if this is an online change.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online(_))
    }

    /// Returns the new value carried by the change.
    #[must_use]
    pub fn value(&self) -> bool {
        match self {
            Self::Power(v) | Self::Online(v) => *v,
        }
    }
}
