// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached bulb state.

use super::StateChange;

/// A parsed status-endpoint result, ready to merge into a [`BulbState`].
///
/// `power` is `None` when the bridge reported the device offline (the offline
/// error code carries no data points), in which case the cached power value
/// must be left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Whether the device is reachable.
    pub online: bool,
    /// Power data point, if the response carried one.
    pub power: Option<bool>,
}

impl StatusUpdate {
    /// Creates an update for a healthy device reporting its power state.
    #[must_use]
    pub fn online(power: bool) -> Self {
        Self {
            online: true,
            power: Some(power),
        }
    }

    /// Creates an update for a device the bridge reported offline.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            online: false,
            power: None,
        }
    }
}

/// Tracked state of one Tuya bulb.
///
/// Both fields are optional because state is unknown until the bridge first
/// reports it. Updates use shallow-merge semantics: fields absent from an
/// update retain their prior values.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::state::{BulbState, StatusUpdate};
///
/// let mut state = BulbState::new();
/// assert!(!state.power()); // unknown defaults to off
///
/// state.merge(&StatusUpdate::online(true));
/// assert!(state.power());
/// assert_eq!(state.online(), Some(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulbState {
    power: Option<bool>,
    online: Option<bool>,
}

impl BulbState {
    /// Creates a new state with both fields unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the known power state, defaulting unknown to `false`.
    #[must_use]
    pub fn power(&self) -> bool {
        self.power.unwrap_or(false)
    }

    /// Returns the raw power field (`None` until first reported).
    #[must_use]
    pub fn power_raw(&self) -> Option<bool> {
        self.power
    }

    /// Returns the online state (`None` until first reported).
    #[must_use]
    pub fn online(&self) -> Option<bool> {
        self.online
    }

    /// Sets the power field.
    pub fn set_power(&mut self, on: bool) {
        self.power = Some(on);
    }

    /// Sets the online field.
    pub fn set_online(&mut self, online: bool) {
        self.online = Some(online);
    }

    /// Merges a status update into this state.
    ///
    /// The online field always takes the reported value; power only updates
    /// when the response carried the data point.
    pub fn merge(&mut self, update: &StatusUpdate) {
        self.online = Some(update.online);
        if let Some(power) = update.power {
            self.power = Some(power);
        }
    }

    /// Compares this state against a previous snapshot and returns one
    /// change per field whose value differs.
    ///
    /// Power transitions are reported before online transitions. An
    /// unknown-to-known transition counts as a change.
    #[must_use]
    pub fn diff(&self, previous: &Self) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if self.power != previous.power {
            changes.push(StateChange::Power(self.power()));
        }

        if self.online != previous.online
            && let Some(online) = self.online
        {
            changes.push(StateChange::Online(online));
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_unknown() {
        let state = BulbState::new();
        assert!(state.power_raw().is_none());
        assert!(state.online().is_none());
    }

    #[test]
    fn unknown_power_defaults_to_off() {
        let state = BulbState::new();
        assert!(!state.power());
    }

    #[test]
    fn merge_online_update() {
        let mut state = BulbState::new();
        state.merge(&StatusUpdate::online(true));

        assert!(state.power());
        assert_eq!(state.online(), Some(true));
    }

    #[test]
    fn merge_offline_preserves_power() {
        let mut state = BulbState::new();
        state.merge(&StatusUpdate::online(true));
        state.merge(&StatusUpdate::offline());

        // offline flips reachability but leaves the last known power alone
        assert!(state.power());
        assert_eq!(state.online(), Some(false));
    }

    #[test]
    fn merge_offline_before_any_power() {
        let mut state = BulbState::new();
        state.merge(&StatusUpdate::offline());

        assert!(state.power_raw().is_none());
        assert_eq!(state.online(), Some(false));
    }

    #[test]
    fn diff_empty_for_identical_states() {
        let mut state = BulbState::new();
        state.merge(&StatusUpdate::online(true));
        let snapshot = state;

        assert!(state.diff(&snapshot).is_empty());
    }

    #[test]
    fn diff_detects_power_transition() {
        let mut previous = BulbState::new();
        previous.merge(&StatusUpdate::online(false));

        let mut current = previous;
        current.set_power(true);

        let changes = current.diff(&previous);
        assert_eq!(changes, vec![StateChange::Power(true)]);
    }

    #[test]
    fn diff_detects_unknown_to_known() {
        let previous = BulbState::new();
        let mut current = BulbState::new();
        current.merge(&StatusUpdate::online(false));

        let changes = current.diff(&previous);
        assert_eq!(
            changes,
            vec![StateChange::Power(false), StateChange::Online(true)]
        );
    }

    #[test]
    fn diff_detects_offline_transition() {
        let mut previous = BulbState::new();
        previous.merge(&StatusUpdate::online(true));

        let mut current = previous;
        current.merge(&StatusUpdate::offline());

        let changes = current.diff(&previous);
        assert_eq!(changes, vec![StateChange::Online(false)]);
    }

    #[test]
    fn diff_reports_both_fields() {
        let mut previous = BulbState::new();
        previous.merge(&StatusUpdate::offline());

        let mut current = previous;
        current.merge(&StatusUpdate::online(true));

        let changes = current.diff(&previous);
        assert_eq!(
            changes,
            vec![StateChange::Power(true), StateChange::Online(true)]
        );
    }
}
