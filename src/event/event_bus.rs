// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting state changes.

use tokio::sync::broadcast;

use crate::state::StateChange;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Event bus for broadcasting state changes to multiple subscribers.
///
/// Built on tokio's broadcast channel: every subscriber receives its own
/// copy of each change. If a slow subscriber falls more than the channel
/// capacity behind, it loses the oldest events (`RecvError::Lagged`).
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::event::EventBus;
/// use tuya_bridge_lib::state::StateChange;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StateChange::Power(true));
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<StateChange>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to state changes.
    ///
    /// The receiver observes all changes published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes a change to all subscribers.
    ///
    /// If there are no subscribers, the change is silently discarded.
    pub fn publish(&self, change: StateChange) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(change);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
