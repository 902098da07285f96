// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain value types for the Tuya bridge protocol.
//!
//! Tuya devices report their controllable attributes as indexed "data points"
//! (DPS). The bridge forwards them verbatim, so the index table and the
//! bridge's numeric error codes live here as typed constants.

use std::fmt;

/// Tuya data-point (DPS) indices for RGB bulbs.
///
/// Each index addresses one controllable attribute in a bulb's status
/// payload. Only [`Dps::Power`] is consumed by the state tracker; the
/// remaining indices document the bridge's data-point contract.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::types::Dps;
///
/// assert_eq!(Dps::Power.index(), 20);
/// assert_eq!(Dps::Power.key(), "20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dps {
    /// On/off state.
    Power,
    /// Work mode (white / colour / scene).
    Mode,
    /// Brightness level.
    Brightness,
    /// White colour temperature.
    ColorTemp,
    /// Colour value.
    Color,
    /// Scene mode selection.
    SceneMode,
    /// Countdown timer.
    Ttl,
}

impl Dps {
    /// Returns the numeric DPS index used by the bridge.
    #[must_use]
    pub const fn index(&self) -> u8 {
        match self {
            Self::Power => 20,
            Self::Mode => 21,
            Self::Brightness => 22,
            Self::ColorTemp => 23,
            Self::Color => 24,
            Self::SceneMode => 25,
            Self::Ttl => 26,
        }
    }

    /// Returns the index as the string key used in `dps` JSON objects.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Power => "20",
            Self::Mode => "21",
            Self::Brightness => "22",
            Self::ColorTemp => "23",
            Self::Color => "24",
            Self::SceneMode => "25",
            Self::Ttl => "26",
        }
    }
}

impl fmt::Display for Dps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Numeric error codes returned by the bridge in the `Err` field of a
/// status response.
///
/// # Examples
///
/// ```
/// use tuya_bridge_lib::types::BridgeErrorCode;
///
/// let code = BridgeErrorCode::from_code(905).unwrap();
/// assert!(code.is_offline());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeErrorCode {
    /// Invalid JSON received from the device.
    Json,
    /// Network connection to the device failed.
    Connect,
    /// Device did not answer in time.
    Timeout,
    /// Value out of range.
    Range,
    /// Unexpected payload from the device.
    Payload,
    /// Device is unreachable on the local network.
    Offline,
    /// Device returned an invalid state.
    State,
    /// Function not supported by the device.
    Function,
    /// Unknown device type.
    DevType,
    /// Cloud key error.
    CloudKey,
    /// Unexpected cloud response.
    CloudResp,
    /// Cloud token error.
    CloudToken,
    /// Missing or invalid parameters.
    Params,
    /// Generic cloud error.
    Cloud,
}

impl BridgeErrorCode {
    /// Returns the numeric code used on the wire.
    #[must_use]
    pub const fn as_code(&self) -> u16 {
        match self {
            Self::Json => 900,
            Self::Connect => 901,
            Self::Timeout => 902,
            Self::Range => 903,
            Self::Payload => 904,
            Self::Offline => 905,
            Self::State => 906,
            Self::Function => 907,
            Self::DevType => 908,
            Self::CloudKey => 909,
            Self::CloudResp => 910,
            Self::CloudToken => 911,
            Self::Params => 912,
            Self::Cloud => 913,
        }
    }

    /// Parses a numeric code into a known error code.
    ///
    /// Returns `None` for codes outside the bridge's error table.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            900 => Some(Self::Json),
            901 => Some(Self::Connect),
            902 => Some(Self::Timeout),
            903 => Some(Self::Range),
            904 => Some(Self::Payload),
            905 => Some(Self::Offline),
            906 => Some(Self::State),
            907 => Some(Self::Function),
            908 => Some(Self::DevType),
            909 => Some(Self::CloudKey),
            910 => Some(Self::CloudResp),
            911 => Some(Self::CloudToken),
            912 => Some(Self::Params),
            913 => Some(Self::Cloud),
            _ => None,
        }
    }

    /// Returns `true` if this code means the device is offline.
    ///
    /// The offline code is the only one treated as an authoritative state
    /// change; all other codes are logged and ignored.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl fmt::Display for BridgeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_dps_index() {
        assert_eq!(Dps::Power.index(), 20);
        assert_eq!(Dps::Power.key(), "20");
    }

    #[test]
    fn dps_indices_are_sequential() {
        assert_eq!(Dps::Mode.index(), 21);
        assert_eq!(Dps::Brightness.index(), 22);
        assert_eq!(Dps::ColorTemp.index(), 23);
        assert_eq!(Dps::Color.index(), 24);
        assert_eq!(Dps::SceneMode.index(), 25);
        assert_eq!(Dps::Ttl.index(), 26);
    }

    #[test]
    fn dps_display_matches_key() {
        assert_eq!(Dps::Power.to_string(), "20");
    }

    #[test]
    fn error_code_round_trip() {
        for code in 900..=913 {
            let parsed = BridgeErrorCode::from_code(code).unwrap();
            assert_eq!(parsed.as_code(), code);
        }
    }

    #[test]
    fn error_code_unknown() {
        assert!(BridgeErrorCode::from_code(899).is_none());
        assert!(BridgeErrorCode::from_code(914).is_none());
        assert!(BridgeErrorCode::from_code(0).is_none());
    }

    #[test]
    fn offline_code() {
        assert!(BridgeErrorCode::Offline.is_offline());
        assert!(!BridgeErrorCode::Timeout.is_offline());
        assert_eq!(BridgeErrorCode::Offline.as_code(), 905);
    }

    #[test]
    fn error_code_display() {
        assert_eq!(BridgeErrorCode::Offline.to_string(), "905");
    }
}
