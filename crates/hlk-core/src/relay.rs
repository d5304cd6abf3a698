//! Relay state decoding from raw device frames
//!
//! Each status frame carries one byte per relay at offsets 2..18. The device
//! reports `0` for off, `1` for on and `2` for "no change", which the board
//! only emits for relays that are off. Any larger value means the frame was
//! sampled while the board was still updating.

use serde::{Deserialize, Serialize};

use crate::{RELAY_COUNT, STATE_OFFSET};

/// Raw byte for a relay that is off
pub const RAW_OFF: u8 = 0;

/// Raw byte for a relay that is on
pub const RAW_ON: u8 = 1;

/// Raw "no change" sentinel, reported as off
pub const RAW_UNCHANGED: u8 = 2;

/// State of a single relay as reported by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
    /// Relay index, 0-based
    pub id: usize,
    /// 0 for off, the raw device value otherwise (1 for on)
    pub state: u8,
}

impl RelayState {
    /// Whether the relay is switched on
    pub fn is_on(&self) -> bool {
        self.state != RAW_OFF
    }
}

/// Full relay listing returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relays {
    pub relays: Vec<RelayState>,
}

impl Relays {
    /// Decode a listing from a raw device frame
    pub fn from_frame(frame: &[u8]) -> Self {
        Self {
            relays: decode_relays(frame),
        }
    }
}

/// Decode the relay states carried by a device frame.
///
/// Short frames yield fewer entries; bytes past the state window are ignored.
pub fn decode_relays(frame: &[u8]) -> Vec<RelayState> {
    frame
        .iter()
        .enumerate()
        .skip(STATE_OFFSET)
        .take(RELAY_COUNT)
        .map(|(index, &raw)| RelayState {
            id: index - STATE_OFFSET,
            state: if raw == RAW_UNCHANGED { RAW_OFF } else { raw },
        })
        .collect()
}

/// Check that every relay state byte in the frame is a known value.
///
/// Returns `false` when the board answered mid-transition and the frame
/// should be requested again.
pub fn validate_frame(frame: &[u8]) -> bool {
    frame
        .iter()
        .skip(STATE_OFFSET)
        .take(RELAY_COUNT)
        .all(|&raw| raw <= RAW_UNCHANGED)
}
