//! Core types for the HLK-SW16 relay service
//!
//! This crate provides the data model shared by the device client and the
//! HTTP API: relay states decoded from raw device frames, and the switch
//! request accepted by the API. Nothing here performs I/O.

mod relay;
mod switch;

pub use relay::{decode_relays, validate_frame, RelayState, Relays, RAW_OFF, RAW_ON, RAW_UNCHANGED};
pub use switch::{Switch, SwitchError, SwitchRequest, SWITCH_OFF, SWITCH_ON};

/// Number of relays on an HLK-SW16 board
pub const RELAY_COUNT: usize = 16;

/// Offset of the first relay state byte in a device frame
pub const STATE_OFFSET: usize = 2;

/// Exclusive end offset of the relay state bytes in a device frame
pub const STATE_END: usize = STATE_OFFSET + RELAY_COUNT;
