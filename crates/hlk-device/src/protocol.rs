//! HLK-SW16 frame layout
//!
//! Every frame is 20 bytes. Requests start with `0xAA`, carry a command byte
//! and up to 16 data bytes, and end with `0x0B 0xBB`. Responses start with
//! `0xCC`, carry a response code and 16 relay state bytes, and end with
//! `0xDD`.

use hlk_core::{Switch, RELAY_COUNT};

use crate::error::{DeviceError, DeviceResult};

/// Length of every frame exchanged with the board
pub const FRAME_LEN: usize = 20;

const REQUEST_START: u8 = 0xaa;
const REQUEST_VERIFY: u8 = 0x0b;
const REQUEST_END: u8 = 0xbb;

/// First byte of every response frame
pub const RESPONSE_START: u8 = 0xcc;

/// Last byte of every response frame
pub const RESPONSE_END: u8 = 0xdd;

const CMD_SWITCH: u8 = 0x0f;
const CMD_STATUS: u8 = 0x1e;

const SWITCH_ON: u8 = 0x01;
const SWITCH_OFF: u8 = 0x02;

/// A command understood by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for the state of every relay
    Status,
    /// Switch one relay on
    RelayOn(u8),
    /// Switch one relay off
    RelayOff(u8),
}

impl Command {
    /// Build a switch command, rejecting relay indexes the board does not have
    pub fn switch(relay: i64, switch: Switch) -> DeviceResult<Self> {
        let index = u8::try_from(relay)
            .ok()
            .filter(|index| usize::from(*index) < RELAY_COUNT)
            .ok_or(DeviceError::InvalidRelay(relay))?;

        Ok(match switch {
            Switch::On => Command::RelayOn(index),
            Switch::Off => Command::RelayOff(index),
        })
    }

    /// Encode the command as a request frame
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = REQUEST_START;
        match *self {
            Command::Status => {
                frame[1] = CMD_STATUS;
            }
            Command::RelayOn(relay) => {
                frame[1] = CMD_SWITCH;
                frame[2] = relay;
                frame[3] = SWITCH_ON;
            }
            Command::RelayOff(relay) => {
                frame[1] = CMD_SWITCH;
                frame[2] = relay;
                frame[3] = SWITCH_OFF;
            }
        }
        frame[FRAME_LEN - 2] = REQUEST_VERIFY;
        frame[FRAME_LEN - 1] = REQUEST_END;
        frame
    }
}

/// Check the start and end markers of a response frame
pub fn check_response(frame: &[u8]) -> DeviceResult<()> {
    if frame.len() != FRAME_LEN {
        return Err(DeviceError::Protocol(format!(
            "expected {} bytes, got {}",
            FRAME_LEN,
            frame.len()
        )));
    }
    if frame[0] != RESPONSE_START {
        return Err(DeviceError::Protocol(format!(
            "bad start byte {:#04x}",
            frame[0]
        )));
    }
    if frame[FRAME_LEN - 1] != RESPONSE_END {
        return Err(DeviceError::Protocol(format!(
            "bad end byte {:#04x}",
            frame[FRAME_LEN - 1]
        )));
    }
    Ok(())
}
