//! Host status events
//!
//! Events exchanged with the host (screen or PC tooling) are framed with the
//! event id in the TYPE byte and `[op_code, data...]` as payload.

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

/// Add-on operation request (host → controller)
pub const EVENT_ADDON_REQ: u8 = 0x17;
/// Add-on operation acknowledgement (controller → host)
pub const EVENT_ADDON_ACK: u8 = 0x18;

/// Query the add-on emergency stop state
pub const OPC_GET_ADDON_STOP: u8 = 0x03;

/// Maximum event data length (payload minus the op code byte)
pub const MAX_EVENT_DATA: usize = MAX_PAYLOAD_SIZE - 1;

/// A host status event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostEvent {
    /// Event identifier
    pub id: u8,
    /// Operation code within the event
    pub op_code: u8,
    /// Event data
    pub data: Vec<u8, MAX_EVENT_DATA>,
}

impl HostEvent {
    /// Build an event from raw parts
    pub fn new(id: u8, op_code: u8, data: &[u8]) -> Result<Self, FrameError> {
        let data = Vec::from_slice(data).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { id, op_code, data })
    }

    /// Build an add-on acknowledgement carrying `data`
    pub fn addon_ack(op_code: u8, data: &[u8]) -> Result<Self, FrameError> {
        Self::new(EVENT_ADDON_ACK, op_code, data)
    }

    /// Check if this event is the host asking for the stop state
    pub fn is_stop_state_query(&self) -> bool {
        self.id == EVENT_ADDON_REQ && self.op_code == OPC_GET_ADDON_STOP
    }

    /// Wrap this event in a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        payload
            .push(self.op_code)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .extend_from_slice(&self.data)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Frame::new(self.id, &payload)
    }

    /// Parse an event out of a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let (&op_code, data) = frame
            .payload
            .split_first()
            .ok_or(FrameError::InvalidFrame)?;
        Self::new(frame.kind, op_code, data)
    }
}
