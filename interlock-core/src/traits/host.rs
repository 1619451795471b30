//! Host link

use interlock_protocol::{FrameError, HostEvent};

/// Errors sending to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostError {
    /// Event could not be framed
    Frame(FrameError),
    /// Underlying link write failed
    Io,
}

impl From<FrameError> for HostError {
    fn from(e: FrameError) -> Self {
        HostError::Frame(e)
    }
}

/// Trait for sending status events to the host
pub trait HostLink {
    /// Send one event
    fn send_event(&mut self, event: &HostEvent) -> Result<(), HostError>;
}
