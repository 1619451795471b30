//! Framed host link over a byte sink
//!
//! Each event is encoded into one frame and written out in full before
//! the call returns.

use embedded_io::Write;
use interlock_core::traits::{HostError, HostLink};
use interlock_protocol::{HostEvent, MAX_FRAME_SIZE};

/// Host link over a UART (or any `embedded_io::Write` sink)
pub struct UartHostLink<W> {
    tx: W,
}

impl<W: Write> UartHostLink<W> {
    /// Create a link writing to `tx`
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    /// Give the writer back
    pub fn release(self) -> W {
        self.tx
    }
}

impl<W: Write> HostLink for UartHostLink<W> {
    fn send_event(&mut self, event: &HostEvent) -> Result<(), HostError> {
        let frame = event.to_frame()?;
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = frame.encode(&mut buf)?;

        self.tx.write_all(&buf[..len]).map_err(|_| HostError::Io)?;
        self.tx.flush().map_err(|_| HostError::Io)
    }
}
