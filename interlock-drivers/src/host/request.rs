//! Host requests from a byte source
//!
//! Received bytes are decoded into frames as they arrive. Frames that fail
//! their checksum or carry no op code are dropped and counted; the decoder
//! resynchronizes on the next START byte.

use embedded_io::{Read, ReadReady};
use interlock_core::traits::HostError;
use interlock_protocol::{FrameParser, HostEvent};

/// Host request decoder over a UART (or any `embedded_io::Read` source)
pub struct UartHostRequests<R> {
    rx: R,
    parser: FrameParser,
    dropped: u32,
}

impl<R: Read + ReadReady> UartHostRequests<R> {
    /// Create a decoder reading from `rx`
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            parser: FrameParser::new(),
            dropped: 0,
        }
    }

    /// Frames discarded since creation
    pub fn dropped_frames(&self) -> u32 {
        self.dropped
    }

    /// Give the reader back
    pub fn release(self) -> R {
        self.rx
    }

    /// Consume buffered bytes until one request is complete
    ///
    /// Never blocks: returns `Ok(None)` once the source has nothing more
    /// buffered. Bytes after a complete request stay in the source for the
    /// next call.
    pub fn poll(&mut self) -> Result<Option<HostEvent>, HostError> {
        let mut byte = [0u8; 1];
        while self.rx.read_ready().map_err(|_| HostError::Io)? {
            if self.rx.read(&mut byte).map_err(|_| HostError::Io)? == 0 {
                break;
            }
            match self.parser.feed(byte[0]) {
                Ok(None) => {}
                Ok(Some(frame)) => match HostEvent::from_frame(&frame) {
                    Ok(event) => return Ok(Some(event)),
                    Err(_) => self.dropped += 1,
                },
                Err(_) => self.dropped += 1,
            }
        }
        Ok(None)
    }
}
