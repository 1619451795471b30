//! Frame encoding and decoding for the host link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-64)
//! - TYPE (1 byte): event identifier
//! - PAYLOAD (0-64 bytes): op code followed by event data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
///
/// Status events carry a handful of bytes; the limit keeps the parser
/// buffer small enough to live on the receive task's stack.
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Bytes a frame adds around its payload (START + LENGTH + TYPE + CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Invalid frame structure
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event identifier carried in the TYPE byte
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame from a kind byte and a payload slice
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Create a frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    fn checksum(length: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ kind, |acc, &b| acc ^ b)
    }

    /// Encode this frame into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let body_end = 3 + self.payload.len();

        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.kind;
        buffer[3..body_end].copy_from_slice(&self.payload);
        buffer[body_end] = Self::checksum(length, self.kind, &self.payload);

        Ok(len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut out = Vec::new();
        out.resize_default(self.encoded_len())
            .map_err(|_| FrameError::BufferTooSmall)?;
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// Byte-at-a-time frame decoder
///
/// Bytes that arrive before a START byte are dropped, so the parser
/// resynchronizes on its own after line noise or a partial frame. The
/// checksum is accumulated as bytes arrive.
#[derive(Debug, Clone)]
pub struct FrameParser {
    stage: Stage,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// XOR of every LENGTH, TYPE and PAYLOAD byte seen so far
    sum: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Length,
    Kind { length: u8 },
    Body { length: u8, kind: u8 },
    Check { kind: u8 },
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            stage: Stage::Idle,
            payload: Vec::new(),
            sum: 0,
        }
    }

    /// Drop any partially received frame
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.payload.clear();
        self.sum = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.stage = match self.stage {
            Stage::Idle if byte == FRAME_START => Stage::Length,
            Stage::Idle => Stage::Idle,
            Stage::Length if usize::from(byte) > MAX_PAYLOAD_SIZE => {
                self.reset();
                return Err(FrameError::InvalidFrame);
            }
            Stage::Length => {
                self.sum = byte;
                Stage::Kind { length: byte }
            }
            Stage::Kind { length } => {
                self.sum ^= byte;
                match length {
                    0 => Stage::Check { kind: byte },
                    _ => Stage::Body { length, kind: byte },
                }
            }
            Stage::Body { length, kind } => {
                self.sum ^= byte;
                // LENGTH was bounded by MAX_PAYLOAD_SIZE
                let _ = self.payload.push(byte);
                if self.payload.len() < usize::from(length) {
                    Stage::Body { length, kind }
                } else {
                    Stage::Check { kind }
                }
            }
            Stage::Check { kind } => {
                let valid = byte == self.sum;
                let payload = core::mem::take(&mut self.payload);
                self.reset();
                return if valid {
                    Ok(Some(Frame { kind, payload }))
                } else {
                    Err(FrameError::InvalidChecksum)
                };
            }
        };
        Ok(None)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
