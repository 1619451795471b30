//! Raw stop-switch reports to edges
//!
//! The detector is written from the transport's receive context and read
//! from the tick loop. It holds two things: the last raw byte, and a
//! single pending edge slot that a newer edge overwrites.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::bus::FrameHandler;

/// Raw switch byte meaning "stop engaged"
///
/// Any other byte means released.
pub const RAW_STOPPED: u8 = 0;

/// A change of the stop switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Switch pressed, power must be cut
    Falling,
    /// Switch released, recovery may begin
    Rising,
}

impl Edge {
    /// Edge that leads to raw switch byte `raw`
    pub fn for_raw(raw: u8) -> Self {
        if raw == RAW_STOPPED {
            Edge::Falling
        } else {
            Edge::Rising
        }
    }
}

/// Deduplicating edge detector
pub struct EdgeDetector {
    /// Last raw byte; `None` until the first report sets a baseline
    last_raw: Mutex<CriticalSectionRawMutex, Cell<Option<u8>>>,
    /// Edge waiting for the tick loop
    pending: Signal<CriticalSectionRawMutex, Edge>,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    /// Create a detector with no baseline
    pub const fn new() -> Self {
        Self {
            last_raw: Mutex::new(Cell::new(None)),
            pending: Signal::new(),
        }
    }

    /// Record a raw switch report
    ///
    /// The first report only sets the baseline. Later reports raise an
    /// edge when they differ from the previous byte. Returns the raised
    /// edge, if any.
    pub fn report(&self, raw: u8) -> Option<Edge> {
        self.last_raw.lock(|last| {
            let edge = match last.replace(Some(raw)) {
                Some(prev) if prev != raw => Some(Edge::for_raw(raw)),
                _ => None,
            };
            if let Some(edge) = edge {
                self.pending.signal(edge);
            }
            edge
        })
    }

    /// Take the pending edge, leaving the slot empty
    pub fn take(&self) -> Option<Edge> {
        self.pending.try_take()
    }

    /// Check if an edge is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }

    /// Last raw byte reported, if any
    pub fn last_raw(&self) -> Option<u8> {
        self.last_raw.lock(Cell::get)
    }

    /// Forget the baseline and any pending edge
    pub fn reset(&self) {
        self.last_raw.lock(|last| last.set(None));
        self.pending.reset();
    }
}

impl FrameHandler for EdgeDetector {
    fn on_frame(&self, data: &[u8]) {
        if let Some(&raw) = data.first() {
            trace!("Stop switch report: {}", raw);
            self.report(raw);
        }
    }
}
