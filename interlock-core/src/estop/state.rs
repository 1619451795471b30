//! Safety state definition
//!
//! The controller's behavior on every tick is a function of the current
//! state. Edges move the machine between states; everything else is timed
//! inside a state.

use super::edge::Edge;

/// Emergency stop states
///
/// Discriminants are the status byte reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SafetyState {
    /// Module discovered, switch released, nothing to do
    Online = 0,
    /// Module not discovered yet
    Offline = 1,
    /// Stop engaged; power and tool head are shut down on the next tick
    FallingEdge = 3,
    /// Stop released; power is back, waiting for the tool head to reappear
    RisingEdge = 4,
    /// Tool head found, waiting for its laser to report off
    WaitToolhead = 5,
    /// Tool head resumed, running its restart bookkeeping
    NoAction = 6,
    /// Resting: stop handled and waiting for release, or recovery finished
    Invalid = 7,
}

impl SafetyState {
    /// Status byte for the host
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// State after an edge arrives
    ///
    /// Edges override whatever the current state is doing. A module that
    /// is not online ignores them.
    pub fn on_edge(self, edge: Edge) -> Self {
        match (self, edge) {
            (SafetyState::Offline, _) => SafetyState::Offline,
            (_, Edge::Falling) => SafetyState::FallingEdge,
            (_, Edge::Rising) => SafetyState::RisingEdge,
        }
    }
}
