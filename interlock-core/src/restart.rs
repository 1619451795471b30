//! Restart bookkeeping shared between the interlock and the tool head
//!
//! One `RestartContext` is owned by the scheduler and lent to every party
//! that takes part in bringing a tool head back after a stop: the tool head
//! driver publishes its restart phase, the motion planner counts completed
//! moves, and the interlock reads both and records when recovery is done.

/// Tool head restart sequencing, driven by the tool head driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestartPhase {
    /// No restart in progress
    #[default]
    None,
    /// Tool head re-initialized, waiting for motion to settle
    Phase1,
    /// Tool head running, PWM pin must be checked periodically
    Phase2,
}

/// Shared restart state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RestartContext {
    /// Current tool head restart phase
    pub phase: RestartPhase,
    /// Moves completed by the motion planner since the last stop
    pub completed_moves: u8,
    /// Set once the post-stop recovery has finished
    pub restart_complete: bool,
}

impl RestartContext {
    /// Create an idle context
    pub const fn new() -> Self {
        Self {
            phase: RestartPhase::None,
            completed_moves: 0,
            restart_complete: false,
        }
    }

    /// Record a completed move
    pub fn record_move(&mut self) {
        self.completed_moves = self.completed_moves.saturating_add(1);
    }

    /// Forget all recovery progress
    ///
    /// Called when the stop engages with a laser-class tool attached.
    pub fn clear(&mut self) {
        self.completed_moves = 0;
        self.restart_complete = false;
    }
}
