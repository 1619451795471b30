//! Linear motion subsystem

/// Trait for the motion planner's recovery hooks
pub trait MotionSystem {
    /// Re-derive the machine work area from the attached linear modules
    ///
    /// Called once a restarted tool head has settled, since the stop cut
    /// power to the modules that report their lengths.
    fn recalibrate_machine_size(&mut self);
}
