//! Tool head traits

/// Kind of tool head currently attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToolKind {
    /// Nothing attached or not yet identified
    #[default]
    None,
    /// 1.6W laser module
    Laser,
    /// 10W laser module
    Laser10W,
    /// Print head, CNC spindle, or anything else without a laser source
    Other,
}

impl ToolKind {
    /// Check if the tool needs explicit deinitialization on shutdown
    pub fn is_laser_class(self) -> bool {
        matches!(self, ToolKind::Laser | ToolKind::Laser10W)
    }
}

/// Laser output state as reported by the tool head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaserState {
    /// Output off, safe to resume
    #[default]
    Off,
    /// Output on
    On,
    /// Tool head has not reported since it was reconnected
    Unknown,
}

/// Trait for laser tool head control
pub trait LaserToolhead {
    /// Force the laser output off
    fn turn_off(&mut self);

    /// Release the tool head's bus functions and local state
    fn deinit(&mut self);

    /// Allow the laser output again after a stop was released
    fn enable(&mut self);

    /// Current laser output state
    fn state(&self) -> LaserState;

    /// Verify the PWM control pin still follows the commanded level
    fn pwm_pin_check(&mut self);
}
