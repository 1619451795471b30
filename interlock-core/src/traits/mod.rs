//! Collaborator traits
//!
//! These traits define the interface between the interlock logic and the
//! subsystems it commands. Implementations live in the drivers crate or in
//! the firmware that owns the real tool head and motion planner.

pub mod host;
pub mod motion;
pub mod power;
pub mod toolhead;

pub use host::{HostError, HostLink};
pub use motion::MotionSystem;
pub use power::{PowerDomain, PowerDomains};
pub use toolhead::{LaserState, LaserToolhead, ToolKind};
