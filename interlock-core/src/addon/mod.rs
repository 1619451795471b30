//! Add-on module interface
//!
//! Every add-on the scheduler drives exposes the same four operations.
//! The scheduler keeps its modules in an [`AddonSet`] and lends each one a
//! [`MachineContext`] on every tick.

pub mod set;

pub use set::AddonSet;

use interlock_protocol::HostEvent;

use crate::bus::{BusTransport, ModuleAddress};
use crate::restart::RestartContext;
use crate::traits::{HostError, HostLink, LaserToolhead, MotionSystem, PowerDomains, ToolKind};

/// Kinds of add-on module found on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleKind {
    /// Emergency stop switch
    EmergencyStop,
    /// Enclosure with door sensor and lighting
    Enclosure,
    /// Air purifier
    Purifier,
    /// Rotary axis module
    Rotary,
}

impl ModuleKind {
    /// Module that answers a host request, if any
    pub fn for_request(event: &HostEvent) -> Option<Self> {
        if event.is_stop_state_query() {
            Some(ModuleKind::EmergencyStop)
        } else {
            None
        }
    }
}

/// Errors bringing an add-on module online
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Address carries no registry slot
    InvalidAddress,
    /// Module did not answer capability enumeration within its budget
    DiscoveryTimeout,
    /// Capability list could not be decoded
    MalformedResponse,
    /// Transport refused to bind the registered functions
    BindFailure,
}

/// Everything a module may command during a tick
///
/// Built by the scheduler from the subsystems it owns. Modules get
/// exclusive access for the duration of their `process` call.
pub struct MachineContext<'a> {
    /// Bus transport
    pub bus: &'a mut dyn BusTransport,
    /// Power domain switches
    pub power: &'a mut dyn PowerDomains,
    /// Laser tool head driver
    pub laser: &'a mut dyn LaserToolhead,
    /// Motion planner
    pub motion: &'a mut dyn MotionSystem,
    /// Tool head currently attached
    pub tool: ToolKind,
    /// Shared restart bookkeeping
    pub restart: &'a mut RestartContext,
}

/// Trait implemented by every add-on module
pub trait AddonModule {
    /// Kind tag used to look the module up
    fn kind(&self) -> ModuleKind;

    /// Negotiate with the module at `address` and register its functions
    fn init(&mut self, address: ModuleAddress, bus: &mut dyn BusTransport)
        -> Result<(), InitError>;

    /// Periodic tick
    fn process(&mut self, ctx: &mut MachineContext<'_>);

    /// Check if the module was discovered and is being driven
    fn is_online(&self) -> bool;

    /// Send the module's status to the host
    fn report_status(&self, host: &mut dyn HostLink) -> Result<(), HostError>;
}
