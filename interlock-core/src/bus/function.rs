//! Function registration types

use interlock_protocol::FunctionId;

use super::address::{BusChannel, MacIndex, ModuleAddress};

/// Arbitration priority for a function's messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FunctionPriority {
    High,
    Medium,
    #[default]
    Default,
}

/// A function of a module, as registered with the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionDescriptor {
    /// Function identifier
    pub id: FunctionId,
    /// Bus channel of the owning module
    pub channel: BusChannel,
    /// Registry slot of the owning module
    pub mac_index: MacIndex,
    /// Sub-unit within the module (0 for single-unit modules)
    pub sub_index: u8,
    /// Message priority
    pub priority: FunctionPriority,
}

impl FunctionDescriptor {
    /// Describe function `id` of the module at `address`
    ///
    /// Uses sub-index 0 and the default priority.
    pub fn for_module(id: FunctionId, address: &ModuleAddress) -> Self {
        Self {
            id,
            channel: address.channel,
            mac_index: address.index,
            sub_index: 0,
            priority: FunctionPriority::Default,
        }
    }
}

/// Message identifier the transport assigned to a registered function
///
/// Opaque to the interlock; only handed back to the transport for binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageId(pub u16);
