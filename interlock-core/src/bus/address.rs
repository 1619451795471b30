//! Module bus identity

use serde::{Deserialize, Serialize};

/// Bus channel a module is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusChannel(pub u8);

impl BusChannel {
    /// Channel shared by the linear modules and add-ons
    pub const CH1: Self = Self(1);
    /// Channel the tool head lives on
    pub const CH2: Self = Self(2);
}

/// Slot assigned to a module by the transport's module registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacIndex(pub u8);

impl MacIndex {
    /// Sentinel for "no slot assigned"
    pub const INVALID: Self = Self(0xFF);

    /// Check if this index refers to a real registry slot
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Where a module lives on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleAddress {
    /// Bus channel
    pub channel: BusChannel,
    /// Physical (MAC) address reported by the module
    pub mac: u32,
    /// Registry slot assigned at discovery
    pub index: MacIndex,
}

impl ModuleAddress {
    /// Create a module address
    pub const fn new(channel: BusChannel, mac: u32, index: MacIndex) -> Self {
        Self {
            channel,
            mac,
            index,
        }
    }
}
