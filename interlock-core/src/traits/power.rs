//! Power domain control

use serde::{Deserialize, Serialize};

/// A switchable group of machine power rails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerDomain(pub u8);

impl PowerDomain {
    /// Controller logic and communication rails
    pub const DOMAIN_0: Self = Self(0);
    /// Tool head and add-on rails, cut by the emergency stop
    pub const DOMAIN_1: Self = Self(1);

    /// Index of this domain in a domain bank
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Trait for switching power domains
///
/// Both operations are idempotent.
pub trait PowerDomains {
    /// Switch the domain's rails on
    fn enable(&mut self, domain: PowerDomain);

    /// Switch the domain's rails off
    fn disable(&mut self, domain: PowerDomain);

    /// Check if the domain is currently switched on
    fn is_enabled(&self, domain: PowerDomain) -> bool;
}
