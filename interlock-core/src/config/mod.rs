//! Interlock configuration
//!
//! Thresholds are counted in controller ticks. They were calibrated for a
//! tick every [`TICK_INTERVAL_MS`]; a scheduler running at another rate
//! must scale them. Configuration is stored in flash as postcard binary
//! data alongside the rest of the machine configuration.

use serde::{Deserialize, Serialize};

use crate::bus::BusChannel;
use crate::traits::PowerDomain;

/// Tick period the default thresholds were calibrated for
pub const TICK_INTERVAL_MS: u32 = 10;

/// Largest serialized configuration
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A tick interval or window is zero
    ZeroInterval,
    /// Discovery would never send a request
    NoDiscoveryAttempts,
    /// Rescan timeout lies beyond what the tick counter can measure
    UnreachableTimeout,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// Emergency stop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EstopConfig {
    /// Domain cut while the stop is engaged
    pub protected_domain: PowerDomain,
    /// Bus channel rescanned to find the tool head after release
    pub toolhead_channel: BusChannel,
    /// Per-attempt timeout for capability enumeration (ms)
    pub discovery_timeout_ms: u32,
    /// Capability enumeration attempts
    pub discovery_retries: u8,
    /// Ticks between tool head rescans while recovering
    pub poll_interval_ticks: u16,
    /// Ticks of failed rescans before falling back to the stopped state
    pub rescan_timeout_ticks: u16,
    /// Ticks the tool head gets to settle before its state is checked
    pub toolhead_settle_ticks: u16,
    /// Ticks after which restart phase 1 is considered settled
    pub restart_timeout_ticks: u16,
    /// Completed moves after which restart phase 1 is considered settled
    pub restart_move_count: u8,
    /// Ticks between PWM pin checks in restart phase 2
    pub pin_check_interval_ticks: u16,
}

impl Default for EstopConfig {
    fn default() -> Self {
        Self {
            protected_domain: PowerDomain::DOMAIN_1,
            toolhead_channel: BusChannel::CH2,
            discovery_timeout_ms: 500,
            discovery_retries: 2,
            poll_interval_ticks: 10,
            rescan_timeout_ticks: 500,
            toolhead_settle_ticks: 10,
            restart_timeout_ticks: 500,
            restart_move_count: 5,
            pin_check_interval_ticks: 10,
        }
    }
}

impl EstopConfig {
    /// Check that every interval and budget is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            self.poll_interval_ticks,
            self.rescan_timeout_ticks,
            self.toolhead_settle_ticks,
            self.restart_timeout_ticks,
            self.pin_check_interval_ticks,
        ];
        if intervals.contains(&0) || self.discovery_timeout_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.discovery_retries == 0 {
            return Err(ConfigError::NoDiscoveryAttempts);
        }
        // The first rescan past the timeout must still fit the counter
        let last_rescan =
            u32::from(self.rescan_timeout_ticks) + u32::from(self.poll_interval_ticks);
        if last_rescan > u32::from(u16::MAX) {
            return Err(ConfigError::UnreachableTimeout);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn to_bytes<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
