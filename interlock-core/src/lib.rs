//! Board-agnostic core logic for the e-stop add-on controller
//!
//! This crate contains all interlock logic that does not depend on a
//! specific board or bus implementation:
//!
//! - Bus abstractions (module addresses, function descriptors, transport)
//! - Edge detection for raw stop-switch reports
//! - The safety state machine driving power domains and the tool head
//! - Add-on module interface and the scheduler-side module set
//! - Collaborator traits (power, tool head, motion, host link)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod addon;
pub mod bus;
pub mod config;
pub mod estop;
pub mod restart;
pub mod traits;

#[cfg(test)]
mod testing;
