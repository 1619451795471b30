//! Collaborator implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in interlock-core over the embedded ecosystem traits:
//!
//! - Power domains switched by GPIO (`embedded-hal` output pins)
//! - Host link over a UART or any other byte sink (`embedded-io`)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod host;
pub mod power;
