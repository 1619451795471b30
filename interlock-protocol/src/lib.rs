//! Interlock wire formats
//!
//! This crate defines the bytes that cross the two links the e-stop
//! controller talks over:
//!
//! - The add-on module bus, where extended commands enumerate the functions
//!   a module implements ([`module`])
//! - The host link, where status events travel in checksummed frames
//!   ([`frame`], [`host`])
//!
//! # Frame Overview
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod host;
pub mod module;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use host::{HostEvent, EVENT_ADDON_ACK, EVENT_ADDON_REQ, OPC_GET_ADDON_STOP};
pub use module::{
    get_funcid_request, parse_function_ids, ExtPayload, FunctionId, FunctionListError,
    FUNC_REPORT_EMERGENCY_STOP, MAX_MODULE_FUNCTIONS,
};
