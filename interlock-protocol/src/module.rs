//! Add-on bus command formats
//!
//! Extended commands are short byte strings addressed to a single module:
//! byte 0 is the command id, byte 1 onwards is command data. The function
//! id enumeration reply lists every function the module implements:
//!
//! ```text
//! ┌─────┬───────┬────────┬────────┬─────┐
//! │ CMD │ COUNT │ ID0 BE │ ID1 BE │ ... │
//! │ 1B  │ 1B    │ 2B     │ 2B     │     │
//! └─────┴───────┴────────┴────────┴─────┘
//! ```

use heapless::Vec;

/// Offset of the command id within an extended command
pub const EXT_CMD_INDEX_ID: usize = 0;
/// Offset of the first data byte within an extended command
pub const EXT_CMD_INDEX_DATA: usize = 1;

/// Ask a module for the function ids it implements
pub const EXT_CMD_GET_FUNCID_REQ: u8 = 0x02;
/// Reply to [`EXT_CMD_GET_FUNCID_REQ`]
pub const EXT_CMD_GET_FUNCID_ACK: u8 = 0x03;

/// Largest extended command payload a module sends back
pub const EXT_CMD_MAX_LEN: usize = 16;

/// Most functions a single module can announce in one reply
pub const MAX_MODULE_FUNCTIONS: usize = (EXT_CMD_MAX_LEN - 2) / 2;

/// Extended command payload buffer
pub type ExtPayload = Vec<u8, EXT_CMD_MAX_LEN>;

/// Identifier of a function exposed by an add-on module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionId(pub u16);

/// Stop-switch module reports its raw switch state
pub const FUNC_REPORT_EMERGENCY_STOP: FunctionId = FunctionId(0x0060);

impl FunctionId {
    /// Decode a big-endian id
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Raw id value
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Errors decoding a function id enumeration reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FunctionListError {
    /// Reply is shorter than its header or its announced id count
    Truncated,
    /// Reply announces more ids than a module may expose
    TooManyFunctions,
}

/// Build the function id enumeration request
pub fn get_funcid_request() -> ExtPayload {
    let mut req = ExtPayload::new();
    // Capacity is non-zero
    let _ = req.push(EXT_CMD_GET_FUNCID_REQ);
    req
}

/// Decode the function id list from an enumeration reply
///
/// The command byte is not checked; transports match replies to requests
/// before handing them over.
pub fn parse_function_ids(
    reply: &[u8],
) -> Result<Vec<FunctionId, MAX_MODULE_FUNCTIONS>, FunctionListError> {
    let count = usize::from(*reply.get(EXT_CMD_INDEX_DATA).ok_or(FunctionListError::Truncated)?);
    if count > MAX_MODULE_FUNCTIONS {
        return Err(FunctionListError::TooManyFunctions);
    }

    let ids = reply
        .get(EXT_CMD_INDEX_DATA + 1..EXT_CMD_INDEX_DATA + 1 + count * 2)
        .ok_or(FunctionListError::Truncated)?;

    let mut out = Vec::new();
    for pair in ids.chunks_exact(2) {
        // count was bounded above, push cannot overflow
        let _ = out.push(FunctionId::from_be_bytes([pair[0], pair[1]]));
    }
    Ok(out)
}
