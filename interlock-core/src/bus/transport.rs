//! Bus transport interface
//!
//! Implemented by the board's bus driver. Every blocking operation takes
//! an explicit timeout and retry budget.

use interlock_protocol::{ExtPayload, FunctionId};

use super::address::{BusChannel, ModuleAddress};
use super::function::{FunctionDescriptor, MessageId};

/// Errors reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// No reply within the timeout and retry budget
    Timeout,
    /// Module is not present on the bus
    NoResponse,
    /// Message id binding was refused
    BindRejected,
    /// Module rescan found nothing
    ScanFailed,
}

/// Receiver for frames of a registered function
///
/// Called from the transport's receive context. Implementations must
/// return quickly, must not block, and must not touch the bus.
pub trait FrameHandler: Sync {
    /// Handle the data bytes of one received frame
    fn on_frame(&self, data: &[u8]);
}

/// Operations the interlock needs from the bus transport
pub trait BusTransport {
    /// Send an extended command and wait for the module's reply
    ///
    /// Gives up after `retries` attempts of `timeout_ms` each.
    fn send_ext_cmd_sync(
        &mut self,
        address: &ModuleAddress,
        request: &[u8],
        timeout_ms: u32,
        retries: u8,
    ) -> Result<ExtPayload, BusError>;

    /// Register a function, optionally routing its frames to `handler`
    fn register_function(
        &mut self,
        function: FunctionDescriptor,
        handler: Option<&'static dyn FrameHandler>,
    ) -> MessageId;

    /// Bind registered message ids to the module, all or nothing
    ///
    /// On failure the transport releases any partially bound slots.
    fn bind_message_ids(
        &mut self,
        address: &ModuleAddress,
        ids: &[MessageId],
    ) -> Result<(), BusError>;

    /// Send a standard function command without waiting for a reply
    fn send_std_cmd(&mut self, function: FunctionId, payload: &[u8]);

    /// Re-enumerate the modules on `channel`
    fn rescan(&mut self, channel: BusChannel) -> Result<(), BusError>;
}
