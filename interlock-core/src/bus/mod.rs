//! Add-on bus abstractions
//!
//! The bus transport itself lives outside this crate. These types describe
//! what the interlock needs from it: module identities, function
//! registration, and the transport operations.

pub mod address;
pub mod function;
pub mod transport;

pub use address::{BusChannel, MacIndex, ModuleAddress};
pub use function::{FunctionDescriptor, FunctionPriority, MessageId};
pub use transport::{BusError, BusTransport, FrameHandler};
