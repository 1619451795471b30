//! Host link implementations

pub mod request;
pub mod uart;

pub use request::UartHostRequests;
pub use uart::UartHostLink;
