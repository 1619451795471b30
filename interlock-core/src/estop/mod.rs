//! Emergency stop add-on
//!
//! The stop-switch module reports its raw switch byte over the bus. The
//! [`EdgeDetector`] turns those reports into edges from the transport's
//! receive context, and [`EmergencyStop`] acts on them from the tick loop.

pub mod controller;
pub mod edge;
pub mod state;

pub use controller::EmergencyStop;
pub use edge::{Edge, EdgeDetector, RAW_STOPPED};
pub use state::SafetyState;
