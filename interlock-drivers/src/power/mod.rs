//! Power domain switch implementations

pub mod gpio;

pub use gpio::GpioPowerDomains;
