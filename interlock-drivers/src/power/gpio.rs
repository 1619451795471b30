//! GPIO power domain switches
//!
//! Each domain's rails are switched by one GPIO pin (directly or via a
//! load switch / MOSFET).

use embedded_hal::digital::OutputPin;
use interlock_core::traits::{PowerDomain, PowerDomains};

/// GPIO-switched power domain bank
///
/// Pin `i` switches `PowerDomain(i)`. Pins can be active-high (default)
/// or active-low. A failed pin write is latched as a fault and leaves
/// the domain's reported state unchanged.
pub struct GpioPowerDomains<P, const N: usize> {
    pins: [P; N],
    /// If true, domain ON = pin LOW
    inverted: bool,
    /// Last state each pin was successfully driven to
    enabled: [bool; N],
    fault: bool,
}

impl<P: OutputPin, const N: usize> GpioPowerDomains<P, N> {
    /// Create a domain bank with every domain switched off
    ///
    /// # Arguments
    /// - `pins`: One pin per domain, indexed by domain number
    /// - `inverted`: If true, a domain is ON when its pin is LOW
    pub fn new(pins: [P; N], inverted: bool) -> Self {
        let mut bank = Self {
            pins,
            inverted,
            enabled: [false; N],
            fault: false,
        };
        for index in 0..N {
            bank.drive(index, false);
        }
        bank
    }

    /// Create a bank with active-high switches
    pub fn new_active_high(pins: [P; N]) -> Self {
        Self::new(pins, false)
    }

    /// Create a bank with active-low switches
    pub fn new_active_low(pins: [P; N]) -> Self {
        Self::new(pins, true)
    }

    /// Check if a pin write failed or an unknown domain was addressed
    pub fn has_fault(&self) -> bool {
        self.fault
    }

    /// Clear the latched fault
    pub fn clear_fault(&mut self) {
        self.fault = false;
    }

    /// Give the pins back
    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn drive(&mut self, index: usize, on: bool) {
        let Some(pin) = self.pins.get_mut(index) else {
            self.fault = true;
            return;
        };

        // Normal: on → high. Inverted: on → low.
        let result = if on != self.inverted {
            pin.set_high()
        } else {
            pin.set_low()
        };

        match result {
            Ok(()) => self.enabled[index] = on,
            Err(_) => self.fault = true,
        }
    }
}

impl<P: OutputPin, const N: usize> PowerDomains for GpioPowerDomains<P, N> {
    fn enable(&mut self, domain: PowerDomain) {
        self.drive(domain.index(), true);
    }

    fn disable(&mut self, domain: PowerDomain) {
        self.drive(domain.index(), false);
    }

    fn is_enabled(&self, domain: PowerDomain) -> bool {
        self.enabled.get(domain.index()).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    /// Pin whose driver rejects every write
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    fn pins() -> [MockPin; 2] {
        [MockPin::default(), MockPin::default()]
    }

    #[test]
    fn test_active_high_domains() {
        let mut bank = GpioPowerDomains::new_active_high(pins());

        // Initially off
        assert!(!bank.is_enabled(PowerDomain::DOMAIN_1));
        assert!(!bank.pins[1].high);

        bank.enable(PowerDomain::DOMAIN_1);
        assert!(bank.is_enabled(PowerDomain::DOMAIN_1));
        assert!(bank.pins[1].high);
        assert!(!bank.is_enabled(PowerDomain::DOMAIN_0));

        bank.disable(PowerDomain::DOMAIN_1);
        assert!(!bank.is_enabled(PowerDomain::DOMAIN_1));
        assert!(!bank.pins[1].high);
        assert!(!bank.has_fault());
    }

    #[test]
    fn test_active_low_domains() {
        let mut bank = GpioPowerDomains::new_active_low(pins());

        // Initially off (pins high for active-low)
        assert!(bank.pins[0].high);
        assert!(bank.pins[1].high);

        bank.enable(PowerDomain::DOMAIN_0);
        assert!(bank.is_enabled(PowerDomain::DOMAIN_0));
        assert!(!bank.pins[0].high);
        assert!(bank.pins[1].high);
    }

    #[test]
    fn test_repeated_enable_is_harmless() {
        let mut bank = GpioPowerDomains::new_active_high(pins());
        bank.enable(PowerDomain::DOMAIN_1);
        bank.enable(PowerDomain::DOMAIN_1);

        assert!(bank.is_enabled(PowerDomain::DOMAIN_1));
        assert!(!bank.has_fault());
        let [_, pin] = bank.release();
        assert_eq!(pin.writes, 3);
    }

    #[test]
    fn test_unknown_domain_latches_fault() {
        let mut bank = GpioPowerDomains::new_active_high(pins());
        bank.enable(PowerDomain(5));

        assert!(bank.has_fault());
        assert!(!bank.is_enabled(PowerDomain(5)));

        bank.clear_fault();
        assert!(!bank.has_fault());
    }

    #[test]
    fn test_pin_error_keeps_state_and_latches_fault() {
        let mut bank = GpioPowerDomains::new_active_high([BrokenPin]);
        assert!(bank.has_fault());

        bank.clear_fault();
        bank.enable(PowerDomain::DOMAIN_0);
        assert!(bank.has_fault());
        assert!(!bank.is_enabled(PowerDomain::DOMAIN_0));
    }

    #[test]
    fn test_power_domains_trait() {
        let mut bank = GpioPowerDomains::new_active_high(pins());

        // Use trait method through a trait object, as the controller does
        fn cut(p: &mut dyn PowerDomains) {
            p.enable(PowerDomain::DOMAIN_1);
            p.disable(PowerDomain::DOMAIN_1);
            assert!(!p.is_enabled(PowerDomain::DOMAIN_1));
        }

        cut(&mut bank);
    }
}
