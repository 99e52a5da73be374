//! Timer-compare PWM output
//!
//! Enabling PWM on a pin is two separate steps, mirroring the hardware:
//! [`Pin::enable_pwm`] only marks the handle willing, and the first
//! [`Pin::pwm_write`] connects the compare output and programs a duty.
//! [`Pin::disable_pwm`] disconnects the compare output so the pin falls
//! back to its plain digital latch.

use pinion_hal::Mcu;
use pinion_hal::RegisterBus;

use crate::pin::Pin;

impl<M: Mcu> Pin<'_, M> {
    /// Mark the pin PWM-enabled.
    ///
    /// Returns false if the pin has no timer output or is currently in an
    /// input mode; duty output starts with the next [`Pin::pwm_write`].
    pub fn enable_pwm(&self) -> bool {
        if !self.binding.is_pwm_capable() || self.mode.get().is_input() {
            return false;
        }
        self.pwm_on.set(true);
        true
    }

    /// Disconnect the compare output and clear the enabled flag.
    ///
    /// Returns false if the pin has no timer output or is not currently
    /// enabled. Redundant calls are safe; only the first one after an
    /// enable changes anything.
    pub fn disable_pwm(&self) -> bool {
        if !self.binding.is_pwm_capable() || !self.pwm_on.get() {
            return false;
        }
        if let Some(timer) = self.binding.timer() {
            self.mcu.clear_bits(timer.tccr, 1 << timer.com_bit);
        }
        self.pwm_on.set(false);
        true
    }

    /// Connect the compare output and set the duty value.
    ///
    /// No-op unless the pin is PWM-enabled.
    pub fn pwm_write(&self, duty: u8) {
        if !self.pwm_on.get() {
            return;
        }
        if let Some(timer) = self.binding.timer() {
            self.mcu.set_bits(timer.tccr, 1 << timer.com_bit);
            self.mcu.store(timer.ocr, duty);
        }
    }
}

#[cfg(test)]
mod tests {
    use pinion_hal::target::ATMEGA328P;
    use pinion_hal_sim::SimMcu;

    use crate::binding::PinBinding;
    use crate::pin::{Pin, PinMode};

    #[test]
    fn test_enable_requires_timer_output() {
        let sim = SimMcu::new(ATMEGA328P);
        let pin = Pin::new(&sim, &ATMEGA328P, 4, PinMode::Output);
        pin.init();
        assert!(!pin.enable_pwm());
        assert!(!pin.is_pwm_enabled());
    }

    #[test]
    fn test_enable_requires_output_mode() {
        let sim = SimMcu::new(ATMEGA328P);
        let pin = Pin::new(&sim, &ATMEGA328P, 9, PinMode::Input);
        pin.init();
        assert!(!pin.enable_pwm());

        pin.set_mode(PinMode::Output);
        assert!(pin.enable_pwm());
        assert!(pin.is_pwm_enabled());
    }

    #[test]
    fn test_pwm_write_connects_compare_output() {
        let sim = SimMcu::new(ATMEGA328P);
        let timer = PinBinding::resolve(&ATMEGA328P, 9).timer().unwrap();
        let pin = Pin::new(&sim, &ATMEGA328P, 9, PinMode::Pwm);
        pin.init();
        assert!(pin.is_pwm_enabled());
        assert_eq!(sim.peek(timer.tccr) & (1 << timer.com_bit), 0);

        pin.pwm_write(0x80);
        assert_ne!(sim.peek(timer.tccr) & (1 << timer.com_bit), 0);
        assert_eq!(sim.peek(timer.ocr), 0x80);
    }

    #[test]
    fn test_pwm_write_is_noop_while_disabled() {
        let sim = SimMcu::new(ATMEGA328P);
        let timer = PinBinding::resolve(&ATMEGA328P, 9).timer().unwrap();
        let pin = Pin::new(&sim, &ATMEGA328P, 9, PinMode::Output);
        pin.init();

        pin.pwm_write(0x42);
        assert_eq!(sim.peek(timer.tccr), 0);
        assert_eq!(sim.peek(timer.ocr), 0);
    }

    #[test]
    fn test_disable_clears_compare_output_once() {
        let sim = SimMcu::new(ATMEGA328P);
        let timer = PinBinding::resolve(&ATMEGA328P, 9).timer().unwrap();
        let pin = Pin::new(&sim, &ATMEGA328P, 9, PinMode::Pwm);
        pin.init();
        pin.pwm_write(0xff);

        assert!(pin.disable_pwm());
        assert_eq!(sim.peek(timer.tccr) & (1 << timer.com_bit), 0);
        assert!(!pin.is_pwm_enabled());
        assert!(!pin.disable_pwm());
    }

    #[test]
    fn test_leaving_pwm_mode_disables() {
        let sim = SimMcu::new(ATMEGA328P);
        let timer = PinBinding::resolve(&ATMEGA328P, 11).timer().unwrap();
        let pin = Pin::new(&sim, &ATMEGA328P, 11, PinMode::Pwm);
        pin.init();
        pin.pwm_write(0x33);
        assert_ne!(sim.peek(timer.tccr) & (1 << timer.com_bit), 0);

        pin.set_mode(PinMode::Output);
        assert!(!pin.is_pwm_enabled());
        assert_eq!(sim.peek(timer.tccr) & (1 << timer.com_bit), 0);
    }

    #[test]
    fn test_sibling_outputs_share_control_register() {
        // D9 and D10 are the two compare outputs of the same timer;
        // disabling one must not disturb the other.
        let sim = SimMcu::new(ATMEGA328P);
        let d9 = Pin::new(&sim, &ATMEGA328P, 9, PinMode::Pwm);
        let d10 = Pin::new(&sim, &ATMEGA328P, 10, PinMode::Pwm);
        crate::pin::init_pins(&[&d9, &d10]);
        d9.pwm_write(0x10);
        d10.pwm_write(0x20);

        let t9 = PinBinding::resolve(&ATMEGA328P, 9).timer().unwrap();
        let t10 = PinBinding::resolve(&ATMEGA328P, 10).timer().unwrap();
        assert_eq!(t9.tccr, t10.tccr);

        d9.disable_pwm();
        assert_eq!(sim.peek(t9.tccr) & (1 << t9.com_bit), 0);
        assert_ne!(sim.peek(t10.tccr) & (1 << t10.com_bit), 0);
    }
}
