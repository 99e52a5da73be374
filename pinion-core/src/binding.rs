//! Pin-to-register binding resolution
//!
//! A [`PinBinding`] is the cached result of looking one pin number up in a
//! target's descriptor tables: the three port registers the pin lives in,
//! its bitmask, and whatever interrupt line, timer output, or ADC channel
//! the pin map assigns it. Resolution is a pure function of the pin number
//! and the table; handles resolve once at construction and never look
//! anything up again.

use pinion_hal::target::{Target, TimerOutput};
use pinion_hal::Reg;

/// Cached register bindings for one physical pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinBinding {
    number: u8,
    mask: u8,
    dir: Reg,
    output: Reg,
    input: Reg,
    irq_line: Option<u8>,
    timer: Option<TimerOutput>,
    adc_channel: Option<u8>,
}

impl PinBinding {
    /// Resolve `number` against `target`'s pin map.
    ///
    /// # Panics
    ///
    /// Panics if `number` is not on the target's pin map. Pin numbers come
    /// from board wiring, not runtime input; an out-of-range number is a
    /// configuration error in the caller.
    pub fn resolve(target: &Target, number: u8) -> Self {
        let Some(desc) = target.pin(number) else {
            panic!("pin {} is not on the {} pin map", number, target.name);
        };
        let port = target.ports[desc.port as usize];
        Self {
            number,
            mask: 1 << desc.bit,
            dir: port.ddr,
            output: port.port,
            input: port.pin,
            irq_line: desc.irq_line,
            timer: desc.timer.map(|t| target.timer_outputs[t as usize]),
            adc_channel: desc.adc_channel,
        }
    }

    /// Logical pin number this binding was resolved for.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Single-bit mask selecting this pin within its port registers.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Direction register (input/output select).
    pub fn dir(&self) -> Reg {
        self.dir
    }

    /// Output latch register (level when output, pull-up when input).
    pub fn output(&self) -> Reg {
        self.output
    }

    /// Input sample register.
    pub fn input(&self) -> Reg {
        self.input
    }

    /// External-interrupt line, if the pin has one.
    pub fn irq_line(&self) -> Option<u8> {
        self.irq_line
    }

    /// Timer compare output driving this pin, if the pin has one.
    pub fn timer(&self) -> Option<TimerOutput> {
        self.timer
    }

    /// ADC channel mux value, if the pin has one.
    pub fn adc_channel(&self) -> Option<u8> {
        self.adc_channel
    }

    pub fn is_interrupt_capable(&self) -> bool {
        self.irq_line.is_some()
    }

    pub fn is_pwm_capable(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_adc_capable(&self) -> bool {
        self.adc_channel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinion_hal::target::{ATMEGA2560, ATMEGA328P};

    #[test]
    fn test_resolve_is_idempotent() {
        for n in 0..20 {
            assert_eq!(
                PinBinding::resolve(&ATMEGA328P, n),
                PinBinding::resolve(&ATMEGA328P, n),
            );
        }
    }

    #[test]
    fn test_capability_flags_follow_pin_map() {
        // Uno: D2 has INT0, D9 has a timer output, A0 has ADC0, D4 has none.
        let d2 = PinBinding::resolve(&ATMEGA328P, 2);
        assert!(d2.is_interrupt_capable());
        assert_eq!(d2.irq_line(), Some(0));

        let d9 = PinBinding::resolve(&ATMEGA328P, 9);
        assert!(d9.is_pwm_capable());
        assert!(!d9.is_adc_capable());

        let a0 = PinBinding::resolve(&ATMEGA328P, 14);
        assert_eq!(a0.adc_channel(), Some(0));
        assert!(!a0.is_pwm_capable());

        let d4 = PinBinding::resolve(&ATMEGA328P, 4);
        assert!(!d4.is_interrupt_capable());
        assert!(!d4.is_pwm_capable());
        assert!(!d4.is_adc_capable());
    }

    #[test]
    fn test_port_registers_and_mask() {
        // Uno D13 is PB5: all three registers from the B triple, bit 5.
        let d13 = PinBinding::resolve(&ATMEGA328P, 13);
        let b = ATMEGA328P.ports[0];
        assert_eq!(d13.mask(), 1 << 5);
        assert_eq!(d13.dir(), b.ddr);
        assert_eq!(d13.output(), b.port);
        assert_eq!(d13.input(), b.pin);
    }

    #[test]
    fn test_second_bank_channels_resolve() {
        // Mega A8 (D62) sits on the ADC's second bank.
        let a8 = PinBinding::resolve(&ATMEGA2560, 62);
        assert_eq!(a8.adc_channel(), Some(8));
    }

    #[test]
    #[should_panic(expected = "not on the")]
    fn test_unmapped_pin_panics() {
        PinBinding::resolve(&ATMEGA328P, 99);
    }
}
