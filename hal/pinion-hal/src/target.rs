//! Target descriptor tables
//!
//! A [`Target`] captures one microcontroller's register layout as plain
//! data: port register triples, a pin table, the ADC block, and the timer
//! compare outputs. The logic layer resolves a pin number against these
//! tables exactly once, at handle construction, and caches what it finds.
//!
//! Targets are values, not compile-time configuration; adding a chip means
//! adding a table, and tests can hand-build small fake targets.

use crate::bus::Reg;

/// Direction/output/input register triple for one I/O port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRegs {
    /// Data direction register (1 = output).
    pub ddr: Reg,
    /// Output register. For input pins the same bit enables the pull-up.
    pub port: Reg,
    /// Input register, reading the physical line.
    pub pin: Reg,
}

/// One pin's place in the register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDesc {
    /// Index into [`Target::ports`].
    pub port: u8,
    /// Bit position within the port, 0-7.
    pub bit: u8,
    /// External-interrupt line, if the pin has one.
    pub irq_line: Option<u8>,
    /// Index into [`Target::timer_outputs`], if the pin has a PWM output.
    pub timer: Option<u8>,
    /// ADC channel, if the pin can be sampled.
    pub adc_channel: Option<u8>,
}

impl PinDesc {
    /// Plain digital pin with no extra capabilities.
    pub const fn gpio(port: u8, bit: u8) -> Self {
        PinDesc {
            port,
            bit,
            irq_line: None,
            timer: None,
            adc_channel: None,
        }
    }

    /// Add an external-interrupt line.
    pub const fn with_irq(mut self, line: u8) -> Self {
        self.irq_line = Some(line);
        self
    }

    /// Add a PWM timer output.
    pub const fn with_pwm(mut self, timer: u8) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Add an ADC channel.
    pub const fn with_adc(mut self, channel: u8) -> Self {
        self.adc_channel = Some(channel);
        self
    }
}

/// One timer compare output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOutput {
    /// Control register carrying the compare-output-enable bit.
    pub tccr: Reg,
    /// Compare-output-enable bit position within `tccr`.
    pub com_bit: u8,
    /// Compare (duty) register.
    pub ocr: Reg,
}

/// ADC register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcRegs {
    /// Mux register: reference bits in the high bits, channel select low.
    pub admux: Reg,
    /// Control/status register carrying the start bit.
    pub adcsra: Reg,
    /// Data low byte. Must be read before `adch`.
    pub adcl: Reg,
    /// Data high byte.
    pub adch: Reg,
    /// Second-bank channel select (register, bit) for channels 8-15.
    pub bank_select: Option<(Reg, u8)>,
    /// Left shift applied to the reference bits within `admux`.
    pub ref_shift: u8,
    /// Mask applied to the channel number before writing `admux`.
    pub mux_mask: u8,
    /// Conversion start/busy bit position within `adcsra`.
    pub start_bit: u8,
    /// Channel selector for the internal bandgap reference.
    pub bandgap_mux: u8,
}

/// Full register map for one microcontroller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Chip name, for diagnostics.
    pub name: &'static str,
    /// Number of valid register indices. Backends size their register
    /// file from this.
    pub register_space: u16,
    /// I/O ports, indexed by [`PinDesc::port`].
    pub ports: &'static [PortRegs],
    /// Digital pin map, indexed by board pin number.
    pub pins: &'static [PinDesc],
    /// ADC register block.
    pub adc: AdcRegs,
    /// Timer compare outputs, indexed by [`PinDesc::timer`].
    pub timer_outputs: &'static [TimerOutput],
    /// Number of external-interrupt lines.
    pub irq_lines: u8,
}

impl Target {
    /// Descriptor for board pin `n`, if the target has one.
    pub fn pin(&self, n: u8) -> Option<&'static PinDesc> {
        self.pins.get(n as usize)
    }
}

mod atmega2560;
mod atmega328p;

pub use atmega2560::ATMEGA2560;
pub use atmega328p::ATMEGA328P;
