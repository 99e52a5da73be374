//! Conversion engine behind the ADC register window.
//!
//! A store that raises the start bit decodes the mux and arms a
//! countdown; each status-register load burns one tick, and the final
//! tick writes the data registers and drops the start bit.

use crate::SimMcu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Analog(u8),
    Bandgap,
}

#[derive(Debug)]
pub(crate) struct AdcEngine {
    capture: Option<Capture>,
    remaining: u32,
    ticks: u32,
    inputs: [u16; 16],
    vcc_mv: u32,
}

impl AdcEngine {
    pub(crate) fn new() -> Self {
        Self {
            capture: None,
            remaining: 0,
            ticks: 1,
            inputs: [0; 16],
            vcc_mv: 5_000,
        }
    }
}

impl SimMcu {
    /// Ten-bit reading returned for `channel` by later conversions.
    pub fn set_analog_input(&self, channel: u8, raw: u16) {
        self.adc.borrow_mut().inputs[channel as usize] = raw & 0x3ff;
    }

    /// Status-register loads a conversion stays busy for (min 1).
    pub fn set_conversion_ticks(&self, ticks: u32) {
        self.adc.borrow_mut().ticks = ticks.max(1);
    }

    /// Supply rail seen by bandgap conversions.
    pub fn set_vcc_mv(&self, mv: u32) {
        self.adc.borrow_mut().vcc_mv = mv;
    }

    /// Decode the mux and arm the countdown; runs on a start-bit raise.
    pub(crate) fn begin_conversion(&self) {
        let adc = self.target.adc;
        let (admux, bank) = {
            let regs = self.regs.borrow();
            let admux = regs[adc.admux.index()];
            let bank = adc
                .bank_select
                .map(|(reg, bit)| (regs[reg.index()] >> bit) & 1)
                .unwrap_or(0);
            (admux, bank)
        };
        let capture = if admux & 0x1f == adc.bandgap_mux {
            Capture::Bandgap
        } else {
            Capture::Analog((admux & adc.mux_mask) | (bank << 3))
        };
        let mut engine = self.adc.borrow_mut();
        engine.capture = Some(capture);
        engine.remaining = engine.ticks;
    }

    /// Burn one countdown tick; runs on every status-register load.
    pub(crate) fn step_conversion(&self) {
        let raw = {
            let mut engine = self.adc.borrow_mut();
            let Some(capture) = engine.capture else { return };
            engine.remaining -= 1;
            if engine.remaining > 0 {
                return;
            }
            engine.capture = None;
            match capture {
                Capture::Analog(channel) => engine.inputs[channel as usize],
                Capture::Bandgap => {
                    (1_126_400 / engine.vcc_mv).min(1023) as u16
                }
            }
        };
        let adc = self.target.adc;
        let mut regs = self.regs.borrow_mut();
        regs[adc.adcl.index()] = raw as u8;
        regs[adc.adch.index()] = (raw >> 8) as u8;
        regs[adc.adcsra.index()] &= !(1 << adc.start_bit);
    }
}
