//! ATmega328P (Uno board layout): three ports, two external-interrupt
//! lines, three timers with six compare outputs, eight ADC channels (six
//! on the board pin map).
//!
//! Register indices are the chip's data-space addresses.

use crate::bus::Reg;
use crate::target::{AdcRegs, PinDesc, PortRegs, Target, TimerOutput};

// Port triples in pin-map order: B, C, D.
const PORTS: &[PortRegs] = &[
    PortRegs {
        ddr: Reg::new(0x24),
        port: Reg::new(0x25),
        pin: Reg::new(0x23),
    },
    PortRegs {
        ddr: Reg::new(0x27),
        port: Reg::new(0x28),
        pin: Reg::new(0x26),
    },
    PortRegs {
        ddr: Reg::new(0x2a),
        port: Reg::new(0x2b),
        pin: Reg::new(0x29),
    },
];

const B: u8 = 0;
const C: u8 = 1;
const D: u8 = 2;

const TCCR0A: Reg = Reg::new(0x44);
const TCCR1A: Reg = Reg::new(0x80);
const TCCR2A: Reg = Reg::new(0xb0);

// Every compare output the chip exposes, COMnx1 bit per output.
const TIMER_OUTPUTS: &[TimerOutput] = &[
    // OC0A, OC0B
    TimerOutput {
        tccr: TCCR0A,
        com_bit: 7,
        ocr: Reg::new(0x47),
    },
    TimerOutput {
        tccr: TCCR0A,
        com_bit: 5,
        ocr: Reg::new(0x48),
    },
    // OC1A, OC1B
    TimerOutput {
        tccr: TCCR1A,
        com_bit: 7,
        ocr: Reg::new(0x88),
    },
    TimerOutput {
        tccr: TCCR1A,
        com_bit: 5,
        ocr: Reg::new(0x8a),
    },
    // OC2A, OC2B
    TimerOutput {
        tccr: TCCR2A,
        com_bit: 7,
        ocr: Reg::new(0xb3),
    },
    TimerOutput {
        tccr: TCCR2A,
        com_bit: 5,
        ocr: Reg::new(0xb4),
    },
];

const OC0A: u8 = 0;
const OC0B: u8 = 1;
const OC1A: u8 = 2;
const OC1B: u8 = 3;
const OC2A: u8 = 4;
const OC2B: u8 = 5;

// Uno silkscreen order: D0-D13, then A0-A5 as pins 14-19.
const PINS: &[PinDesc] = &[
    PinDesc::gpio(D, 0),
    PinDesc::gpio(D, 1),
    PinDesc::gpio(D, 2).with_irq(0),
    PinDesc::gpio(D, 3).with_irq(1).with_pwm(OC2B),
    PinDesc::gpio(D, 4),
    PinDesc::gpio(D, 5).with_pwm(OC0B),
    PinDesc::gpio(D, 6).with_pwm(OC0A),
    PinDesc::gpio(D, 7),
    PinDesc::gpio(B, 0),
    PinDesc::gpio(B, 1).with_pwm(OC1A),
    PinDesc::gpio(B, 2).with_pwm(OC1B),
    PinDesc::gpio(B, 3).with_pwm(OC2A),
    PinDesc::gpio(B, 4),
    PinDesc::gpio(B, 5),
    PinDesc::gpio(C, 0).with_adc(0),
    PinDesc::gpio(C, 1).with_adc(1),
    PinDesc::gpio(C, 2).with_adc(2),
    PinDesc::gpio(C, 3).with_adc(3),
    PinDesc::gpio(C, 4).with_adc(4),
    PinDesc::gpio(C, 5).with_adc(5),
];

/// ATmega328P on the Uno pin map.
pub const ATMEGA328P: Target = Target {
    name: "atmega328p",
    register_space: 0x100,
    ports: PORTS,
    pins: PINS,
    adc: AdcRegs {
        admux: Reg::new(0x7c),
        adcsra: Reg::new(0x7a),
        adcl: Reg::new(0x78),
        adch: Reg::new(0x79),
        bank_select: None,
        ref_shift: 6,
        mux_mask: 0x0f,
        start_bit: 6,
        bandgap_mux: 0x0e,
    },
    timer_outputs: TIMER_OUTPUTS,
    irq_lines: 2,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_map_shape() {
        assert_eq!(ATMEGA328P.pins.len(), 20);
        assert_eq!(ATMEGA328P.timer_outputs.len(), 6);
        assert_eq!(ATMEGA328P.irq_lines, 2);
        for desc in ATMEGA328P.pins {
            assert!((desc.port as usize) < ATMEGA328P.ports.len());
            assert!(desc.bit < 8);
            if let Some(timer) = desc.timer {
                assert!((timer as usize) < ATMEGA328P.timer_outputs.len());
            }
        }
    }

    #[test]
    fn test_six_pwm_pins_six_analog_pins() {
        let pwm = ATMEGA328P.pins.iter().filter(|p| p.timer.is_some()).count();
        let adc = ATMEGA328P
            .pins
            .iter()
            .filter(|p| p.adc_channel.is_some())
            .count();
        assert_eq!(pwm, 6);
        assert_eq!(adc, 6);
    }

    #[test]
    fn test_registers_fit_register_space() {
        let space = ATMEGA328P.register_space;
        for port in ATMEGA328P.ports {
            assert!((port.ddr.index() as u16) < space);
            assert!((port.port.index() as u16) < space);
            assert!((port.pin.index() as u16) < space);
        }
        for timer in ATMEGA328P.timer_outputs {
            assert!((timer.tccr.index() as u16) < space);
            assert!((timer.ocr.index() as u16) < space);
        }
        assert!((ATMEGA328P.adc.admux.index() as u16) < space);
    }
}
