//! ATmega2560 (Mega board layout): eleven ports, six external-interrupt
//! lines on the board pin map, six timers with fifteen usable compare
//! outputs, sixteen ADC channels behind a second-bank select bit.
//!
//! Register indices are the chip's data-space addresses; ports H through L
//! sit in extended I/O above 0x100.

use crate::bus::Reg;
use crate::target::{AdcRegs, PinDesc, PortRegs, Target, TimerOutput};

const fn triple(ddr: u16, port: u16, pin: u16) -> PortRegs {
    PortRegs {
        ddr: Reg::new(ddr),
        port: Reg::new(port),
        pin: Reg::new(pin),
    }
}

// Port triples in datasheet order: A through G, then the extended-I/O
// ports H, J, K, L.
const PORTS: &[PortRegs] = &[
    triple(0x21, 0x22, 0x20),    // A
    triple(0x24, 0x25, 0x23),    // B
    triple(0x27, 0x28, 0x26),    // C
    triple(0x2a, 0x2b, 0x29),    // D
    triple(0x2d, 0x2e, 0x2c),    // E
    triple(0x30, 0x31, 0x2f),    // F
    triple(0x33, 0x34, 0x32),    // G
    triple(0x101, 0x102, 0x100), // H
    triple(0x104, 0x105, 0x103), // J
    triple(0x107, 0x108, 0x106), // K
    triple(0x10a, 0x10b, 0x109), // L
];

const A: u8 = 0;
const B: u8 = 1;
const C: u8 = 2;
const D: u8 = 3;
const E: u8 = 4;
const F: u8 = 5;
const G: u8 = 6;
const H: u8 = 7;
const J: u8 = 8;
const K: u8 = 9;
const L: u8 = 10;

const fn output(tccr: u16, com_bit: u8, ocr: u16) -> TimerOutput {
    TimerOutput {
        tccr: Reg::new(tccr),
        com_bit,
        ocr: Reg::new(ocr),
    }
}

// Every timer unit the chip exposes; COMnA1/COMnB1/COMnC1 are bits
// 7/5/3 of each TCCRnA.
const TIMER_OUTPUTS: &[TimerOutput] = &[
    output(0x44, 7, 0x47),   // OC0A
    output(0x44, 5, 0x48),   // OC0B
    output(0x80, 7, 0x88),   // OC1A
    output(0x80, 5, 0x8a),   // OC1B
    output(0xb0, 7, 0xb3),   // OC2A
    output(0xb0, 5, 0xb4),   // OC2B
    output(0x90, 7, 0x98),   // OC3A
    output(0x90, 5, 0x9a),   // OC3B
    output(0x90, 3, 0x9c),   // OC3C
    output(0xa0, 7, 0xa8),   // OC4A
    output(0xa0, 5, 0xaa),   // OC4B
    output(0xa0, 3, 0xac),   // OC4C
    output(0x120, 7, 0x128), // OC5A
    output(0x120, 5, 0x12a), // OC5B
    output(0x120, 3, 0x12c), // OC5C
];

const OC0A: u8 = 0;
const OC0B: u8 = 1;
const OC1A: u8 = 2;
const OC1B: u8 = 3;
const OC2A: u8 = 4;
const OC2B: u8 = 5;
const OC3A: u8 = 6;
const OC3B: u8 = 7;
const OC3C: u8 = 8;
const OC4A: u8 = 9;
const OC4B: u8 = 10;
const OC4C: u8 = 11;
const OC5A: u8 = 12;
const OC5B: u8 = 13;
const OC5C: u8 = 14;

// Mega silkscreen order: D0-D53, then A0-A15 as pins 54-69.
const PINS: &[PinDesc] = &[
    PinDesc::gpio(E, 0),
    PinDesc::gpio(E, 1),
    PinDesc::gpio(E, 4).with_irq(4).with_pwm(OC3B),
    PinDesc::gpio(E, 5).with_irq(5).with_pwm(OC3C),
    PinDesc::gpio(G, 5).with_pwm(OC0B),
    PinDesc::gpio(E, 3).with_pwm(OC3A),
    PinDesc::gpio(H, 3).with_pwm(OC4A),
    PinDesc::gpio(H, 4).with_pwm(OC4B),
    PinDesc::gpio(H, 5).with_pwm(OC4C),
    PinDesc::gpio(H, 6).with_pwm(OC2B),
    PinDesc::gpio(B, 4).with_pwm(OC2A),
    PinDesc::gpio(B, 5).with_pwm(OC1A),
    PinDesc::gpio(B, 6).with_pwm(OC1B),
    PinDesc::gpio(B, 7).with_pwm(OC0A),
    PinDesc::gpio(J, 1),
    PinDesc::gpio(J, 0),
    PinDesc::gpio(H, 1),
    PinDesc::gpio(H, 0),
    PinDesc::gpio(D, 3).with_irq(3),
    PinDesc::gpio(D, 2).with_irq(2),
    PinDesc::gpio(D, 1).with_irq(1),
    PinDesc::gpio(D, 0).with_irq(0),
    PinDesc::gpio(A, 0),
    PinDesc::gpio(A, 1),
    PinDesc::gpio(A, 2),
    PinDesc::gpio(A, 3),
    PinDesc::gpio(A, 4),
    PinDesc::gpio(A, 5),
    PinDesc::gpio(A, 6),
    PinDesc::gpio(A, 7),
    PinDesc::gpio(C, 7),
    PinDesc::gpio(C, 6),
    PinDesc::gpio(C, 5),
    PinDesc::gpio(C, 4),
    PinDesc::gpio(C, 3),
    PinDesc::gpio(C, 2),
    PinDesc::gpio(C, 1),
    PinDesc::gpio(C, 0),
    PinDesc::gpio(D, 7),
    PinDesc::gpio(G, 2),
    PinDesc::gpio(G, 1),
    PinDesc::gpio(G, 0),
    PinDesc::gpio(L, 7),
    PinDesc::gpio(L, 6),
    PinDesc::gpio(L, 5).with_pwm(OC5C),
    PinDesc::gpio(L, 4).with_pwm(OC5B),
    PinDesc::gpio(L, 3).with_pwm(OC5A),
    PinDesc::gpio(L, 2),
    PinDesc::gpio(L, 1),
    PinDesc::gpio(L, 0),
    PinDesc::gpio(B, 3),
    PinDesc::gpio(B, 2),
    PinDesc::gpio(B, 1),
    PinDesc::gpio(B, 0),
    PinDesc::gpio(F, 0).with_adc(0),
    PinDesc::gpio(F, 1).with_adc(1),
    PinDesc::gpio(F, 2).with_adc(2),
    PinDesc::gpio(F, 3).with_adc(3),
    PinDesc::gpio(F, 4).with_adc(4),
    PinDesc::gpio(F, 5).with_adc(5),
    PinDesc::gpio(F, 6).with_adc(6),
    PinDesc::gpio(F, 7).with_adc(7),
    PinDesc::gpio(K, 0).with_adc(8),
    PinDesc::gpio(K, 1).with_adc(9),
    PinDesc::gpio(K, 2).with_adc(10),
    PinDesc::gpio(K, 3).with_adc(11),
    PinDesc::gpio(K, 4).with_adc(12),
    PinDesc::gpio(K, 5).with_adc(13),
    PinDesc::gpio(K, 6).with_adc(14),
    PinDesc::gpio(K, 7).with_adc(15),
];

/// ATmega2560 on the Mega pin map.
pub const ATMEGA2560: Target = Target {
    name: "atmega2560",
    register_space: 0x200,
    ports: PORTS,
    pins: PINS,
    adc: AdcRegs {
        admux: Reg::new(0x7c),
        adcsra: Reg::new(0x7a),
        adcl: Reg::new(0x78),
        adch: Reg::new(0x79),
        // MUX5 lives in ADCSRB and selects channels 8-15.
        bank_select: Some((Reg::new(0x7b), 3)),
        ref_shift: 6,
        mux_mask: 0x07,
        start_bit: 6,
        bandgap_mux: 0x1e,
    },
    timer_outputs: TIMER_OUTPUTS,
    irq_lines: 6,
};
