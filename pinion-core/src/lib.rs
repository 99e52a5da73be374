//! Target-agnostic pin logic for the Pinion I/O layer
//!
//! This crate contains everything that manipulates pins without naming a
//! concrete register address:
//!
//! - Pin-to-register binding resolution and caching
//! - Digital read/write/mode switching with software edge detection
//! - Timer-compare PWM enable/disable and duty output
//! - External-interrupt attach/detach
//! - The shared-ADC conversion protocol (blocking, polled, callback)
//! - Bit-banged shift-register serial I/O
//!
//! All of it is generic over [`pinion_hal::Mcu`], so the same logic drives a
//! real chip backend or the host simulator.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod binding;
pub mod interrupt;
pub mod pin;
pub mod pwm;
pub mod shift;

// Re-export key items at crate root for convenience
pub use adc::{read_vcc, Adc, AdcState, AnalogReference};
pub use binding::PinBinding;
pub use pin::{init_pins, Drive, Edge, Pin, PinMode};
pub use shift::{shift_in, shift_out, BitOrder, ShiftTiming, ShiftWord, TimeUnit};
