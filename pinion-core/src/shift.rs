//! Bit-banged shift-register serial I/O
//!
//! Two-wire synchronous shifting built purely on [`Pin`] digital I/O: one
//! data line, one clock line, no framing and no error detection. The peer
//! protocol is whatever the caller wired up; the bit count per word is the
//! storage width of the value type.
//!
//! Per bit, [`shift_out`] waits the data-setup delay, presents the bit,
//! then pulses the clock high for the pulse delay. [`shift_in`] raises the
//! clock, waits the pulse delay, samples, and drops the clock, so it pairs
//! with a peer that presents data on the rising edge.

use pinion_hal::Mcu;

use crate::pin::{Drive, Edge, Pin};

/// Transmission order within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    LsbFirst,
    MsbFirst,
}

/// Unit the [`ShiftTiming`] delays are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeUnit {
    Micros,
    Millis,
}

/// Busy-wait delays applied while shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftTiming {
    /// Wait between the two clock edges of each pulse.
    pub pulse_delay: u32,
    /// Wait before each data-bit write (shift-out only).
    pub data_delay: u32,
    pub unit: TimeUnit,
}

impl Default for ShiftTiming {
    fn default() -> Self {
        Self {
            pulse_delay: 10,
            data_delay: 50,
            unit: TimeUnit::Micros,
        }
    }
}

impl ShiftTiming {
    fn pause<M: Mcu>(&self, mcu: &M, amount: u32) {
        if amount == 0 {
            return;
        }
        match self.unit {
            TimeUnit::Micros => mcu.delay_us(amount),
            TimeUnit::Millis => mcu.delay_ms(amount),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Word types the shift routines serialize: the unsigned integers up to
/// 64 bits wide.
pub trait ShiftWord: sealed::Sealed + Copy {
    const BITS: u32;
    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_shift_word {
    ($($ty:ty),*) => {$(
        impl ShiftWord for $ty {
            const BITS: u32 = <$ty>::BITS;
            fn to_bits(self) -> u64 {
                u64::from(self)
            }
            fn from_bits(bits: u64) -> Self {
                bits as $ty
            }
        }
    )*};
}

impl_shift_word!(u8, u16, u32, u64);

fn bit_position(order: BitOrder, width: u32, step: u32) -> u32 {
    match order {
        BitOrder::LsbFirst => step,
        BitOrder::MsbFirst => width - 1 - step,
    }
}

/// Clock `value` out over `data`, one bit per pulse on `clock`.
///
/// Both pins are expected to be in output mode already.
pub fn shift_out<M: Mcu, W: ShiftWord>(
    data: &Pin<'_, M>,
    clock: &Pin<'_, M>,
    value: W,
    order: BitOrder,
    timing: &ShiftTiming,
) {
    let bits = value.to_bits();
    for step in 0..W::BITS {
        let high = (bits >> bit_position(order, W::BITS, step)) & 1 != 0;
        timing.pause(data.mcu, timing.data_delay);
        data.write(if high { Drive::High } else { Drive::Low });
        clock.write(Drive::High);
        timing.pause(data.mcu, timing.pulse_delay);
        clock.write(Drive::Low);
    }
}

/// Clock one word in over `data`, sampling after each rising edge on
/// `clock`.
pub fn shift_in<M: Mcu, W: ShiftWord>(
    data: &Pin<'_, M>,
    clock: &Pin<'_, M>,
    order: BitOrder,
    timing: &ShiftTiming,
) -> W {
    let mut bits = 0u64;
    for step in 0..W::BITS {
        clock.write(Drive::High);
        timing.pause(data.mcu, timing.pulse_delay);
        if data.read(Edge::None) {
            bits |= 1u64 << bit_position(order, W::BITS, step);
        }
        clock.write(Drive::Low);
    }
    W::from_bits(bits)
}
