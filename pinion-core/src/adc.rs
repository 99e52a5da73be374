//! Shared-ADC conversion protocol
//!
//! One physical converter serves every analog-capable pin, so conversions
//! go through a shared [`Adc`] object owned by whoever composes the system.
//! Its state machine admits at most one conversion in flight and routes the
//! result back to the channel that started it:
//!
//! ```text
//!                  poll (accepted)
//!        ┌──────┐ ────────────────► ┌───────────────┐
//!        │ Idle │                   │ Busy{channel} │◄─┐
//!        └──────┘ ◄──────────────── └───────────────┘  │ same channel,
//!            ▲      same channel,           │          │ still converting
//!            │      hardware done           └──────────┘
//!            │                        other channel: rejected,
//!            │                        hardware untouched
//! ```
//!
//! Three calling conventions sit on top:
//!
//! - [`Pin::analog_read`] blocks (spins) and bypasses the machine entirely;
//! - [`Pin::poll_conversion`] runs the machine one step per call, with the
//!   result parked in [`Adc::last_result`];
//! - [`Pin::analog_read_async`] is the same step but hands the result to a
//!   callback on the completing call.
//!
//! Mixing the blocking path with the polled paths in one program is not
//! supported: the blocking path assumes the converter is free. Pick one
//! convention per deployment.

use core::cell::Cell;

use pinion_hal::target::AdcRegs;
use pinion_hal::{Mcu, RegisterBus, Target};

use crate::pin::Pin;

/// Voltage reference for conversions.
///
/// Process-wide: the selection persists in [`Adc`] and is programmed into
/// the mux register's high bits on every conversion start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogReference {
    /// External voltage on the AREF pin.
    External,
    /// The supply rail.
    AVcc,
    /// The internal 1.1 V bandgap.
    Internal1v1,
    /// Raw two-bit reference field, for layouts this enum does not name.
    Raw(u8),
}

impl AnalogReference {
    fn bits(self) -> u8 {
        match self {
            AnalogReference::External => 0b00,
            AnalogReference::AVcc => 0b01,
            AnalogReference::Internal1v1 => 0b11,
            AnalogReference::Raw(value) => value & 0b11,
        }
    }
}

/// Conversion protocol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcState {
    /// No conversion in flight.
    Idle,
    /// A conversion is in flight and owned by `channel`.
    Busy { channel: u8 },
}

/// The shared converter.
///
/// Holds the protocol state, the persistent reference selection, and the
/// most recent completed result. One instance per physical ADC; every
/// conversion call borrows it.
pub struct Adc {
    regs: AdcRegs,
    state: Cell<AdcState>,
    reference: Cell<AnalogReference>,
    result: Cell<Option<u16>>,
}

impl Adc {
    pub fn new(target: &Target) -> Self {
        Self {
            regs: target.adc,
            state: Cell::new(AdcState::Idle),
            reference: Cell::new(AnalogReference::AVcc),
            result: Cell::new(None),
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> AdcState {
        self.state.get()
    }

    /// Result of the most recent completed conversion.
    ///
    /// Some from the moment a conversion completes until the next accepted
    /// start clears it.
    pub fn last_result(&self) -> Option<u16> {
        self.result.get()
    }

    pub fn reference(&self) -> AnalogReference {
        self.reference.get()
    }

    /// Select the reference used by all subsequent conversions.
    pub fn set_reference(&self, reference: AnalogReference) {
        self.reference.set(reference);
    }

    /// Program bank + mux for `channel` and start the hardware.
    fn start<M: Mcu>(&self, mcu: &M, channel: u8) {
        let admux = (self.reference.get().bits() << self.regs.ref_shift)
            | (channel & self.regs.mux_mask);
        mcu.store(self.regs.admux, admux);
        if let Some((bank, bit)) = self.regs.bank_select {
            if channel & 0x08 != 0 {
                mcu.set_bits(bank, 1 << bit);
            } else {
                mcu.clear_bits(bank, 1 << bit);
            }
        }
        mcu.set_bits(self.regs.adcsra, 1 << self.regs.start_bit);
    }

    /// True while the hardware conversion is still running.
    fn busy<M: Mcu>(&self, mcu: &M) -> bool {
        mcu.load(self.regs.adcsra) & (1 << self.regs.start_bit) != 0
    }

    /// Read and combine the 10-bit result, low byte first.
    fn read_data<M: Mcu>(&self, mcu: &M) -> u16 {
        let low = mcu.load(self.regs.adcl);
        let high = mcu.load(self.regs.adch);
        (u16::from(high) << 8) | u16::from(low)
    }
}

impl<M: Mcu> Pin<'_, M> {
    /// Blocking conversion on this pin's channel.
    ///
    /// Returns 0 immediately when the pin is PWM-enabled or has no ADC
    /// channel. Otherwise starts the hardware and spins until it finishes;
    /// there is no timeout, so hardware that never completes hangs the
    /// caller. This path ignores the [`Adc`] state machine.
    pub fn analog_read(&self, adc: &Adc) -> u16 {
        let Some(channel) = self.binding.adc_channel() else {
            return 0;
        };
        if self.pwm_on.get() {
            return 0;
        }
        adc.start(self.mcu, channel);
        while adc.busy(self.mcu) {}
        adc.read_data(self.mcu)
    }

    /// Drive the conversion protocol one step for this pin's channel.
    ///
    /// Idle: starts a conversion, clears [`Adc::last_result`], reports
    /// false. Busy on another channel: reports false and touches no
    /// hardware; the caller's loop is the retry. Busy on this channel:
    /// reports false until the hardware finishes, then stores the result,
    /// returns the machine to idle, and reports true.
    ///
    /// PWM-enabled and non-ADC pins complete degenerately: the stored
    /// result becomes 0 and the call reports true without touching the
    /// machine.
    pub fn poll_conversion(&self, adc: &Adc) -> bool {
        let Some(channel) = self.binding.adc_channel() else {
            adc.result.set(Some(0));
            return true;
        };
        if self.pwm_on.get() {
            adc.result.set(Some(0));
            return true;
        }
        match adc.state.get() {
            AdcState::Idle => {
                adc.result.set(None);
                adc.start(self.mcu, channel);
                adc.state.set(AdcState::Busy { channel });
                false
            }
            AdcState::Busy { channel: owner } if owner == channel => {
                if adc.busy(self.mcu) {
                    return false;
                }
                adc.result.set(Some(adc.read_data(self.mcu)));
                adc.state.set(AdcState::Idle);
                true
            }
            AdcState::Busy { .. } => false,
        }
    }

    /// [`poll_conversion`](Pin::poll_conversion) with the result handed to
    /// `callback` on the completing call, before this function returns.
    pub fn analog_read_async(&self, adc: &Adc, callback: impl FnOnce(u16)) -> bool {
        let done = self.poll_conversion(adc);
        if done {
            callback(adc.result.get().unwrap_or(0));
        }
        done
    }
}

/// Measure the supply rail in millivolts by converting the internal
/// bandgap reference against it.
///
/// Returns 0 if a conversion is already running. The reference selection
/// recorded in `adc` is reprogrammed afterwards so later conversions are
/// unaffected; the bandgap needs a short settle delay first, which this
/// busy-waits.
pub fn read_vcc<M: Mcu>(mcu: &M, adc: &Adc) -> u32 {
    if adc.busy(mcu) {
        return 0;
    }
    let regs = adc.regs;
    let admux = (AnalogReference::AVcc.bits() << regs.ref_shift) | regs.bandgap_mux;
    mcu.store(regs.admux, admux);
    mcu.delay_ms(2);
    mcu.set_bits(regs.adcsra, 1 << regs.start_bit);
    while adc.busy(mcu) {}
    let raw = adc.read_data(mcu);
    mcu.store(regs.admux, adc.reference.get().bits() << regs.ref_shift);
    if raw == 0 {
        return 0;
    }
    1_126_400 / u32::from(raw)
}
