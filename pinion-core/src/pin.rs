//! Pin handles: mode switching, digital read/write, edge detection
//!
//! A [`Pin`] owns one resolved [`PinBinding`] plus the transient state the
//! pin accumulates at runtime (configured mode, edge-detection history,
//! PWM-enabled flag). All of that lives in [`Cell`]s so handles can be
//! passed around as read-only values while still tracking hardware state;
//! every public operation takes `&self`.
//!
//! Register-pair updates (direction + output latch) run with interrupts
//! masked and the previous mask state restored exactly, so a mode switch
//! cannot be torn by an interrupt handler touching the same port.

use core::cell::Cell;
use core::convert::Infallible;

use pinion_hal::Mcu;
use pinion_hal::RegisterBus;
use pinion_hal::Target;

use crate::binding::PinBinding;

/// Pin operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// High-impedance input.
    Input,
    /// Input with the internal pull-up enabled.
    InputPullup,
    /// Driven digital output.
    Output,
    /// Output driven by a timer compare unit.
    Pwm,
}

impl PinMode {
    /// True for both input variants.
    pub fn is_input(self) -> bool {
        matches!(self, PinMode::Input | PinMode::InputPullup)
    }
}

/// Level written by [`Pin::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    Low,
    High,
    /// Invert the current output latch.
    Toggle,
}

/// Sampling mode for [`Pin::read`].
///
/// The edge variants feed a two-sample detector: each call shifts the new
/// sample into a 2-bit history and reports whether the history now matches
/// the requested transition. Nothing is latched in hardware, so callers
/// must sample faster than the signal changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Raw level, no history update.
    None,
    /// Fires on either transition; updates both histories.
    Change,
    /// Fires on a high-to-low transition.
    Falling,
    /// Fires on a low-to-high transition.
    Rising,
}

/// Handle for one physical pin.
///
/// Construction resolves the register binding once; nothing touches the
/// hardware until [`init`](Pin::init) applies the stored mode.
pub struct Pin<'a, M> {
    pub(crate) mcu: &'a M,
    pub(crate) binding: PinBinding,
    pub(crate) mode: Cell<PinMode>,
    pub(crate) pwm_on: Cell<bool>,
    // Independent 2-bit histories per detector. Falling starts all-low and
    // rising all-high so the very first sample cannot fake a transition.
    fall_history: Cell<u8>,
    rise_history: Cell<u8>,
}

impl<'a, M: Mcu> Pin<'a, M> {
    /// Resolve `number` on `target` and record `mode` without applying it.
    ///
    /// # Panics
    ///
    /// Panics if `number` is not on the target's pin map (see
    /// [`PinBinding::resolve`]).
    pub fn new(mcu: &'a M, target: &Target, number: u8, mode: PinMode) -> Self {
        Self {
            mcu,
            binding: PinBinding::resolve(target, number),
            mode: Cell::new(mode),
            pwm_on: Cell::new(false),
            fall_history: Cell::new(0b00),
            rise_history: Cell::new(0b01),
        }
    }

    /// Force-apply the stored mode, bypassing the same-mode no-op.
    pub fn init(&self) {
        self.apply_mode(self.mode.get());
    }

    /// Switch the pin to `mode`.
    ///
    /// A call with the current mode is a no-op. Leaving [`PinMode::Pwm`]
    /// disconnects the compare output first. Requesting [`PinMode::Pwm`] on
    /// a pin with no timer output falls back to [`PinMode::Input`], and the
    /// fallback is what [`mode`](Pin::mode) reports afterwards.
    pub fn set_mode(&self, mode: PinMode) {
        if mode == self.mode.get() {
            return;
        }
        self.apply_mode(mode);
    }

    fn apply_mode(&self, requested: PinMode) {
        if self.mode.get() == PinMode::Pwm && requested != PinMode::Pwm {
            self.disable_pwm();
        }
        let mode = match requested {
            PinMode::Pwm if !self.binding.is_pwm_capable() => PinMode::Input,
            other => other,
        };
        // Record before the register switch so the PWM enable gate below
        // sees the mode it is being enabled under.
        self.mode.set(mode);
        let dir = self.binding.dir();
        let out = self.binding.output();
        let mask = self.binding.mask();
        self.mcu.masked(|| match mode {
            PinMode::Input => {
                self.mcu.clear_bits(dir, mask);
                self.mcu.clear_bits(out, mask);
            }
            PinMode::InputPullup => {
                self.mcu.clear_bits(dir, mask);
                self.mcu.set_bits(out, mask);
            }
            PinMode::Output | PinMode::Pwm => {
                self.mcu.set_bits(dir, mask);
                self.mcu.clear_bits(out, mask);
            }
        });
        if mode == PinMode::Pwm {
            self.enable_pwm();
        }
    }

    /// Set the output latch to `drive`.
    ///
    /// Meaningful only in an output mode; in input modes this manipulates
    /// the pull-up instead (not validated, same as the hardware).
    pub fn write(&self, drive: Drive) {
        let out = self.binding.output();
        let mask = self.binding.mask();
        self.mcu.masked(|| match drive {
            Drive::Low => self.mcu.clear_bits(out, mask),
            Drive::High => self.mcu.set_bits(out, mask),
            Drive::Toggle => self.mcu.toggle_bits(out, mask),
        });
    }

    pub fn set_high(&self) {
        self.write(Drive::High);
    }

    pub fn set_low(&self) {
        self.write(Drive::Low);
    }

    pub fn toggle(&self) {
        self.write(Drive::Toggle);
    }

    /// Sample the pin, optionally running it through an edge detector.
    ///
    /// `Edge::None` returns the level. The edge variants return true
    /// exactly when this sample completes the requested transition; each
    /// detector keeps its own history, and `Edge::Change` advances both.
    /// Reads are not interrupt-masked.
    pub fn read(&self, edge: Edge) -> bool {
        let sample = self.mcu.load(self.binding.input()) & self.binding.mask() != 0;
        let bit = sample as u8;
        match edge {
            Edge::None => sample,
            Edge::Falling => shift_history(&self.fall_history, bit) == 0b10,
            Edge::Rising => shift_history(&self.rise_history, bit) == 0b01,
            Edge::Change => {
                let fell = shift_history(&self.fall_history, bit) == 0b10;
                let rose = shift_history(&self.rise_history, bit) == 0b01;
                fell || rose
            }
        }
    }

    /// Logical pin number.
    pub fn number(&self) -> u8 {
        self.binding.number()
    }

    /// Currently recorded mode.
    pub fn mode(&self) -> PinMode {
        self.mode.get()
    }

    pub fn is_pwm_capable(&self) -> bool {
        self.binding.is_pwm_capable()
    }

    pub fn is_interrupt_capable(&self) -> bool {
        self.binding.is_interrupt_capable()
    }

    pub fn is_adc_capable(&self) -> bool {
        self.binding.is_adc_capable()
    }

    pub fn is_pwm_enabled(&self) -> bool {
        self.pwm_on.get()
    }
}

fn shift_history(history: &Cell<u8>, bit: u8) -> u8 {
    let shifted = ((history.get() << 1) & 0b11) | bit;
    history.set(shifted);
    shifted
}

/// Force-initialize several pins in order.
pub fn init_pins<M: Mcu>(pins: &[&Pin<'_, M>]) {
    for pin in pins {
        pin.init();
    }
}

impl<M: Mcu> embedded_hal::digital::ErrorType for Pin<'_, M> {
    type Error = Infallible;
}

impl<M: Mcu> embedded_hal::digital::InputPin for Pin<'_, M> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read(Edge::None))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read(Edge::None))
    }
}

impl<M: Mcu> embedded_hal::digital::OutputPin for Pin<'_, M> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(Drive::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(Drive::High);
        Ok(())
    }
}

impl<M: Mcu> embedded_hal::digital::StatefulOutputPin for Pin<'_, M> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.mcu.load(self.binding.output()) & self.binding.mask() != 0)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.mcu.load(self.binding.output()) & self.binding.mask() == 0)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.write(Drive::Toggle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pinion_hal::target::ATMEGA328P;
    use pinion_hal::{Interrupts, Trigger};
    use pinion_hal_sim::SimMcu;
    use proptest::prelude::*;

    use super::*;

    thread_local! {
        static HITS: Cell<u32> = const { Cell::new(0) };
    }

    fn bump() {
        HITS.with(|h| h.set(h.get() + 1));
    }

    fn hits() -> u32 {
        HITS.with(|h| h.get())
    }

    fn reset_hits() {
        HITS.with(|h| h.set(0));
    }

    #[test]
    fn test_new_touches_no_hardware() {
        let sim = SimMcu::new(ATMEGA328P);
        let binding = PinBinding::resolve(&ATMEGA328P, 13);
        let before = sim.peek(binding.dir());
        let _pin = Pin::new(&sim, &ATMEGA328P, 13, PinMode::Output);
        assert_eq!(sim.peek(binding.dir()), before);
    }

    #[test]
    fn test_same_mode_is_noop_until_forced() {
        let sim = SimMcu::new(ATMEGA328P);
        let pin = Pin::new(&sim, &ATMEGA328P, 13, PinMode::Output);
        pin.init();
        pin.set_high();
        assert!(pin.read(Edge::None));

        // Same mode again: the output latch survives, nothing reapplied.
        pin.set_mode(PinMode::Output);
        assert!(pin.read(Edge::None));

        // Forced init reapplies the mode and clears the latch.
        pin.init();
        assert!(!pin.read(Edge::None));
    }

    #[test]
    fn test_mode_switch_programs_register_pair() {
        let sim = SimMcu::new(ATMEGA328P);
        let binding = PinBinding::resolve(&ATMEGA328P, 8);
        let pin = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
        pin.init();
        assert_eq!(sim.peek(binding.dir()) & binding.mask(), 0);
        assert_eq!(sim.peek(binding.output()) & binding.mask(), 0);

        pin.set_mode(PinMode::InputPullup);
        assert_eq!(sim.peek(binding.dir()) & binding.mask(), 0);
        assert_ne!(sim.peek(binding.output()) & binding.mask(), 0);

        pin.set_mode(PinMode::Output);
        assert_ne!(sim.peek(binding.dir()) & binding.mask(), 0);
        assert_eq!(sim.peek(binding.output()) & binding.mask(), 0);
    }

    #[test]
    fn test_pwm_request_without_timer_falls_back_to_input() {
        let sim = SimMcu::new(ATMEGA328P);
        let binding = PinBinding::resolve(&ATMEGA328P, 4);
        let pin = Pin::new(&sim, &ATMEGA328P, 4, PinMode::Output);
        pin.init();

        pin.set_mode(PinMode::Pwm);
        assert_eq!(pin.mode(), PinMode::Input);
        assert!(!pin.is_pwm_enabled());
        assert_eq!(sim.peek(binding.dir()) & binding.mask(), 0);
    }

    #[test]
    fn test_write_read_roundtrip_over_net() {
        let sim = SimMcu::new(ATMEGA328P);
        sim.connect(12, 8);
        let writer = Pin::new(&sim, &ATMEGA328P, 12, PinMode::Output);
        let reader = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
        init_pins(&[&writer, &reader]);

        writer.write(Drive::High);
        assert!(reader.read(Edge::None));
        writer.write(Drive::Low);
        assert!(!reader.read(Edge::None));
        writer.write(Drive::Toggle);
        assert!(reader.read(Edge::None));
    }

    #[test]
    fn test_edge_vectors() {
        let sim = SimMcu::new(ATMEGA328P);
        let pin = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
        pin.init();

        let seq = [false, true, true, false, true];
        let mut rising = [false; 5];
        let mut falling = [false; 5];
        for (i, &level) in seq.iter().enumerate() {
            sim.drive(8, level);
            rising[i] = pin.read(Edge::Rising);
            falling[i] = pin.read(Edge::Falling);
        }
        assert_eq!(rising, [false, true, false, false, true]);
        assert_eq!(falling, [false, false, false, true, false]);

        // Fresh handle so the change detector starts from clean histories.
        sim.drive(8, false);
        let pin = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
        let mut change = [false; 5];
        for (i, &level) in seq.iter().enumerate() {
            sim.drive(8, level);
            change[i] = pin.read(Edge::Change);
        }
        assert_eq!(change, [false, true, false, true, true]);
    }

    #[test]
    fn test_mode_switch_preserves_interrupt_mask() {
        reset_hits();
        let sim = SimMcu::new(ATMEGA328P);
        let pin = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
        pin.init();

        let saved = sim.irq_save();
        // The nested masked section inside must not re-enable interrupts.
        pin.set_mode(PinMode::Output);
        sim.attach(0, Trigger::Rising, bump);
        sim.drive(2, true);
        assert_eq!(hits(), 0);
        assert!(sim.is_pending(0));

        sim.irq_restore(saved);
        assert_eq!(hits(), 1);
    }

    #[test]
    fn test_embedded_hal_digital_traits() {
        use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

        let sim = SimMcu::new(ATMEGA328P);
        let mut pin = Pin::new(&sim, &ATMEGA328P, 13, PinMode::Output);
        pin.init();

        OutputPin::set_high(&mut pin).unwrap();
        assert!(StatefulOutputPin::is_set_high(&mut pin).unwrap());
        assert!(InputPin::is_high(&mut pin).unwrap());
        StatefulOutputPin::toggle(&mut pin).unwrap();
        assert!(StatefulOutputPin::is_set_low(&mut pin).unwrap());
    }

    proptest! {
        #[test]
        fn prop_edge_detectors_match_two_sample_model(
            samples in proptest::collection::vec(any::<bool>(), 1..64),
        ) {
            let sim = SimMcu::new(ATMEGA328P);
            let pin = Pin::new(&sim, &ATMEGA328P, 8, PinMode::Input);
            pin.init();

            let mut rise = 0b01u8;
            let mut fall = 0b00u8;
            for &level in &samples {
                sim.drive(8, level);
                rise = ((rise << 1) & 0b11) | level as u8;
                fall = ((fall << 1) & 0b11) | level as u8;
                prop_assert_eq!(pin.read(Edge::Rising), rise == 0b01);
                prop_assert_eq!(pin.read(Edge::Falling), fall == 0b10);
            }
        }
    }
}
