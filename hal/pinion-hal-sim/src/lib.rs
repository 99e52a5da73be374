//! Simulated MCU backend
//!
//! Implements the `pinion-hal` traits against a plain byte array instead
//! of real hardware, so the whole logic layer runs under `cargo test` on
//! the host. The simulation is small but honest about the parts the logic
//! layer depends on:
//!
//! - port input registers track resolved line levels: outputs drive their
//!   nets, undriven inputs read back the pull-up, external stimulus wins
//!   over anything the chip drives
//! - external-interrupt lines latch qualifying edges while masked or
//!   detached, and dispatch handlers synchronously on the store that
//!   caused the edge
//! - a started conversion completes after a configurable number of
//!   control-register reads, so "still converting" is observable
//! - the clock advances only through delays and [`SimMcu::advance_us`]
//!
//! Tests wire board pins together with [`SimMcu::connect`], stimulate
//! them with [`SimMcu::drive`] / [`SimMcu::release`], and program analog
//! levels with [`SimMcu::set_analog_input`].

#![deny(unsafe_code)]

mod adc;
mod lines;

use std::cell::{Cell, RefCell};

use pinion_hal::{Clock, Reg, RegisterBus, Target};

use adc::AdcEngine;
use lines::LineState;

/// Simulated microcontroller for one [`Target`].
pub struct SimMcu {
    target: Target,
    regs: RefCell<Vec<u8>>,
    /// Net id per board pin; pins sharing an id share a wire.
    net: RefCell<Vec<u8>>,
    /// External stimulus per board pin.
    ext: RefCell<Vec<Option<bool>>>,
    /// Resolved line level per board pin, from the last sync.
    levels: RefCell<Vec<bool>>,
    lines: RefCell<Vec<LineState>>,
    irq_enabled: Cell<bool>,
    now_us: Cell<u64>,
    adc: RefCell<AdcEngine>,
}

impl SimMcu {
    /// Fresh simulator: registers zeroed, every pin on its own wire, no
    /// stimulus, interrupts enabled.
    pub fn new(target: Target) -> Self {
        let pins = target.pins.len();
        let sim = SimMcu {
            target,
            regs: RefCell::new(vec![0; target.register_space as usize]),
            net: RefCell::new((0..pins as u8).collect()),
            ext: RefCell::new(vec![None; pins]),
            levels: RefCell::new(vec![false; pins]),
            lines: RefCell::new(vec![LineState::default(); target.irq_lines as usize]),
            irq_enabled: Cell::new(true),
            now_us: Cell::new(0),
            adc: RefCell::new(AdcEngine::new()),
        };
        sim.sync_lines();
        sim
    }

    /// The target this simulator was built for.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Tie two board pins to the same wire.
    pub fn connect(&self, a: u8, b: u8) {
        {
            let mut net = self.net.borrow_mut();
            let from = net[b as usize];
            let to = net[a as usize];
            for id in net.iter_mut() {
                if *id == from {
                    *id = to;
                }
            }
        }
        self.sync_lines();
    }

    /// Drive a board pin's wire from outside the chip.
    pub fn drive(&self, pin: u8, level: bool) {
        self.ext.borrow_mut()[pin as usize] = Some(level);
        self.sync_lines();
    }

    /// Remove the external stimulus from a board pin's wire.
    pub fn release(&self, pin: u8) {
        self.ext.borrow_mut()[pin as usize] = None;
        self.sync_lines();
    }

    /// Raw register peek, without the side effects of a bus load.
    pub fn peek(&self, reg: Reg) -> u8 {
        self.regs.borrow()[reg.index()]
    }

    /// Advance the virtual clock without running a delay.
    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get().wrapping_add(us));
    }
}

/// [`embedded_hal::delay::DelayNs`] adapter over the simulator clock.
pub struct SimDelay<'a>(pub &'a SimMcu);

impl embedded_hal::delay::DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance_us(u64::from(ns.div_ceil(1_000)));
    }
}

impl RegisterBus for SimMcu {
    fn load(&self, reg: Reg) -> u8 {
        // The control/status register is where conversion time passes.
        if reg == self.target.adc.adcsra {
            self.step_conversion();
        }
        self.regs.borrow()[reg.index()]
    }

    fn store(&self, reg: Reg, value: u8) {
        let started = {
            let mut regs = self.regs.borrow_mut();
            let adc = self.target.adc;
            let start = 1 << adc.start_bit;
            let was = regs[reg.index()];
            regs[reg.index()] = value;
            reg == adc.adcsra && value & start != 0 && was & start == 0
        };
        if started {
            self.begin_conversion();
        }
        self.sync_lines();
    }
}

impl Clock for SimMcu {
    fn millis(&self) -> u32 {
        (self.now_us.get() / 1_000) as u32
    }

    fn micros(&self) -> u32 {
        self.now_us.get() as u32
    }

    fn delay_us(&self, us: u32) {
        self.advance_us(u64::from(us));
    }
}
