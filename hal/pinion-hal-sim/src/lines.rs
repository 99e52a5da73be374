//! Wire nets, line-level resolution, and the external-interrupt lines.

use pinion_hal::{Interrupts, Trigger};

use crate::SimMcu;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineState {
    /// Trigger sense; survives detach, like the hardware sense config.
    pub sense: Option<Trigger>,
    pub handler: Option<fn()>,
    /// Qualifying edge latched but not yet delivered.
    pub pending: bool,
}

impl SimMcu {
    /// Board pin wired to external-interrupt `line`, if any.
    fn pin_for_line(&self, line: u8) -> Option<usize> {
        self.target
            .pins
            .iter()
            .position(|pin| pin.irq_line == Some(line))
    }

    /// Resolve the level of one board pin's wire.
    ///
    /// External stimulus wins, then any driving output (wired-or), then
    /// a pull-up anywhere on the wire, then low.
    fn resolve_level(&self, index: usize) -> bool {
        let net = self.net.borrow();
        let ext = self.ext.borrow();
        let regs = self.regs.borrow();
        let id = net[index];
        let mut driven = false;
        let mut high = false;
        let mut pulled = false;
        for (j, desc) in self.target.pins.iter().enumerate() {
            if net[j] != id {
                continue;
            }
            if let Some(level) = ext[j] {
                return level;
            }
            let port = self.target.ports[desc.port as usize];
            let mask = 1 << desc.bit;
            if regs[port.ddr.index()] & mask != 0 {
                driven = true;
                high |= regs[port.port.index()] & mask != 0;
            } else if regs[port.port.index()] & mask != 0 {
                pulled = true;
            }
        }
        if driven {
            high
        } else {
            pulled
        }
    }

    /// Recompute every wire, mirror the levels into the port input
    /// registers, and deliver or latch interrupt events.
    ///
    /// Handlers run only after every internal borrow is released, so
    /// they are free to use the bus (and re-enter this path).
    pub(crate) fn sync_lines(&self) {
        let mut fired: Vec<fn()> = Vec::new();

        let new_levels: Vec<bool> = (0..self.target.pins.len())
            .map(|i| self.resolve_level(i))
            .collect();

        {
            let mut regs = self.regs.borrow_mut();
            for (i, desc) in self.target.pins.iter().enumerate() {
                let port = self.target.ports[desc.port as usize];
                let byte = &mut regs[port.pin.index()];
                if new_levels[i] {
                    *byte |= 1 << desc.bit;
                } else {
                    *byte &= !(1 << desc.bit);
                }
            }
        }

        {
            let old = self.levels.borrow().clone();
            let mut lines = self.lines.borrow_mut();
            for (i, desc) in self.target.pins.iter().enumerate() {
                let Some(line) = desc.irq_line else { continue };
                let (was, now) = (old[i], new_levels[i]);
                if was == now {
                    continue;
                }
                let state = &mut lines[line as usize];
                let Some(sense) = state.sense else { continue };
                let qualifies = match sense {
                    Trigger::Rising => now,
                    Trigger::Falling | Trigger::Low => !now,
                    Trigger::Change => true,
                };
                if !qualifies {
                    continue;
                }
                if sense == Trigger::Low {
                    // Level interrupts never latch; they fire only while
                    // unmasked.
                    if let Some(handler) = state.handler {
                        if self.irq_enabled.get() {
                            fired.push(handler);
                        }
                    }
                } else if let (Some(handler), true) =
                    (state.handler, self.irq_enabled.get())
                {
                    fired.push(handler);
                } else {
                    state.pending = true;
                }
            }
        }

        *self.levels.borrow_mut() = new_levels;

        for handler in fired {
            handler();
        }
    }

    /// Deliver latched events for armed lines; runs when the global mask
    /// re-enables.
    fn drain_pending(&self) {
        let mut fired: Vec<fn()> = Vec::new();
        {
            let levels = self.levels.borrow();
            let mut lines = self.lines.borrow_mut();
            for (line, state) in lines.iter_mut().enumerate() {
                let Some(handler) = state.handler else { continue };
                if state.pending {
                    state.pending = false;
                    fired.push(handler);
                }
                // A held-low line re-fires its level interrupt on unmask.
                if state.sense == Some(Trigger::Low) {
                    if let Some(pin) = self.pin_for_line(line as u8) {
                        if !levels[pin] {
                            fired.push(handler);
                        }
                    }
                }
            }
        }
        for handler in fired {
            handler();
        }
    }

    /// Latched-event flag for one line (test hook).
    pub fn is_pending(&self, line: u8) -> bool {
        self.lines.borrow()[line as usize].pending
    }
}

impl Interrupts for SimMcu {
    fn irq_save(&self) -> u8 {
        self.irq_enabled.replace(false) as u8
    }

    fn irq_restore(&self, saved: u8) {
        let enable = saved != 0;
        let was = self.irq_enabled.replace(enable);
        if enable && !was {
            self.drain_pending();
        }
    }

    fn attach(&self, line: u8, trigger: Trigger, handler: fn()) {
        {
            let mut lines = self.lines.borrow_mut();
            let state = &mut lines[line as usize];
            state.sense = Some(trigger);
            state.handler = Some(handler);
        }
        // Arming a level trigger on an already-low line fires right away.
        let fire_now = trigger == Trigger::Low
            && self.irq_enabled.get()
            && self
                .pin_for_line(line)
                .is_some_and(|pin| !self.levels.borrow()[pin]);
        if fire_now {
            handler();
        }
    }

    fn detach(&self, line: u8) {
        self.lines.borrow_mut()[line as usize].handler = None;
    }

    fn clear_pending(&self, line: u8) {
        self.lines.borrow_mut()[line as usize].pending = false;
    }
}
