//! External-interrupt attach/detach
//!
//! Thin gatekeeping over [`pinion_hal::Interrupts`]: the pin must own an
//! external-interrupt line, and arming additionally requires an input mode
//! at call time (the mode can change after construction, so it is checked
//! here, not cached).

use pinion_hal::{Interrupts, Mcu, Trigger};

use crate::pin::Pin;

impl<M: Mcu> Pin<'_, M> {
    /// Arm `handler` on this pin's external-interrupt line.
    ///
    /// Arming happens only when the pin is interrupt-capable and currently
    /// in an input mode. Any event latched while the line was disarmed is
    /// cleared first, so a stale edge cannot fire the fresh handler.
    ///
    /// The return value is the capability flag alone: a capable pin in an
    /// output mode returns true without arming anything. Callers wanting a
    /// definitive success signal must also check [`Pin::mode`].
    pub fn attach_interrupt(&self, trigger: Trigger, handler: fn()) -> bool {
        let Some(line) = self.binding.irq_line() else {
            return false;
        };
        if self.mode.get().is_input() {
            self.mcu.clear_pending(line);
            self.mcu.attach(line, trigger, handler);
        }
        true
    }

    /// Disarm this pin's external-interrupt line.
    ///
    /// Returns the capability flag; disarming a line that was never armed
    /// is a no-op.
    pub fn detach_interrupt(&self) -> bool {
        match self.binding.irq_line() {
            Some(line) => {
                self.mcu.detach(line);
                true
            }
            None => false,
        }
    }
}
