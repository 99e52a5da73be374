//! Interrupt control abstraction
//!
//! Two concerns live here: the global interrupt mask (save/restore around
//! register pairs that must update atomically) and the external-interrupt
//! lines that pins can route a handler onto.

/// Condition that fires an external-interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Level-triggered: fires while the line is held low.
    Low,
    /// Fires on every edge, either direction.
    Change,
    /// Fires on a high-to-low edge.
    Falling,
    /// Fires on a low-to-high edge.
    Rising,
}

/// Global interrupt mask plus external-interrupt line management.
///
/// Handlers are plain `fn()` - interrupt service routines capture nothing.
/// Line numbers index the target's external-interrupt lines; callers get
/// them from the pin descriptor tables, never invent them.
pub trait Interrupts {
    /// Save the current global-interrupt state and mask interrupts.
    ///
    /// Returns an opaque token for [`irq_restore`](Self::irq_restore).
    fn irq_save(&self) -> u8;

    /// Restore exactly the state captured by [`irq_save`](Self::irq_save).
    ///
    /// Never unconditionally re-enables: if interrupts were already masked
    /// at save time they stay masked.
    fn irq_restore(&self, saved: u8);

    /// Run `f` with interrupts masked, restoring the previous state after.
    fn masked<R>(&self, f: impl FnOnce() -> R) -> R {
        let saved = self.irq_save();
        let result = f();
        self.irq_restore(saved);
        result
    }

    /// Arm `line` to call `handler` on `trigger`.
    ///
    /// Replaces any previously attached handler on the same line.
    fn attach(&self, line: u8, trigger: Trigger, handler: fn());

    /// Disarm `line`. Harmless if nothing is attached.
    fn detach(&self, line: u8);

    /// Drop a latched pending event on `line` without running its handler.
    ///
    /// Lines latch qualifying edges even while detached; clearing before
    /// an attach prevents a stale edge from firing immediately.
    fn clear_pending(&self, line: u8);
}
