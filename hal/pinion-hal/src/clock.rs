//! Time source abstraction
//!
//! Wall-clock counters and busy-wait delays. There is no yield point in
//! this layer; `delay_*` spins (or, on the simulator, advances virtual
//! time).

/// Monotonic time and busy-wait delays.
pub trait Clock {
    /// Milliseconds since boot. Wraps on overflow.
    fn millis(&self) -> u32;

    /// Microseconds since boot. Wraps on overflow.
    fn micros(&self) -> u32;

    /// Busy-wait for `us` microseconds.
    fn delay_us(&self, us: u32);

    /// Busy-wait for `ms` milliseconds.
    fn delay_ms(&self, ms: u32) {
        self.delay_us(ms.saturating_mul(1_000));
    }
}
