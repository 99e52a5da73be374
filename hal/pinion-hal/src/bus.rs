//! Register access abstraction
//!
//! A [`Reg`] is an opaque handle - an index into the target's register
//! space - rather than a raw address. Backends decide what the index means:
//! the simulator maps it into a plain byte array, a real backend maps it to
//! the chip's I/O space.

/// Opaque handle to one 8-bit register.
///
/// Produced by [`crate::target`] descriptor tables; carried inside cached
/// pin bindings. The numeric value is only meaningful to the backend that
/// owns the register space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reg(u16);

impl Reg {
    /// Create a handle from a backend-defined index.
    pub const fn new(index: u16) -> Self {
        Reg(index)
    }

    /// The backend-defined index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte-wide register load/store.
///
/// Methods take `&self`: registers are chip-global hardware, and every pin
/// handle holds a shared view of the same bus. Implementations use interior
/// mutability (or volatile access on real hardware).
pub trait RegisterBus {
    /// Read the current register value.
    fn load(&self, reg: Reg) -> u8;

    /// Write a register value.
    fn store(&self, reg: Reg, value: u8);

    /// Set the bits in `mask`, leaving the rest untouched.
    fn set_bits(&self, reg: Reg, mask: u8) {
        self.store(reg, self.load(reg) | mask);
    }

    /// Clear the bits in `mask`, leaving the rest untouched.
    fn clear_bits(&self, reg: Reg, mask: u8) {
        self.store(reg, self.load(reg) & !mask);
    }

    /// Flip the bits in `mask`, leaving the rest untouched.
    fn toggle_bits(&self, reg: Reg, mask: u8) {
        self.store(reg, self.load(reg) ^ mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct OneReg(Cell<u8>);

    impl RegisterBus for OneReg {
        fn load(&self, _reg: Reg) -> u8 {
            self.0.get()
        }

        fn store(&self, _reg: Reg, value: u8) {
            self.0.set(value);
        }
    }

    #[test]
    fn test_provided_bit_ops() {
        let bus = OneReg(Cell::new(0b1010_0000));
        let r = Reg::new(0);

        bus.set_bits(r, 0b0000_0101);
        assert_eq!(bus.load(r), 0b1010_0101);

        bus.clear_bits(r, 0b1000_0001);
        assert_eq!(bus.load(r), 0b0010_0100);

        bus.toggle_bits(r, 0b0110_0000);
        assert_eq!(bus.load(r), 0b0100_0100);
    }
}
