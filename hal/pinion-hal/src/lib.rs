//! Pinion Hardware Abstraction Layer
//!
//! This crate defines the platform traits the rest of the workspace is
//! generic over, plus the per-target register descriptor tables. Pin logic
//! never names a concrete register address or touches an interrupt mask
//! directly; it goes through these traits, so the same code runs against a
//! real microcontroller backend or the host-side simulator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pinion-core (pin handles, ADC, shift)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinion-hal (this crate - traits and    │
//! │  target descriptor tables)              │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pinion-hal-   │       │ real MCU      │
//! │ sim (host)    │       │ backend       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::RegisterBus`] - Byte load/store on an opaque register handle
//! - [`irq::Interrupts`] - Global mask save/restore, external-interrupt
//!   attach/detach
//! - [`clock::Clock`] - Millisecond/microsecond time and busy-wait delays
//! - [`Mcu`] - Blanket trait tying the three together
//!
//! Register layouts live in [`target`] as plain data: a [`target::Target`]
//! names every port, pin, timer output, and ADC register the logic layer is
//! allowed to know about. Picking a target is a runtime value, not a
//! compile-time configuration.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod clock;
pub mod irq;
pub mod target;

// Re-export key items at crate root for convenience
pub use bus::{Reg, RegisterBus};
pub use clock::Clock;
pub use irq::{Interrupts, Trigger};
pub use target::Target;

/// Everything the logic layer needs from a platform in one bound.
///
/// Implemented automatically for any type providing the three base traits.
pub trait Mcu: RegisterBus + Interrupts + Clock {}

impl<T: RegisterBus + Interrupts + Clock> Mcu for T {}
