//! ISR-safe access to a shared device.
//!
//! The register-level drivers on SMP-capable GRLIB parts take a spinlock
//! with interrupts disabled around every read-modify-write of shared
//! control/status registers. [`SharedDevice`] is that policy expressed
//! through the `critical-section` crate: all access to the wrapped
//! [`PacketDevice`](crate::PacketDevice) runs inside a critical section.

pub mod primitives;
pub mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedDevice;
