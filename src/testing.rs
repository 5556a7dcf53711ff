//! Testing utilities and simulated hardware.
//!
//! Host tests model the DMA engine as a second actor sharing the
//! descriptor memory: it may only touch slots the CPU has released to it
//! (enable bit set), fills buffers and flips ownership back — exactly the
//! contract real hardware honors. [`HardwareModel`] panics the moment it
//! would have to touch a CPU-owned slot, so every test doubles as a check
//! of the ownership invariant.
//!
//! Only available when running `cargo test`.

// Note: the #[cfg(test)] attribute is applied in lib.rs where this module
// is declared.
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::UnsafeCell;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::codec::DescriptorCodec;
use crate::codec::greth::{Greth, bd};
use crate::driver::device::PacketDevice;

// =============================================================================
// Register File
// =============================================================================

/// Plain-memory stand-in for a controller register block.
///
/// The driver performs its volatile accesses against this storage through
/// the base pointer. Write-1-to-clear semantics are not emulated — the
/// file stores whatever was written, so tests assert on the exact mask
/// the driver wrote.
pub struct RegisterFile {
    words: UnsafeCell<[u32; 8]>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            words: UnsafeCell::new([0u32; 8]),
        }
    }

    /// Base pointer handed to the driver as the register block address
    pub fn base_ptr(&self) -> *mut u32 {
        self.words.get().cast()
    }

    /// Read a register word directly (test-side view)
    pub fn get(&self, offset: usize) -> u32 {
        // SAFETY: in-bounds volatile read of our own storage.
        unsafe { core::ptr::read_volatile(self.base_ptr().add(offset / 4)) }
    }

    /// Write a register word directly (simulates hardware raising bits)
    pub fn set(&self, offset: usize, value: u32) {
        // SAFETY: in-bounds volatile write of our own storage.
        unsafe { core::ptr::write_volatile(self.base_ptr().add(offset / 4), value) }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Delay Stub
// =============================================================================

/// DelayNs implementation that returns immediately; host tests have no
/// timing to respect.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// =============================================================================
// Hardware Model
// =============================================================================

/// The DMA-engine side of the descriptor handshake, for GRETH-coded
/// devices.
///
/// Keeps its own fill/drain cursors: real hardware walks the rings in
/// order independently of the driver's cursors. Call [`reset`] whenever
/// the driver reinitializes its rings.
///
/// [`reset`]: HardwareModel::reset
pub struct HardwareModel {
    /// Next RX slot hardware will fill
    rx_fill: usize,
    /// Next TX slot hardware will drain
    tx_drain: usize,
}

impl HardwareModel {
    pub fn new() -> Self {
        Self {
            rx_fill: 0,
            tx_drain: 0,
        }
    }

    /// Forget ring positions after the driver rewrote its rings
    pub fn reset(&mut self) {
        self.rx_fill = 0;
        self.tx_drain = 0;
    }

    /// Complete the next RX slot with a good frame.
    ///
    /// Panics if the slot has not been released to hardware — a driver
    /// that let this happen broke the ownership invariant.
    pub fn rx_frame<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
        payload: &[u8],
    ) {
        assert!(
            self.try_rx_frame(dev, payload),
            "hardware asked to fill a CPU-owned RX slot"
        );
    }

    /// Like [`rx_frame`], but reports instead of panicking when the slot
    /// is still CPU-owned (ring full from hardware's point of view).
    ///
    /// [`rx_frame`]: HardwareModel::rx_frame
    pub fn try_rx_frame<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
        payload: &[u8],
    ) -> bool {
        let slot = self.rx_fill;
        if !Greth::hw_owned(dev.engine().rx_descriptor(slot).status()) {
            return false;
        }
        assert!(payload.len() <= BUF, "test payload exceeds slot buffer");

        dev.engine_mut().rx_buffer_mut(slot)[..payload.len()].copy_from_slice(payload);
        // Completed word: length, ownership back to the CPU, no faults
        dev.engine()
            .rx_descriptor(slot)
            .set_status((payload.len() as u32) & bd::LEN);
        self.rx_fill = (self.rx_fill + 1) % RX;
        true
    }

    /// Complete the next RX slot with fault bits instead of good data.
    pub fn rx_fault<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
        faults: u32,
        len: usize,
    ) {
        let slot = self.rx_fill;
        assert!(
            Greth::hw_owned(dev.engine().rx_descriptor(slot).status()),
            "hardware asked to fill a CPU-owned RX slot"
        );
        dev.engine()
            .rx_descriptor(slot)
            .set_status(faults | (len as u32) & bd::LEN);
        self.rx_fill = (self.rx_fill + 1) % RX;
    }

    /// Drain the next TX slot: take its payload and mark it completed.
    ///
    /// Returns `None` when the slot has not been submitted.
    pub fn tx_take<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
    ) -> Option<Vec<u8>> {
        self.tx_take_with_status(dev, 0)
    }

    /// Drain the next TX slot, leaving `completion` (fault bits) as the
    /// completed status word.
    pub fn tx_take_with_status<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
        completion: u32,
    ) -> Option<Vec<u8>> {
        let slot = self.tx_drain;
        let word = dev.engine().tx_descriptor(slot).status();
        if !Greth::hw_owned(word) {
            return None;
        }

        let len = Greth::frame_len(word).min(BUF);
        let data = dev.engine().tx_buffer(slot)[..len].to_vec();
        dev.engine().tx_descriptor(slot).set_status(completion);
        self.tx_drain = (self.tx_drain + 1) % TX;
        Some(data)
    }

    /// Loop the next submitted TX frame back into the next RX slot.
    ///
    /// Panics if no TX frame is pending.
    pub fn loopback<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dev: &mut PacketDevice<Greth, RX, TX, BUF>,
    ) {
        let data = self
            .tx_take(dev)
            .expect("loopback with no TX frame pending");
        self.rx_frame(dev, &data);
    }
}

impl Default for HardwareModel {
    fn default() -> Self {
        Self::new()
    }
}
