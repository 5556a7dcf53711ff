//! DMA engine: RX/TX descriptor rings plus their closed buffer pools.
//!
//! This is the shared core of every GRLIB packet driver: the hardware and
//! the CPU hand descriptor slots back and forth through the enable bit,
//! in strict ring order, with the pools bound to the slots once at
//! initialization and never reallocated.

use core::marker::PhantomData;

use super::descriptor::Descriptor;
use super::ring::DescriptorRing;
use crate::codec::{DescriptorCodec, RxFaults};
use crate::driver::error::{IoError, Result};
use crate::internal::constants::TX_BUSY_TIMEOUT;
use crate::internal::regs::{CONTROL, CTRL_RXEN, CTRL_TXEN, RX_RING_BASE, RegisterBlock, TX_RING_BASE};

/// What one RX engine step produced.
pub(crate) enum RxOutcome<R> {
    /// Current slot still owned by hardware; nothing ready
    Empty,
    /// Faulted frame dropped and slot rearmed; caller counts the faults
    Bad(RxFaults),
    /// Good frame handed to the caller's closure; slot rearmed
    Frame(R),
}

/// DMA engine with statically allocated rings and buffers.
///
/// # Type Parameters
/// * `C` - Descriptor codec of the peripheral family
/// * `RX_BUFS` - Number of receive descriptors/buffers
/// * `TX_BUFS` - Number of transmit descriptors/buffers
/// * `BUF_SIZE` - Size of each buffer in bytes
pub(crate) struct DmaEngine<
    C: DescriptorCodec,
    const RX_BUFS: usize,
    const TX_BUFS: usize,
    const BUF_SIZE: usize,
> {
    /// RX descriptor ring
    rx_ring: DescriptorRing<RX_BUFS>,
    /// TX descriptor ring
    tx_ring: DescriptorRing<TX_BUFS>,
    /// RX payload pool, one fixed slot per descriptor
    rx_buffers: [[u8; BUF_SIZE]; RX_BUFS],
    /// TX payload pool, one fixed slot per descriptor
    tx_buffers: [[u8; BUF_SIZE]; TX_BUFS],
    /// Request a completion interrupt in every armed RX descriptor
    rx_irq: bool,
    /// Request a completion interrupt in every submitted TX descriptor
    tx_irq: bool,
    _codec: PhantomData<C>,
}

impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize>
    DmaEngine<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
    /// Create an engine with zeroed rings and buffers. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx_ring: DescriptorRing::new(),
            tx_ring: DescriptorRing::new(),
            rx_buffers: [[0u8; BUF_SIZE]; RX_BUFS],
            tx_buffers: [[0u8; BUF_SIZE]; TX_BUFS],
            rx_irq: false,
            tx_irq: false,
            _codec: PhantomData,
        }
    }

    /// Total memory footprint of rings plus pools, in bytes.
    #[must_use]
    pub const fn memory_usage() -> usize {
        (RX_BUFS + TX_BUFS) * Descriptor::SIZE + (RX_BUFS + TX_BUFS) * BUF_SIZE
    }

    /// Bind the rings to the controller: record the interrupt policy and
    /// perform the initial ring setup. Must run before any DMA traffic.
    pub fn attach(&mut self, regs: &RegisterBlock, rx_irq: bool, tx_irq: bool) {
        self.rx_irq = rx_irq;
        self.tx_irq = tx_irq;
        self.reset(regs);
    }

    /// Rewrite both rings from scratch: every descriptor re-pointed at
    /// its pool slot, RX slots armed for hardware, TX slots idle, both
    /// cursors at 0, ring base registers rewritten.
    ///
    /// Also the fatal-divergence recovery path; the caller must have
    /// stopped the receiver/transmitter first.
    pub fn reset(&mut self, regs: &RegisterBlock) {
        for i in 0..RX_BUFS {
            let desc = self.rx_ring.get(i);
            desc.set_buffer_addr(self.rx_buffers[i].as_ptr() as u32);
            desc.set_status(C::arm_rx(i == RX_BUFS - 1, self.rx_irq));
        }
        for i in 0..TX_BUFS {
            let desc = self.tx_ring.get(i);
            desc.set_buffer_addr(self.tx_buffers[i].as_ptr() as u32);
            desc.set_status(0);
        }
        self.rx_ring.rewind();
        self.tx_ring.rewind();
        regs.write(TX_RING_BASE, self.tx_ring.base_addr());
        regs.write(RX_RING_BASE, self.rx_ring.base_addr());
    }

    // =========================================================================
    // RX Engine
    // =========================================================================

    /// Whether the current RX slot holds a completed frame.
    #[inline]
    pub fn rx_available(&self) -> bool {
        !C::hw_owned(self.rx_ring.current().status())
    }

    /// Count completed RX slots waiting ahead of the cursor.
    pub fn rx_pending(&self) -> usize {
        let mut count = 0;
        for i in 0..RX_BUFS {
            let idx = (self.rx_ring.cursor() + i) % RX_BUFS;
            if C::hw_owned(self.rx_ring.get(idx).status()) {
                break;
            }
            count += 1;
        }
        count
    }

    /// One step of the RX engine at the cursor slot.
    ///
    /// Reads the slot status fresh (hardware may have completed it since
    /// the last poll) and either reports `Empty`, or consumes the slot:
    /// a good frame is passed to `f` borrowed straight from the pool, a
    /// faulted frame is dropped. Either way the consumed slot is rearmed,
    /// the receiver re-enabled and the cursor advanced, preserving strict
    /// ring order.
    pub fn rx_pop<R>(&mut self, regs: &RegisterBlock, f: impl FnOnce(&[u8]) -> R) -> RxOutcome<R> {
        let word = self.rx_ring.current().status();
        if C::hw_owned(word) {
            return RxOutcome::Empty;
        }

        let faults = C::rx_faults(word);
        let outcome = if faults.any() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "rx frame fault: word0={=u32:x} crc={} frame={} length={}",
                word,
                faults.crc,
                faults.frame,
                faults.length
            );
            RxOutcome::Bad(faults)
        } else {
            // Clamp against a corrupt length field; never read past the slot.
            let len = C::frame_len(word).min(BUF_SIZE);
            let slot = self.rx_ring.cursor();
            RxOutcome::Frame(f(&self.rx_buffers[slot][..len]))
        };

        // Rearm and hand the slot back. The receiver stops on buffer
        // exhaustion, so it is re-enabled on every rearm.
        let armed = C::arm_rx(self.rx_ring.at_wrap_slot(), self.rx_irq);
        self.rx_ring.current().set_status(armed);
        regs.set_bits(CONTROL, CTRL_RXEN);
        self.rx_ring.advance();

        outcome
    }

    // =========================================================================
    // TX Engine
    // =========================================================================

    /// Whether the current TX slot is free for a new frame.
    #[inline]
    pub fn tx_slot_free(&self) -> bool {
        !C::hw_owned(self.tx_ring.current().status())
    }

    /// Submit one frame at the cursor slot.
    ///
    /// Waits (bounded) for the slot to leave hardware ownership, copies
    /// the payload into the slot's pool buffer and publishes the
    /// length+go word in a single descriptor write — the point at which
    /// hardware may start transmitting. Returns whether the slot's
    /// previous transmission had reported a fault.
    ///
    /// The caller has already validated the frame length against both
    /// `BUF_SIZE` and the codec's length field.
    pub fn tx_submit(
        &mut self,
        regs: &RegisterBlock,
        frame: &[u8],
        wait_complete: bool,
    ) -> Result<bool> {
        self.tx_wait_cpu_owned()?;

        let prev_fault = C::tx_fault(self.tx_ring.current().status());

        let slot = self.tx_ring.cursor();
        self.tx_buffers[slot][..frame.len()].copy_from_slice(frame);

        // Single status write hands the slot to hardware; the payload and
        // the buffer address are already settled.
        let word = C::submit_tx(frame.len(), self.tx_ring.at_wrap_slot(), self.tx_irq);
        self.tx_ring.current().set_status(word);

        // The transmitter idles once its ring runs dry; poke it.
        regs.set_bits(CONTROL, CTRL_TXEN);

        if wait_complete {
            self.tx_wait_cpu_owned()?;
        }

        self.tx_ring.advance();
        Ok(prev_fault)
    }

    /// Bounded busy-wait until the cursor slot is CPU-owned.
    fn tx_wait_cpu_owned(&self) -> Result<()> {
        for _ in 0..TX_BUSY_TIMEOUT {
            if !C::hw_owned(self.tx_ring.current().status()) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(IoError::Timeout.into())
    }

    // =========================================================================
    // Test Access
    // =========================================================================

    #[cfg(test)]
    pub fn rx_cursor(&self) -> usize {
        self.rx_ring.cursor()
    }

    #[cfg(test)]
    pub fn tx_cursor(&self) -> usize {
        self.tx_ring.cursor()
    }

    #[cfg(test)]
    pub fn rx_descriptor(&self, index: usize) -> &Descriptor {
        self.rx_ring.get(index)
    }

    #[cfg(test)]
    pub fn tx_descriptor(&self, index: usize) -> &Descriptor {
        self.tx_ring.get(index)
    }

    #[cfg(test)]
    pub fn rx_buffer_mut(&mut self, index: usize) -> &mut [u8; BUF_SIZE] {
        &mut self.rx_buffers[index % RX_BUFS]
    }

    #[cfg(test)]
    pub fn tx_buffer(&self, index: usize) -> &[u8; BUF_SIZE] {
        &self.tx_buffers[index % TX_BUFS]
    }
}

impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize> Default
    for DmaEngine<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
