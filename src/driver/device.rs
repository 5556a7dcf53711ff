//! Packet device handle: the driver call surface.
//!
//! One [`PacketDevice`] owns everything belonging to one physical
//! controller: both descriptor rings with their buffer pools, the
//! register block handle and the statistics. The handle is created
//! `const` (suitable for a static), bound to hardware by `open()` and
//! threaded explicitly through every call — there is no implicit
//! current-device global.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use super::config::{DeviceConfig, State};
use super::error::{ConfigError, DmaError, IoError, Result};
use super::interrupt::InterruptStatus;
use super::stats::DeviceStats;
use crate::codec::DescriptorCodec;
use crate::internal::constants::{RESET_POLL_INTERVAL_US, RESET_TIMEOUT};
use crate::internal::dma::{DmaEngine, RxOutcome};
use crate::internal::regs::{
    CONTROL, CTRL_FULL_DUPLEX, CTRL_LOOPBACK, CTRL_RESET, CTRL_RXEN, CTRL_RXIRQ_EN, CTRL_TXEN,
    CTRL_TXIRQ_EN, NODE_ADDR_LSB, NODE_ADDR_MSB, RegisterBlock, STATUS, STATUS_ALL,
};

/// Driver handle for one GRLIB packet controller.
///
/// # Type Parameters
/// * `C` - Descriptor codec of the peripheral family
/// * `RX_BUFS` - Number of receive descriptors/buffers
/// * `TX_BUFS` - Number of transmit descriptors/buffers
/// * `BUF_SIZE` - Size of each buffer in bytes
///
/// # Example
/// ```ignore
/// static mut ETH: GrethDevice<8, 8, 1536> = GrethDevice::new();
///
/// let eth = unsafe { &mut ETH };
/// eth.open(DeviceConfig::new(greth_base), &mut delay)?;
/// eth.write(&frame)?;
/// let n = eth.read(&mut buf)?;
/// ```
pub struct PacketDevice<
    C: DescriptorCodec,
    const RX_BUFS: usize,
    const TX_BUFS: usize,
    const BUF_SIZE: usize,
> {
    /// Rings and buffer pools
    dma: DmaEngine<C, RX_BUFS, TX_BUFS, BUF_SIZE>,
    /// Register block of the controller, unmapped until open
    regs: RegisterBlock,
    /// Configuration recorded at open
    config: DeviceConfig,
    /// Driver state machine
    state: State,
    /// Open flag; test-and-set makes double-open fail atomically
    opened: AtomicBool,
    /// Accounting counters
    stats: DeviceStats,
}

impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize>
    PacketDevice<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
    /// Create a closed device handle. Const, suitable for statics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dma: DmaEngine::new(),
            regs: RegisterBlock::unmapped(),
            config: DeviceConfig::new(0),
            state: State::Closed,
            opened: AtomicBool::new(false),
            stats: DeviceStats::new(),
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Current driver state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Statistics snapshot
    #[inline(always)]
    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    /// Node identity recorded at open
    #[inline(always)]
    pub fn node_address(&self) -> &[u8; 6] {
        &self.config.node_address
    }

    /// Total memory footprint of the rings and pools, in bytes
    #[must_use]
    pub const fn memory_usage() -> usize {
        DmaEngine::<C, RX_BUFS, TX_BUFS, BUF_SIZE>::memory_usage()
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Open the controller described by `config`.
    ///
    /// Sequence: atomic open-flag test-and-set, controller soft reset,
    /// ring/pool binding, node identity programming, status clear, then
    /// receiver/transmitter enable. After a successful open the device
    /// is receiving.
    ///
    /// # Errors
    /// - `AlreadyOpen` - the open flag was already set
    /// - `ResetFailed` - the reset bit did not deassert in time
    pub fn open<D: DelayNs>(&mut self, config: DeviceConfig, delay: &mut D) -> Result<()> {
        if self.opened.swap(true, Ordering::AcqRel) {
            return Err(ConfigError::AlreadyOpen.into());
        }

        let regs = RegisterBlock::new(config.base_address as *mut u32);

        if let Err(e) = Self::reset_controller(&regs, delay) {
            self.opened.store(false, Ordering::Release);
            return Err(e);
        }

        // Bind rings and pools, program ring base registers
        self.dma
            .attach(&regs, config.rx_interrupt, config.tx_interrupt);

        // Node identity
        let a = &config.node_address;
        regs.write(NODE_ADDR_MSB, (u32::from(a[0]) << 8) | u32::from(a[1]));
        regs.write(
            NODE_ADDR_LSB,
            u32::from_be_bytes([a[2], a[3], a[4], a[5]]),
        );

        // Clear anything pending from before the reset
        regs.write(STATUS, STATUS_ALL);

        // Enable the data path last
        let mut ctrl = CTRL_RXEN | CTRL_TXEN;
        if config.rx_interrupt {
            ctrl |= CTRL_RXIRQ_EN;
        }
        if config.tx_interrupt {
            ctrl |= CTRL_TXIRQ_EN;
        }
        if config.full_duplex {
            ctrl |= CTRL_FULL_DUPLEX;
        }
        if config.loopback {
            ctrl |= CTRL_LOOPBACK;
        }
        regs.write(CONTROL, ctrl);

        self.regs = regs;
        self.config = config;
        self.stats = DeviceStats::new();
        self.state = State::Open;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "packet device open at {=usize:x}, {=usize}+{=usize} slots of {=usize} bytes",
            config.base_address,
            RX_BUFS,
            TX_BUFS,
            BUF_SIZE
        );

        Ok(())
    }

    /// Soft reset: set the reset bit, release it, then poll for the
    /// controller to acknowledge by reading it back clear.
    fn reset_controller<D: DelayNs>(regs: &RegisterBlock, delay: &mut D) -> Result<()> {
        regs.write(CONTROL, CTRL_RESET);
        regs.write(CONTROL, 0);
        for _ in 0..RESET_TIMEOUT {
            if regs.read(CONTROL) & CTRL_RESET == 0 {
                return Ok(());
            }
            delay.delay_us(RESET_POLL_INTERVAL_US);
        }
        Err(ConfigError::ResetFailed.into())
    }

    /// Close the device.
    ///
    /// Stops the receiver and transmitter before the handle (and with it
    /// the buffer memory) can be reused, then releases the open flag.
    ///
    /// # Errors
    /// - `InvalidState` - the device is not open
    pub fn close(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Err(IoError::InvalidState.into());
        }

        self.regs
            .clear_bits(CONTROL, CTRL_RXEN | CTRL_TXEN | CTRL_RXIRQ_EN | CTRL_TXIRQ_EN);

        self.state = State::Closed;
        self.opened.store(false, Ordering::Release);
        Ok(())
    }

    // =========================================================================
    // RX / TX
    // =========================================================================

    /// Receive one frame into `buf`.
    ///
    /// Returns the frame length, or `Ok(0)` when no completed frame is
    /// waiting. Frames longer than `buf` are truncated to fit. Faulted
    /// frames are counted, dropped and skipped without surfacing — the
    /// caller only ever sees good payload bytes.
    ///
    /// # Errors
    /// - `InvalidState` - device not open, or faulted pending recovery
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.state != State::Open {
            return Err(IoError::InvalidState.into());
        }

        loop {
            let outcome = self.dma.rx_pop(&self.regs, |payload| {
                let n = payload.len().min(buf.len());
                buf[..n].copy_from_slice(&payload[..n]);
                n
            });
            match outcome {
                RxOutcome::Empty => return Ok(0),
                RxOutcome::Bad(faults) => self.stats.count_rx_faults(faults),
                RxOutcome::Frame(n) => {
                    self.stats.rx_packets = self.stats.rx_packets.wrapping_add(1);
                    return Ok(n);
                }
            }
        }
    }

    /// Whether a completed frame is waiting for `read`
    #[inline(always)]
    pub fn rx_available(&self) -> bool {
        self.dma.rx_available()
    }

    /// Count of completed frames waiting ahead of the RX cursor
    pub fn rx_pending(&self) -> usize {
        self.dma.rx_pending()
    }

    /// Submit one frame for transmission.
    ///
    /// Oversized and empty frames are rejected before any hardware
    /// interaction, leaving rings, cursors and counters untouched. An
    /// accepted frame is copied into the slot buffer and handed to the
    /// transmitter; completion is observed lazily unless
    /// `tx_wait_complete` was configured.
    ///
    /// # Errors
    /// - `InvalidState` - device not open, or faulted pending recovery
    /// - `InvalidLength` - empty frame
    /// - `FrameTooLarge` - frame exceeds the slot buffer or length field
    /// - `Timeout` - the slot (or, in waiting mode, the completion)
    ///   busy-wait expired
    pub fn write(&mut self, frame: &[u8]) -> Result<()> {
        if self.state != State::Open {
            return Err(IoError::InvalidState.into());
        }
        if frame.is_empty() {
            return Err(DmaError::InvalidLength.into());
        }
        if frame.len() > BUF_SIZE || frame.len() > C::MAX_FRAME_LEN {
            return Err(DmaError::FrameTooLarge.into());
        }

        let prev_fault = self
            .dma
            .tx_submit(&self.regs, frame, self.config.tx_wait_complete)?;
        if prev_fault {
            self.stats.tx_errors = self.stats.tx_errors.wrapping_add(1);
        }
        self.stats.tx_packets = self.stats.tx_packets.wrapping_add(1);
        Ok(())
    }

    /// Whether the current TX slot can take a frame without waiting
    #[inline(always)]
    pub fn tx_ready(&self) -> bool {
        self.dma.tx_slot_free()
    }

    // =========================================================================
    // Dispatcher
    // =========================================================================

    /// Service the device after an interrupt or poll tick.
    ///
    /// Reads the status register once. A fatal AHB error latches the
    /// `Faulted` state and is returned as `FatalBusError` — nothing is
    /// drained and no status is cleared; the caller must `recover()`.
    /// Otherwise receive work is drained to `deliver` until the RX
    /// engine reports no frame ready (one interrupt may cover several
    /// completed descriptors), transmit completions need no action, and
    /// exactly the observed status bits are written back.
    ///
    /// # Errors
    /// - `InvalidState` - device not open, or faulted pending recovery
    /// - `FatalBusError` - AHB divergence observed; recover the device
    pub fn service<F: FnMut(&[u8])>(&mut self, mut deliver: F) -> Result<InterruptStatus> {
        if self.state != State::Open {
            return Err(IoError::InvalidState.into());
        }

        let status = InterruptStatus::from_raw(self.regs.read(STATUS));

        if status.is_fatal() {
            self.stats.fatal_errors = self.stats.fatal_errors.wrapping_add(1);
            self.state = State::Faulted;
            #[cfg(feature = "defmt")]
            defmt::warn!("fatal AHB error, ring state diverged; recovery required");
            return Err(DmaError::FatalBusError.into());
        }

        if status.rx_complete || status.rx_error {
            loop {
                match self.dma.rx_pop(&self.regs, &mut deliver) {
                    RxOutcome::Empty => break,
                    RxOutcome::Bad(faults) => self.stats.count_rx_faults(faults),
                    RxOutcome::Frame(()) => {
                        self.stats.rx_packets = self.stats.rx_packets.wrapping_add(1);
                    }
                }
            }
        }

        // TX completion is observed lazily by the next write's slot wait.
        // Acknowledge only what this read actually saw, so an event that
        // raced in after the read keeps its status bit.
        if status.any() {
            self.regs.write(STATUS, status.to_raw());
        }

        Ok(status)
    }

    /// Reinitialize after a fatal divergence.
    ///
    /// Stop both directions, rewrite every descriptor and both cursors,
    /// rewrite the ring base registers, clear all status and re-enable.
    /// Nothing is drained: once the driver's view and the hardware's view
    /// of ring ownership disagree, the ring contents are garbage.
    ///
    /// # Errors
    /// - `InvalidState` - the device is not open
    pub fn recover(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Err(IoError::InvalidState.into());
        }

        self.regs.clear_bits(CONTROL, CTRL_RXEN | CTRL_TXEN);
        self.dma.reset(&self.regs);
        self.regs.write(STATUS, STATUS_ALL);
        self.regs.set_bits(CONTROL, CTRL_RXEN | CTRL_TXEN);

        self.state = State::Open;
        Ok(())
    }

    // =========================================================================
    // Link Configuration
    // =========================================================================

    /// Enable or disable internal loopback
    pub fn set_loopback(&mut self, enabled: bool) {
        self.config.loopback = enabled;
        if self.state != State::Closed {
            if enabled {
                self.regs.set_bits(CONTROL, CTRL_LOOPBACK);
            } else {
                self.regs.clear_bits(CONTROL, CTRL_LOOPBACK);
            }
        }
    }

    /// Reprogram the node identity registers
    pub fn set_node_address(&mut self, addr: &[u8; 6]) {
        self.config.node_address = *addr;
        if self.state != State::Closed {
            self.regs
                .write(NODE_ADDR_MSB, (u32::from(addr[0]) << 8) | u32::from(addr[1]));
            self.regs.write(
                NODE_ADDR_LSB,
                u32::from_be_bytes([addr[2], addr[3], addr[4], addr[5]]),
            );
        }
    }

    // =========================================================================
    // Test Access
    // =========================================================================

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &DmaEngine<C, RX_BUFS, TX_BUFS, BUF_SIZE> {
        &self.dma
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut DmaEngine<C, RX_BUFS, TX_BUFS, BUF_SIZE> {
        &mut self.dma
    }
}

impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize> Default
    for PacketDevice<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
    fn default() -> Self {
        Self::new()
    }
}

// Safety: the handle owns its rings and register pointer; cross-context
// access must be serialized externally (see sync::SharedDevice), and the
// descriptor memory itself is synchronized with the hardware through the
// volatile ownership-bit protocol.
unsafe impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize>
    Sync for PacketDevice<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
}

unsafe impl<C: DescriptorCodec, const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize>
    Send for PacketDevice<C, RX_BUFS, TX_BUFS, BUF_SIZE>
{
}

// =============================================================================
// Type Aliases
// =============================================================================

/// GRETH Ethernet device
pub type GrethDevice<const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize> =
    PacketDevice<crate::codec::Greth, RX_BUFS, TX_BUFS, BUF_SIZE>;

/// OpenCores Ethernet device
pub type OpenEthDevice<const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize> =
    PacketDevice<crate::codec::OpenEth, RX_BUFS, TX_BUFS, BUF_SIZE>;

/// GRSPW SpaceWire device
pub type GrspwDevice<const RX_BUFS: usize, const TX_BUFS: usize, const BUF_SIZE: usize> =
    PacketDevice<crate::codec::Grspw, RX_BUFS, TX_BUFS, BUF_SIZE>;

/// Default GRETH geometry: 8 slots each way, full Ethernet frames
pub type GrethDeviceDefault = GrethDevice<8, 8, 1536>;

/// Small GRETH geometry for memory-constrained systems
pub type GrethDeviceSmall = GrethDevice<2, 2, 1536>;

// =============================================================================
// Tests
// =============================================================================
