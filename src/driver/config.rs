//! Configuration types for the packet DMA driver

use crate::internal::constants::DEFAULT_NODE_ADDR;

/// Driver state machine.
///
/// Data-path operations are only legal in `Open`. A fatal AHB divergence
/// latches `Faulted`; only `recover()` leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not opened, or closed again; hardware untouched
    #[default]
    Closed,
    /// Open and running
    Open,
    /// Fatal bus error observed; rings must be reinitialized
    Faulted,
}

/// Device configuration, built with `with_*` methods.
///
/// # Example
/// ```ignore
/// let config = DeviceConfig::new(0x8000_0E00)
///     .with_node_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
///     .with_interrupts(true, false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Register block base address, as reported by the bus scan.
    ///
    /// Must point at a mapped, word-aligned controller register block and
    /// stay valid while the device is open.
    pub base_address: usize,
    /// Node identity (MAC address / SpaceWire node address), written to
    /// the identity registers at open
    pub node_address: [u8; 6],
    /// Enable RX completion interrupts (control register + per-slot
    /// descriptor IRQ flag)
    pub rx_interrupt: bool,
    /// Enable TX completion interrupts
    pub tx_interrupt: bool,
    /// Full-duplex link operation
    pub full_duplex: bool,
    /// Internal loopback for self-test
    pub loopback: bool,
    /// Busy-wait for each submitted frame to leave the ring before
    /// `write` returns (at most one frame in flight). Off by default;
    /// completion is otherwise observed lazily by the next `write` on
    /// the same slot.
    pub tx_wait_complete: bool,
}

impl DeviceConfig {
    /// Configuration for the controller at `base_address`, with defaults
    /// for everything else: locally-administered node address, no
    /// interrupts, full duplex, loopback off, asynchronous TX.
    #[must_use]
    pub const fn new(base_address: usize) -> Self {
        Self {
            base_address,
            node_address: DEFAULT_NODE_ADDR,
            rx_interrupt: false,
            tx_interrupt: false,
            full_duplex: true,
            loopback: false,
            tx_wait_complete: false,
        }
    }

    /// Set the node identity
    #[must_use]
    pub const fn with_node_address(mut self, addr: [u8; 6]) -> Self {
        self.node_address = addr;
        self
    }

    /// Enable/disable RX and TX completion interrupts
    #[must_use]
    pub const fn with_interrupts(mut self, rx: bool, tx: bool) -> Self {
        self.rx_interrupt = rx;
        self.tx_interrupt = tx;
        self
    }

    /// Set the duplex mode
    #[must_use]
    pub const fn with_full_duplex(mut self, full: bool) -> Self {
        self.full_duplex = full;
        self
    }

    /// Enable internal loopback (test mode)
    #[must_use]
    pub const fn with_loopback(mut self, enabled: bool) -> Self {
        self.loopback = enabled;
        self
    }

    /// Busy-wait for frame completion inside `write`
    #[must_use]
    pub const fn with_tx_wait_complete(mut self, wait: bool) -> Self {
        self.tx_wait_complete = wait;
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
