//! Centralized Constants
//!
//! Single source of truth for frame dimensions, default ring geometry and
//! the polling bounds used by the driver.
//!
//! Descriptor and register bit definitions live with the code that owns
//! them (`codec/*` and `internal/regs.rs`).

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Maximum Ethernet frame size (1500 payload + 14 header + 4 CRC)
pub const MAX_FRAME_SIZE: usize = 1518;

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: usize = 1500;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// CRC/FCS size at end of frame
pub const CRC_SIZE: usize = 4;

/// Minimum Ethernet frame size excluding CRC; shorter frames are padded
pub const MIN_FRAME_SIZE: usize = 60;

/// Default per-slot buffer size (full Ethernet frame, word-rounded)
pub const DEFAULT_BUFFER_SIZE: usize = 1536;

// =============================================================================
// Default Ring Geometry
// =============================================================================

/// Default number of receive descriptors/buffers
pub const DEFAULT_RX_BUFFERS: usize = 8;

/// Default number of transmit descriptors/buffers
pub const DEFAULT_TX_BUFFERS: usize = 8;

// =============================================================================
// Polling Bounds
// =============================================================================

/// Maximum spins waiting for a TX descriptor to leave hardware ownership.
///
/// Slot reuse happens on a bounded link timescale; hitting this bound is
/// reported as a distinct timeout instead of spinning forever.
pub const TX_BUSY_TIMEOUT: u32 = 100_000;

/// Maximum polls waiting for the controller reset bit to deassert
pub const RESET_TIMEOUT: u32 = 1_000;

/// Reset poll interval in microseconds
pub const RESET_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Addressing
// =============================================================================

/// Node/MAC address length in bytes
pub const NODE_ADDR_LEN: usize = 6;

/// Default locally-administered node address
/// Bit 1 of first byte = 1 indicates locally administered
pub const DEFAULT_NODE_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
