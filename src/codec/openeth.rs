//! OpenCores Ethernet MAC descriptor layout.
//!
//! Unlike GRETH, this MAC keeps the payload length in the upper half-word
//! and leaves padding and CRC appending to software control flags in the
//! descriptor. RX and TX share the bit 15 ownership position (EMPTY on
//! the receive side, READY on the transmit side).

use super::{DescriptorCodec, RxFaults};
use crate::internal::constants::MIN_FRAME_SIZE;

/// OpenCores Ethernet descriptor word 0 bit field constants
pub mod bd {
    /// Payload length shift (upper half-word)
    pub const LEN_SHIFT: u32 = 16;
    /// RX: Empty - when set, descriptor owned by the MAC
    pub const RX_EMPTY: u32 = 1 << 15;
    /// TX: Ready - when set, descriptor owned by the MAC
    pub const TX_READY: u32 = 1 << 15;
    /// Interrupt Request - raise interrupt on completion of this slot
    pub const IRQ: u32 = 1 << 14;
    /// Wrap - marks the ring-end slot
    pub const WRAP: u32 = 1 << 13;

    /// TX: Pad short frames to the minimum frame length
    pub const TX_PAD: u32 = 1 << 12;
    /// TX: Append CRC to the frame
    pub const TX_CRC: u32 = 1 << 11;
    /// TX: Underrun - FIFO ran dry mid-frame
    pub const TX_UNDERRUN: u32 = 1 << 8;
    /// TX: Retransmission Limit - too many collisions
    pub const TX_RETRY_LIMIT: u32 = 1 << 3;
    /// TX: Late Collision
    pub const TX_LATE_COLLISION: u32 = 1 << 2;
    /// TX: Carrier Sense Lost
    pub const TX_CARRIER_LOST: u32 = 1 << 0;

    /// RX: Overrun - receiver FIFO overflowed
    pub const RX_OVERRUN: u32 = 1 << 6;
    /// RX: Invalid Symbol received
    pub const RX_INVALID_SYMBOL: u32 = 1 << 5;
    /// RX: Dribble Nibble - frame did not end on a byte boundary
    pub const RX_DRIBBLE: u32 = 1 << 4;
    /// RX: Frame Too Long
    pub const RX_TOO_LONG: u32 = 1 << 3;
    /// RX: Frame Too Short
    pub const RX_TOO_SHORT: u32 = 1 << 2;
    /// RX: CRC Error
    pub const RX_CRC_ERR: u32 = 1 << 1;
    /// RX: Late Collision
    pub const RX_LATE_COLLISION: u32 = 1 << 0;

    /// All TX fault bits
    pub const TX_FAULTS: u32 = TX_UNDERRUN | TX_RETRY_LIMIT | TX_LATE_COLLISION | TX_CARRIER_LOST;
}

/// Codec for the OpenCores Ethernet MAC descriptor format.
pub struct OpenEth;

impl DescriptorCodec for OpenEth {
    const MAX_FRAME_LEN: usize = 0xFFFF;
    const MIN_FRAME_LEN: usize = MIN_FRAME_SIZE;

    #[inline(always)]
    fn hw_owned(word0: u32) -> bool {
        // RX_EMPTY and TX_READY are the same bit
        (word0 & bd::RX_EMPTY) != 0
    }

    #[inline(always)]
    fn frame_len(word0: u32) -> usize {
        (word0 >> bd::LEN_SHIFT) as usize
    }

    #[inline]
    fn rx_faults(word0: u32) -> RxFaults {
        RxFaults {
            crc: (word0 & bd::RX_CRC_ERR) != 0,
            frame: (word0
                & (bd::RX_OVERRUN | bd::RX_INVALID_SYMBOL | bd::RX_DRIBBLE | bd::RX_LATE_COLLISION))
                != 0,
            length: (word0 & (bd::RX_TOO_LONG | bd::RX_TOO_SHORT)) != 0,
        }
    }

    #[inline]
    fn tx_fault(word0: u32) -> bool {
        (word0 & bd::TX_FAULTS) != 0
    }

    #[inline]
    fn arm_rx(wrap: bool, irq: bool) -> u32 {
        let mut word = bd::RX_EMPTY;
        if wrap {
            word |= bd::WRAP;
        }
        if irq {
            word |= bd::IRQ;
        }
        word
    }

    #[inline]
    fn submit_tx(len: usize, wrap: bool, irq: bool) -> u32 {
        let mut word = ((len as u32) << bd::LEN_SHIFT) | bd::TX_READY | bd::TX_CRC;
        if len < Self::MIN_FRAME_LEN {
            word |= bd::TX_PAD;
        }
        if wrap {
            word |= bd::WRAP;
        }
        if irq {
            word |= bd::IRQ;
        }
        word
    }
}

// =============================================================================
// Tests
// =============================================================================
