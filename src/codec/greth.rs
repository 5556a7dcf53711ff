//! GRETH 10/100 Ethernet MAC descriptor layout.

use super::{DescriptorCodec, RxFaults};
use crate::internal::constants::MIN_FRAME_SIZE;

/// GRETH descriptor word 0 bit field constants
pub mod bd {
    /// Payload length mask (11 bits)
    pub const LEN: u32 = 0x7FF;
    /// Enable - when set, descriptor owned by the DMA engine
    pub const EN: u32 = 1 << 11;
    /// Wrap - marks the ring-end slot
    pub const WR: u32 = 1 << 12;
    /// Interrupt Enable - request interrupt on completion of this slot
    pub const IE: u32 = 1 << 13;

    /// RX: Alignment Error - frame did not end on a byte boundary
    pub const RX_ALIGN_ERR: u32 = 1 << 14;
    /// RX: Frame Too Long - frame exceeded the maximum length
    pub const RX_TOO_LONG: u32 = 1 << 15;
    /// RX: CRC Error
    pub const RX_CRC_ERR: u32 = 1 << 16;
    /// RX: Overrun - receiver FIFO overflowed during reception
    pub const RX_OVERRUN: u32 = 1 << 17;

    /// TX: Underrun Error - transmitter FIFO ran dry mid-frame
    pub const TX_UNDERRUN: u32 = 1 << 14;
    /// TX: Attempt Limit Error - too many collisions
    pub const TX_ATTEMPT_LIMIT: u32 = 1 << 15;

    /// All RX fault bits
    pub const RX_FAULTS: u32 = RX_ALIGN_ERR | RX_TOO_LONG | RX_CRC_ERR | RX_OVERRUN;
    /// All TX fault bits
    pub const TX_FAULTS: u32 = TX_UNDERRUN | TX_ATTEMPT_LIMIT;
}

/// Codec for the GRETH Ethernet MAC descriptor format.
///
/// The MAC pads short frames and appends the CRC itself, so `submit_tx`
/// carries no pad/CRC control flags.
pub struct Greth;

impl DescriptorCodec for Greth {
    const MAX_FRAME_LEN: usize = bd::LEN as usize;
    const MIN_FRAME_LEN: usize = MIN_FRAME_SIZE;

    #[inline(always)]
    fn hw_owned(word0: u32) -> bool {
        (word0 & bd::EN) != 0
    }

    #[inline(always)]
    fn frame_len(word0: u32) -> usize {
        (word0 & bd::LEN) as usize
    }

    #[inline]
    fn rx_faults(word0: u32) -> RxFaults {
        RxFaults {
            crc: (word0 & bd::RX_CRC_ERR) != 0,
            frame: (word0 & (bd::RX_ALIGN_ERR | bd::RX_OVERRUN)) != 0,
            length: (word0 & bd::RX_TOO_LONG) != 0,
        }
    }

    #[inline]
    fn tx_fault(word0: u32) -> bool {
        (word0 & bd::TX_FAULTS) != 0
    }

    #[inline]
    fn arm_rx(wrap: bool, irq: bool) -> u32 {
        let mut word = bd::EN;
        if wrap {
            word |= bd::WR;
        }
        if irq {
            word |= bd::IE;
        }
        word
    }

    #[inline]
    fn submit_tx(len: usize, wrap: bool, irq: bool) -> u32 {
        let mut word = (len as u32) & bd::LEN | bd::EN;
        if wrap {
            word |= bd::WR;
        }
        if irq {
            word |= bd::IE;
        }
        word
    }
}

// =============================================================================
// Tests
// =============================================================================
