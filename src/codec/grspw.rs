//! GRSPW SpaceWire DMA channel descriptor layout.
//!
//! SpaceWire packets have no minimum length and no link-level CRC append;
//! the 25-bit length field dwarfs the Ethernet ones. The engine models
//! data-segment descriptors only — the separate header descriptor of the
//! native TX format is a codec-family extension, not an engine concern —
//! so both directions use the control-word layout of the data descriptor.

use super::{DescriptorCodec, RxFaults};

/// GRSPW descriptor word 0 bit field constants
pub mod bd {
    /// Packet length mask (25 bits)
    pub const LEN: u32 = 0x01FF_FFFF;
    /// Enable - when set, descriptor owned by the DMA engine
    pub const EN: u32 = 1 << 25;
    /// Wrap - marks the ring-end slot
    pub const WR: u32 = 1 << 26;
    /// Interrupt Enable - request interrupt on completion of this slot
    pub const IE: u32 = 1 << 27;

    /// RX: packet terminated by an error end-of-packet marker
    pub const RX_EEP: u32 = 1 << 28;
    /// RX: header CRC error
    pub const RX_HEADER_CRC: u32 = 1 << 29;
    /// RX: data CRC error
    pub const RX_DATA_CRC: u32 = 1 << 30;
    /// RX: packet truncated (exceeded the maximum receive length)
    pub const RX_TRUNCATED: u32 = 1 << 31;

    /// TX: link error while sending this packet
    pub const TX_LINK_ERR: u32 = 1 << 28;
}

/// Codec for the GRSPW SpaceWire data-descriptor format.
pub struct Grspw;

impl DescriptorCodec for Grspw {
    const MAX_FRAME_LEN: usize = bd::LEN as usize;
    // SpaceWire has no minimum packet length
    const MIN_FRAME_LEN: usize = 0;

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
            crc: (word0 & (bd::RX_HEADER_CRC | bd::RX_DATA_CRC)) != 0,
            frame: (word0 & bd::RX_EEP) != 0,
            length: (word0 & bd::RX_TRUNCATED) != 0,
        }
    }

    #[inline]
    fn tx_fault(word0: u32) -> bool {
        (word0 & bd::TX_LINK_ERR) != 0
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
