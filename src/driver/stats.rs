//! Per-device accounting counters.
//!
//! Dropped frames are invisible to callers of `read`/`write` except
//! through these counters; the protocol layers above the driver are
//! expected to supply retransmission.

use crate::codec::RxFaults;

/// Statistics counters for one device.
///
/// Counters wrap on overflow rather than saturating or panicking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceStats {
    /// Good frames delivered to the caller
    pub rx_packets: u32,
    /// Frames accepted for transmission
    pub tx_packets: u32,
    /// Received frames dropped for CRC errors
    pub rx_crc_errors: u32,
    /// Received frames dropped for framing faults (alignment, overrun)
    pub rx_frame_errors: u32,
    /// Received frames dropped for length faults (truncated, oversize)
    pub rx_length_errors: u32,
    /// Transmit completions that reported a fault
    pub tx_errors: u32,
    /// Fatal AHB/DMA divergence events observed by the dispatcher
    pub fatal_errors: u32,
}

impl DeviceStats {
    /// Zeroed counters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx_packets: 0,
            tx_packets: 0,
            rx_crc_errors: 0,
            rx_frame_errors: 0,
            rx_length_errors: 0,
            tx_errors: 0,
            fatal_errors: 0,
        }
    }

    /// Total dropped receive frames.
    ///
    /// A frame carrying several fault bits bumps several counters, so
    /// this is an upper bound on distinct dropped frames.
    #[must_use]
    pub fn rx_dropped(&self) -> u32 {
        self.rx_crc_errors
            .wrapping_add(self.rx_frame_errors)
            .wrapping_add(self.rx_length_errors)
    }

    /// Account one faulted receive frame. Each set fault bumps its own
    /// counter, matching per-cause accounting in the hardware manuals.
    pub(crate) fn count_rx_faults(&mut self, faults: RxFaults) {
        if faults.crc {
            self.rx_crc_errors = self.rx_crc_errors.wrapping_add(1);
        }
        if faults.frame {
            self.rx_frame_errors = self.rx_frame_errors.wrapping_add(1);
        }
        if faults.length {
            self.rx_length_errors = self.rx_length_errors.wrapping_add(1);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stats_are_zero() {
        let stats = DeviceStats::new();
        assert_eq!(stats, DeviceStats::default());
        assert_eq!(stats.rx_packets, 0);
        assert_eq!(stats.rx_dropped(), 0);
    }

    #[test]
    fn single_fault_bumps_single_counter() {
        let mut stats = DeviceStats::new();
        stats.count_rx_faults(RxFaults {
            crc: true,
            ..RxFaults::clean()
        });
        assert_eq!(stats.rx_crc_errors, 1);
        assert_eq!(stats.rx_frame_errors, 0);
        assert_eq!(stats.rx_length_errors, 0);
    }

    #[test]
    fn combined_faults_bump_each_counter() {
        let mut stats = DeviceStats::new();
        stats.count_rx_faults(RxFaults {
            crc: true,
            frame: true,
            length: false,
        });
        assert_eq!(stats.rx_crc_errors, 1);
        assert_eq!(stats.rx_frame_errors, 1);
        assert_eq!(stats.rx_length_errors, 0);
        assert_eq!(stats.rx_dropped(), 2);
    }

    #[test]
    fn counters_wrap_instead_of_panicking() {
        let mut stats = DeviceStats {
            rx_crc_errors: u32::MAX,
            ..DeviceStats::new()
        };
        stats.count_rx_faults(RxFaults {
            crc: true,
            ..RxFaults::clean()
        });
        assert_eq!(stats.rx_crc_errors, 0);
    }
}
