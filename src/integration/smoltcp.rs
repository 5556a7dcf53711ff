//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! Implements the `smoltcp::phy::Device` trait for Ethernet-framed
//! packet devices ([`EthernetCodec`] families), allowing them to back a
//! smoltcp interface.
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface};
//! use smoltcp::wire::EthernetAddress;
//! use grlib_pktdma::{DeviceConfig, GrethDevice};
//!
//! static mut ETH: GrethDevice<8, 8, 1536> = GrethDevice::new();
//! let eth = unsafe { &mut ETH };
//! eth.open(DeviceConfig::new(base), &mut delay).unwrap();
//!
//! let config = Config::new(EthernetAddress(*eth.node_address()).into());
//! let mut iface = Interface::new(config, eth, smoltcp::time::Instant::ZERO);
//! ```
//!
//! # Safety Notes
//!
//! The smoltcp `Device` trait requires `receive()` to return an `RxToken`
//! and a `TxToken` simultaneously. This implementation uses raw pointers
//! internally to satisfy that API. This is safe because:
//!
//! 1. **Temporal safety**: tokens are consumed immediately in the same
//!    call stack before any other access to the device occurs.
//! 2. **Spatial safety**: RX and TX use completely separate descriptor
//!    rings and buffer pools.
//! 3. **No aliasing during access**: only one token is consumed at a
//!    time, and `consume()` takes `self` by value.

use crate::codec::EthernetCodec;
use crate::driver::config::State;
use crate::driver::device::PacketDevice;
use crate::internal::constants::MTU;

use smoltcp::phy::{ChecksumCapabilities, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

// =============================================================================
// RX Token
// =============================================================================

/// Receive token for smoltcp.
///
/// Represents one received frame ready to be consumed. Implementation
/// detail of the integration; most users won't need to name it.
pub struct PktRxToken<'a, C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize> {
    device: *mut PacketDevice<C, RX, TX, BUF>,
    _marker: core::marker::PhantomData<&'a mut PacketDevice<C, RX, TX, BUF>>,
}

impl<'a, C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize>
    smoltcp::phy::RxToken for PktRxToken<'a, C, RX, TX, BUF>
{
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        // Stack buffer sized to the ring slot; no heap involved
        let mut buffer = [0u8; BUF];

        // SAFETY: the pointer is valid for 'a; the token is consumed by
        // value, so no aliasing, and RX/TX rings are separate.
        let device = unsafe { &mut *self.device };

        let len = device.read(&mut buffer).unwrap_or_default();
        f(&buffer[..len])
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token for smoltcp.
///
/// Represents the ability to transmit one frame. Implementation detail
/// of the integration; most users won't need to name it.
pub struct PktTxToken<'a, C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize> {
    device: *mut PacketDevice<C, RX, TX, BUF>,
    _marker: core::marker::PhantomData<&'a mut PacketDevice<C, RX, TX, BUF>>,
}

impl<'a, C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize>
    smoltcp::phy::TxToken for PktTxToken<'a, C, RX, TX, BUF>
{
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let len = len.min(BUF);
        let mut buffer = [0u8; BUF];

        // Let smoltcp fill in the frame data
        let result = f(&mut buffer[..len]);

        // SAFETY: the pointer is valid for 'a; the token is consumed by
        // value, so no aliasing, and TX/RX rings are separate.
        let device = unsafe { &mut *self.device };

        // Transmission errors are invisible to smoltcp; it retransmits
        let _ = device.write(&buffer[..len]);

        result
    }
}

// =============================================================================
// Device Implementation
// =============================================================================

impl<C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize> Device
    for PacketDevice<C, RX, TX, BUF>
{
    type RxToken<'a>
        = PktRxToken<'a, C, RX, TX, BUF>
    where
        Self: 'a;
    type TxToken<'a>
        = PktTxToken<'a, C, RX, TX, BUF>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if self.state() != State::Open || !self.rx_available() {
            return None;
        }

        // smoltcp requires both tokens together.
        //
        // SAFETY: both tokens are built from the same device pointer but
        // consumed immediately, one at a time, against disjoint rings.
        // The PhantomData<&'a mut ..> keeps the borrow alive.
        let self_ptr = self as *mut Self;
        Some((
            PktRxToken {
                device: self_ptr,
                _marker: core::marker::PhantomData,
            },
            PktTxToken {
                device: self_ptr,
                _marker: core::marker::PhantomData,
            },
        ))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if self.state() != State::Open || !self.tx_ready() {
            return None;
        }

        // SAFETY: single token, no aliasing; the raw pointer is
        // immediately converted back to a reference in consume().
        Some(PktTxToken {
            device: self as *mut Self,
            _marker: core::marker::PhantomData,
        })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();

        caps.medium = Medium::Ethernet;
        // The MTU cannot exceed what one ring slot can carry
        caps.max_transmission_unit = MTU.min(BUF);
        // One frame per slot; no scatter-gather
        caps.max_burst_size = Some(1);
        // No hardware checksum offload on these controllers; smoltcp
        // computes everything in software
        caps.checksum = ChecksumCapabilities::default();

        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the device's node identity as a smoltcp `EthernetAddress`.
pub fn ethernet_address<C: EthernetCodec, const RX: usize, const TX: usize, const BUF: usize>(
    device: &PacketDevice<C, RX, TX, BUF>,
) -> smoltcp::wire::EthernetAddress {
    smoltcp::wire::EthernetAddress(*device.node_address())
}

// =============================================================================
// Tests
// =============================================================================
