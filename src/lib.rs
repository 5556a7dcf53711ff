//! GRLIB Descriptor-Ring DMA Packet Engine
//!
//! A `no_std`, no-alloc driver core for the DMA descriptor-ring pattern
//! shared by the packet peripherals of LEON/SPARC GRLIB SoCs: the GRETH
//! Ethernet MAC, the OpenCores Ethernet MAC and the GRSPW SpaceWire
//! controller's DMA channels.
//!
//! # Architecture
//!
//! All of these controllers move frames through the same machinery: a
//! fixed ring of two-word buffer descriptors per direction, a closed pool
//! of payload buffers bound to the ring at initialization, and an
//! enable/ownership bit inside each descriptor that hands slots back and
//! forth between the CPU and the DMA engine. What differs per family is
//! only the bit layout of the descriptor status word.
//!
//! The crate is therefore organized as one generic engine plus small
//! per-family codecs:
//!
//! 1. **Driver layer** ([`driver`]): the [`PacketDevice`] handle with the
//!    `open`/`close`/`read`/`write`/`service` surface
//! 2. **Codec layer** ([`codec`]): [`DescriptorCodec`] implementations
//!    for the GRETH, OpenCores Ethernet and GRSPW descriptor formats
//! 3. **Internal layer**: rings, buffer pools and volatile register/
//!    descriptor access
//!
//! The ownership bit is the synchronization primitive: the peer on the
//! other side of the descriptor memory is a DMA engine, not cooperating
//! software, so the driver uses volatile descriptor accesses at exactly
//! the points the hardware may race — never a mutex.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for errors, status and statistics
//! - `smoltcp`: Enable smoltcp network stack integration for the
//!   Ethernet-framed families
//! - `critical-section`: Enable the ISR-safe [`SharedDevice`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use grlib_pktdma::{DeviceConfig, GrethDevice};
//!
//! // Static allocation: 8 slots each way, full Ethernet frames
//! static mut ETH: GrethDevice<8, 8, 1536> = GrethDevice::new();
//!
//! let eth = unsafe { &mut ETH };
//!
//! let config = DeviceConfig::new(greth_base_from_bus_scan)
//!     .with_node_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56]);
//! eth.open(config, &mut delay).unwrap();
//!
//! eth.write(&frame).unwrap();
//! let n = eth.read(&mut buf).unwrap();
//!
//! // On interrupt or poll tick:
//! match eth.service(|frame| stack.input(frame)) {
//!     Err(e) if e == grlib_pktdma::DmaError::FatalBusError.into() => {
//!         eth.recover().unwrap();
//!     }
//!     _ => {}
//! }
//! ```
//!
//! # Memory Requirements
//!
//! With the default GRETH geometry (8 RX + 8 TX slots of 1536 bytes):
//! ~24 KB of DMA-reachable RAM per device, allocated once inside the
//! handle. Nothing is allocated after `open`.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; project-wide configuration is in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod codec;
pub mod driver;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use codec::{DescriptorCodec, EthernetCodec, Greth, Grspw, OpenEth, RxFaults};
pub use driver::config::{DeviceConfig, State};
pub use driver::device::{
    GrethDevice, GrethDeviceDefault, GrethDeviceSmall, GrspwDevice, OpenEthDevice, PacketDevice,
};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::interrupt::InterruptStatus;
pub use driver::stats::DeviceStats;

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedDevice;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types and integration points.
pub mod constants {
    pub use crate::internal::constants::{
        CRC_SIZE,
        DEFAULT_BUFFER_SIZE,
        DEFAULT_NODE_ADDR,
        DEFAULT_RX_BUFFERS,
        DEFAULT_TX_BUFFERS,
        ETH_HEADER_SIZE,
        MAX_FRAME_SIZE,
        MIN_FRAME_SIZE,
        MTU,
        NODE_ADDR_LEN,
        RESET_POLL_INTERVAL_US,
        RESET_TIMEOUT,
        TX_BUSY_TIMEOUT,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe device instance for synchronous use.
///
/// Expands to a `SharedDevice` static, reducing boilerplate for
/// interrupt-driven bring-up.
///
/// # Examples
///
/// ```ignore
/// grlib_pktdma::pktdma_static_sync!(ETH, grlib_pktdma::Greth);
///
/// ETH.with(|eth| {
///     eth.open(DeviceConfig::new(base), &mut delay).unwrap();
/// });
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! pktdma_static_sync {
    ($name:ident, $codec:ty) => {
        $crate::pktdma_static_sync!($name, $codec, 8, 8, 1536);
    };
    ($name:ident, $codec:ty, $rx:expr, $tx:expr, $buf:expr) => {
        static $name: $crate::sync::SharedDevice<$codec, $rx, $tx, $buf> =
            $crate::sync::SharedDevice::new();
    };
}
