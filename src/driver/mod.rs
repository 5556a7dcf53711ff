//! Core driver components for GRLIB packet controllers.
//!
//! This module contains the building blocks for configuring and operating
//! a descriptor-ring packet device:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`device`] - The device handle with the open/read/write/service surface
//! - [`interrupt`] - Parsed status-register flags
//! - [`stats`] - Accounting counters
//!
//! # Example
//!
//! ```ignore
//! use grlib_pktdma::driver::{DeviceConfig, GrethDeviceDefault};
//!
//! let config = DeviceConfig::new(0x8000_0E00)
//!     .with_node_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! ```

// Submodules
pub mod config;
pub mod device;
pub mod error;
pub mod interrupt;
pub mod stats;

// Re-exports for convenience
pub use config::{DeviceConfig, State};
pub use device::{
    GrethDevice, GrethDeviceDefault, GrethDeviceSmall, GrspwDevice, OpenEthDevice, PacketDevice,
};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use interrupt::InterruptStatus;
pub use stats::DeviceStats;
