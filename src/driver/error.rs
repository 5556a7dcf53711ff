//! Error types for the packet DMA driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: open/configuration failures
//! - [`DmaError`]: descriptor-ring and frame-validity issues
//! - [`IoError`]: runtime TX/RX failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! Per-frame receive faults (CRC, framing, overrun, truncation) are not
//! errors in this taxonomy: they are counted in the statistics and the
//! frame is dropped, invisibly to the caller.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Open and configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device already open (the open flag was already set)
    AlreadyOpen,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Controller soft reset did not complete
    ResetFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyOpen => "device already open",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::ResetFailed => "controller reset failed",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Descriptor-ring and frame-validity errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Frame exceeds the slot buffer or the descriptor length field
    FrameTooLarge,
    /// Invalid frame length (empty frame)
    InvalidLength,
    /// AHB bus error: driver and hardware ring state have diverged.
    /// The only recovery is a full ring reinitialization.
    FatalBusError,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::FrameTooLarge => "frame too large for ring buffers",
            DmaError::InvalidLength => "invalid frame length",
            DmaError::FatalBusError => "fatal AHB bus error",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime TX/RX errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Bounded busy-wait on a TX descriptor expired
    Timeout,
    /// Invalid state for operation (not open, or faulted pending recovery)
    InvalidState,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::InvalidState => "invalid state for operation",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Dma(DmaError::FatalBusError)) => device.recover()?,
///     Err(Error::Io(IoError::Timeout)) => { /* back off and retry */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
