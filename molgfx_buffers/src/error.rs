//! Error types for the molgfx GPU resource layer
//!
//! Native API failures surface as `BackendError`/`OutOfMemory`, setup-time
//! mistakes in descriptor graphs as `InvalidConfiguration`.

use std::fmt;

/// Result type for molgfx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Molgfx errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Native graphics API call failed
    BackendError(String),

    /// Device could not allocate buffer or texture storage
    OutOfMemory,

    /// Invalid resource (bad index, short data, missing handle, etc.)
    InvalidResource(String),

    /// Initialization failed (engine context, device registration)
    InitializationFailed(String),

    /// Descriptor graph rejected at setup time
    InvalidConfiguration(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
