//! Error types for the Galaxy3D navigation crate
//!
//! Construction of the spatial tree and the neighbor graph validates its
//! inputs eagerly. Lookups and path searches never fail with an error: they
//! report absence through `Option`.

use std::fmt;

/// Result type for Galaxy3D navigation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D navigation errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Root region is not a finite cube with a positive edge length
    InvalidRegion(String),

    /// Minimum cell size is not a finite positive number
    InvalidCellSize(String),

    /// Configuration value out of range (depth limit, adjacency epsilon)
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
            Error::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
