//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KartografTypesError {
    /// Coordinate string could not be parsed or lies outside of the valid ranges.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}
