//! Error types for synthraster

use std::fmt;
use std::io;

/// Result type for synthraster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in synthraster operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Band buffer shape inconsistent with the declared grid
    ShapeMismatch(String),

    /// Grids not congruent, or cross-CRS input where a single CRS is required
    Alignment(String),

    /// Mismatched nodata or datatype where matching is required
    IncompatibleRaster(String),

    /// Aggregate query over an all-nodata raster
    EmptyRaster,

    /// Unsupported or unrepresentable numeric type requested
    InvalidDatatype(String),

    /// Out of bounds access
    OutOfBounds(String),

    /// Projection error
    Projection(String),

    /// Raster store error
    Store(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            Error::Alignment(msg) => write!(f, "Alignment error: {}", msg),
            Error::IncompatibleRaster(msg) => write!(f, "Incompatible rasters: {}", msg),
            Error::EmptyRaster => write!(f, "Raster contains no data pixels"),
            Error::InvalidDatatype(msg) => write!(f, "Invalid datatype: {}", msg),
            Error::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
            Error::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}
