//! Grid geometry: affine transforms and raster grid descriptors

pub mod affine;
pub mod grid;

pub use affine::AffineTransform;
pub use grid::RasterGrid;
