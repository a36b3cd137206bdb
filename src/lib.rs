//! synthraster - synthetic geospatial rasters for testing geoprocessing pipelines
//!
//! synthraster generates rasters with deterministic content patterns and
//! provides the algebra needed to combine them: grid alignment checks,
//! resampling, reprojection, nodata-aware elementwise arithmetic and
//! reclassification.
//!
//! # Examples
//!
//! ## Fixture construction and algebra
//!
//! ```
//! use synthraster::{AffineTransform, DataType, RasterFactory};
//!
//! let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0)?;
//! let factory = RasterFactory::new(4326, DataType::F64, Some(-9999.0), 3, 4, affine)?;
//!
//! let a = factory.alternating(1.0, 2.0)?;
//! let b = a.add(&a)?;
//! assert_eq!(b.pixel(1, 0, 0)?, 2.0);
//! assert_eq!(a.mean()?, 1.5);
//! # Ok::<(), synthraster::Error>(())
//! ```
//!
//! ## Alignment and reprojection
//!
//! ```
//! use synthraster::{AffineTransform, DataType, RasterFactory, ResampleMethod, ScaledProjection};
//!
//! let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0)?;
//! let factory = RasterFactory::new(4326, DataType::F64, Some(-9999.0), 3, 4, affine)?;
//! let a = factory.uniform(1.0)?;
//!
//! let service = ScaledProjection::new(4326, 32631, 111_000.0);
//! let projected = a.reproject(32631, ResampleMethod::Nearest, Some(1000.0), &service)?;
//! assert_eq!(projected.shape(), (333, 444));
//! # Ok::<(), synthraster::Error>(())
//! ```

pub mod algebra;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod raster;
pub mod reproject;
pub mod resample;
pub mod store;
pub mod types;

pub use algebra::reclass::ReclassTable;
pub use error::{Error, Result};
pub use geometry::{AffineTransform, RasterGrid};
pub use projection::{Coordinate, ProjTransformer, ProjectionService, ScaledProjection};
pub use raster::{Band, Raster, RasterFactory, RasterStack};
pub use resample::ResampleMethod;
pub use store::{JsonStore, MemoryStore, RasterStore, StoreEntryMeta};
pub use types::DataType;
