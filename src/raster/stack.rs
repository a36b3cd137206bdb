//! Batch operations over an ordered collection of rasters
//!
//! Members are distinct `Raster` instances, so per-member work can run in
//! parallel without violating the single-writer discipline.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::resample::ResampleMethod;
use crate::types::DataType;

/// An ordered collection of rasters prepared together as a fixture set
#[derive(Debug, Clone)]
pub struct RasterStack {
    rasters: Vec<Raster>,
}

impl RasterStack {
    /// Creates a stack; at least one member is required
    pub fn new(rasters: Vec<Raster>) -> Result<Self> {
        if rasters.is_empty() {
            return Err(Error::ShapeMismatch(
                "raster stack needs at least one member".to_string(),
            ));
        }
        Ok(Self { rasters })
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Always false: construction requires at least one member
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Borrows the members in order
    pub fn rasters(&self) -> &[Raster] {
        &self.rasters
    }

    /// Consumes the stack, returning its members
    pub fn into_rasters(self) -> Vec<Raster> {
        self.rasters
    }

    /// True iff every member occupies the first member's grid
    pub fn all_aligned(&self) -> bool {
        let first = &self.rasters[0];
        self.rasters.iter().all(|r| first.is_aligned(r))
    }

    /// Fails unless every member shares one CRS
    pub fn assert_same_projection(&self) -> Result<()> {
        let crs = self.rasters[0].crs();
        for r in &self.rasters {
            if r.crs() != crs {
                return Err(Error::Alignment(format!(
                    "stack members span multiple CRS: EPSG:{} and EPSG:{}",
                    crs,
                    r.crs()
                )));
            }
        }
        Ok(())
    }

    /// Resamples every member onto the first member's grid
    pub fn align_all(&self, method: ResampleMethod) -> Result<RasterStack> {
        self.assert_same_projection()?;
        let target = self.rasters[0].grid().clone();
        let rasters = self
            .rasters
            .par_iter()
            .map(|r| crate::resample::align(r, &target, method))
            .collect::<Result<Vec<_>>>()?;
        RasterStack::new(rasters)
    }

    /// Rewrites every member to one nodata sentinel and datatype
    pub fn standardize(&self, datatype: DataType, nodata: f64) -> Result<RasterStack> {
        let rasters = self
            .rasters
            .par_iter()
            .map(|r| r.set_datatype_and_nodata(datatype, nodata))
            .collect::<Result<Vec<_>>>()?;
        RasterStack::new(rasters)
    }
}
