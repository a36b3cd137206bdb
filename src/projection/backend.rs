//! PROJ-backed projection service

use proj::Proj;

use crate::error::{Error, Result};
use crate::projection::{Coordinate, ProjectionService};

/// Transforms coordinates between reference systems using the PROJ library.
///
/// Stateless: a transform pipeline is constructed per CRS pair and call, so
/// the service can serve any pair the PROJ database knows about.
#[derive(Debug, Default)]
pub struct ProjTransformer;

impl ProjTransformer {
    /// Creates a new PROJ-backed transformer
    pub fn new() -> Self {
        Self
    }

    fn pipeline(from_epsg: u32, to_epsg: u32) -> Result<Proj> {
        let from = format!("EPSG:{}", from_epsg);
        let to = format!("EPSG:{}", to_epsg);
        Proj::new_known_crs(&from, &to, None)
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))
    }
}

impl ProjectionService for ProjTransformer {
    fn forward(&self, from_epsg: u32, to_epsg: u32, coord: Coordinate) -> Result<Coordinate> {
        if from_epsg == to_epsg {
            return Ok(coord);
        }
        let proj = Self::pipeline(from_epsg, to_epsg)?;
        let result = proj
            .convert((coord.x, coord.y))
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;
        Ok(Coordinate::new(result.0, result.1))
    }
}
