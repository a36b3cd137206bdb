//! Coordinate transforms between reference systems
//!
//! The core consumes projections through the [`ProjectionService`] trait so
//! that reprojection logic never depends on a particular CRS database.
//! [`ProjTransformer`] provides a PROJ-backed implementation;
//! [`ScaledProjection`] is a deterministic synthetic service for tests and
//! fixtures.

pub mod backend;

pub use backend::ProjTransformer;

use crate::error::{Error, Result};

/// Common EPSG codes
pub mod epsg {
    /// WGS84 geographic coordinates
    pub const WGS84: u32 = 4326;
    /// Web Mercator
    pub const WEB_MERCATOR: u32 = 3857;
    /// UTM zone 31N
    pub const UTM_31N: u32 = 32631;
}

/// Represents a coordinate in any coordinate reference system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a coordinate from longitude/latitude in degrees (WGS84)
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat)
    }
}

/// Supplies forward and inverse coordinate transforms between CRS pairs.
///
/// Consumed by reprojection, which needs a per-pixel coordinate transform
/// rather than a fixed affine offset.
pub trait ProjectionService {
    /// Transforms a coordinate from `from_epsg` to `to_epsg`
    fn forward(&self, from_epsg: u32, to_epsg: u32, coord: Coordinate) -> Result<Coordinate>;

    /// Transforms a coordinate from `to_epsg` back to `from_epsg`
    fn inverse(&self, from_epsg: u32, to_epsg: u32, coord: Coordinate) -> Result<Coordinate> {
        self.forward(to_epsg, from_epsg, coord)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a point set transformed
    /// from `from_epsg` to `to_epsg`
    fn bounding_box(
        &self,
        points: &[Coordinate],
        from_epsg: u32,
        to_epsg: u32,
    ) -> Result<(f64, f64, f64, f64)> {
        if points.is_empty() {
            return Err(Error::Projection(
                "bounding box of an empty point set".to_string(),
            ));
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for &p in points {
            let t = self.forward(from_epsg, to_epsg, p)?;
            min_x = min_x.min(t.x);
            min_y = min_y.min(t.y);
            max_x = max_x.max(t.x);
            max_y = max_y.max(t.y);
        }
        Ok((min_x, min_y, max_x, max_y))
    }
}

/// A deterministic synthetic projection: a geographic CRS mapped onto a
/// projected CRS by a fixed meters-per-degree factor.
///
/// Useful for fixtures where reprojection output dimensions must be exactly
/// assertable without a PROJ database.
#[derive(Debug, Clone, Copy)]
pub struct ScaledProjection {
    geographic_epsg: u32,
    projected_epsg: u32,
    meters_per_degree: f64,
}

impl ScaledProjection {
    /// Creates a scaled projection between a geographic and a projected CRS
    pub fn new(geographic_epsg: u32, projected_epsg: u32, meters_per_degree: f64) -> Self {
        Self {
            geographic_epsg,
            projected_epsg,
            meters_per_degree,
        }
    }
}

impl ProjectionService for ScaledProjection {
    fn forward(&self, from_epsg: u32, to_epsg: u32, coord: Coordinate) -> Result<Coordinate> {
        if from_epsg == to_epsg {
            return Ok(coord);
        }
        if from_epsg == self.geographic_epsg && to_epsg == self.projected_epsg {
            Ok(Coordinate::new(
                coord.x * self.meters_per_degree,
                coord.y * self.meters_per_degree,
            ))
        } else if from_epsg == self.projected_epsg && to_epsg == self.geographic_epsg {
            Ok(Coordinate::new(
                coord.x / self.meters_per_degree,
                coord.y / self.meters_per_degree,
            ))
        } else {
            Err(Error::Projection(format!(
                "scaled projection only maps EPSG:{} <-> EPSG:{}, got {} -> {}",
                self.geographic_epsg, self.projected_epsg, from_epsg, to_epsg
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaled_forward_and_inverse() {
        let svc = ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0);
        let c = svc
            .forward(epsg::WGS84, epsg::UTM_31N, Coordinate::new(2.0, 3.0))
            .unwrap();
        assert_relative_eq!(c.x, 222_000.0);
        assert_relative_eq!(c.y, 333_000.0);

        let back = svc.inverse(epsg::WGS84, epsg::UTM_31N, c).unwrap();
        assert_relative_eq!(back.x, 2.0);
        assert_relative_eq!(back.y, 3.0);
    }

    #[test]
    fn test_scaled_same_crs_is_identity() {
        let svc = ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0);
        let c = svc
            .forward(epsg::WGS84, epsg::WGS84, Coordinate::new(1.5, -2.5))
            .unwrap();
        assert_relative_eq!(c.x, 1.5);
        assert_relative_eq!(c.y, -2.5);
    }

    #[test]
    fn test_scaled_rejects_unknown_pair() {
        let svc = ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0);
        assert!(svc
            .forward(epsg::WGS84, epsg::WEB_MERCATOR, Coordinate::new(0.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_bounding_box_over_corners() {
        let svc = ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0);
        let points = [
            Coordinate::new(0.0, 3.0),
            Coordinate::new(4.0, 3.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(4.0, 0.0),
        ];
        let (min_x, min_y, max_x, max_y) = svc
            .bounding_box(&points, epsg::WGS84, epsg::UTM_31N)
            .unwrap();
        assert_relative_eq!(min_x, 0.0);
        assert_relative_eq!(min_y, 0.0);
        assert_relative_eq!(max_x, 444_000.0);
        assert_relative_eq!(max_y, 333_000.0);
    }
}
