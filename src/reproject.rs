//! Reprojection onto a new CRS and pixel size
//!
//! Unlike same-CRS alignment, reprojection needs a per-pixel coordinate
//! transform through the projection service: the mapping between the two
//! grids is not a fixed affine offset.

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::{AffineTransform, RasterGrid};
use crate::projection::{Coordinate, ProjectionService};
use crate::raster::Raster;
use crate::resample::{self, ResampleMethod};

/// Computes the target grid covering `source`'s ground footprint in
/// `target_crs` at `pixel_size` world units per pixel.
///
/// The footprint is the bounding box of the four pixel-grid corners
/// transformed through the service. Output dimensions are
/// `ceil(extent / pixel_size)` per axis.
fn target_grid(
    source: &Raster,
    target_crs: u32,
    pixel_size: f64,
    service: &dyn ProjectionService,
) -> Result<RasterGrid> {
    if pixel_size <= 0.0 || !pixel_size.is_finite() {
        return Err(Error::ShapeMismatch(format!(
            "pixel size must be positive, got {}",
            pixel_size
        )));
    }

    let corners: Vec<Coordinate> = source
        .grid()
        .corner_points()
        .iter()
        .map(|&(x, y)| Coordinate::new(x, y))
        .collect();
    let (min_x, min_y, max_x, max_y) =
        service.bounding_box(&corners, source.crs(), target_crs)?;

    let cols = (((max_x - min_x) / pixel_size).ceil() as usize).max(1);
    let rows = (((max_y - min_y) / pixel_size).ceil() as usize).max(1);
    let transform = AffineTransform::new(pixel_size, 0.0, min_x, 0.0, -pixel_size, max_y)?;
    RasterGrid::new(rows, cols, transform, target_crs)
}

/// Reprojects `source` to `target_crs`, resampling with `method`.
///
/// `pixel_size` defaults to the source pixel width. The output covers the
/// source's ground footprint; pixels that map outside the source become
/// nodata.
pub fn reproject(
    source: &Raster,
    target_crs: u32,
    method: ResampleMethod,
    pixel_size: Option<f64>,
    service: &dyn ProjectionService,
) -> Result<Raster> {
    let pixel_size = pixel_size.unwrap_or_else(|| source.affine().pixel_width());
    let grid = target_grid(source, target_crs, pixel_size, service)?;

    debug!(
        "reprojecting EPSG:{} -> EPSG:{} at pixel size {} ({} -> {}x{}, {})",
        source.crs(),
        target_crs,
        pixel_size,
        source.rows() * source.cols(),
        grid.rows(),
        grid.cols(),
        method.name()
    );

    // Footprint-derived ratio of source pixels per target pixel, used by the
    // Average/Mode footprints.
    let scale = (
        source.cols() as f64 / grid.cols() as f64,
        source.rows() as f64 / grid.rows() as f64,
    );

    let src_inverse = source.grid().transform().inverse()?;
    let src_crs = source.crs();
    resample::resample_with(source, &grid, method, scale, |x, y| {
        let src_world = service.forward(target_crs, src_crs, Coordinate::new(x, y))?;
        Ok(src_inverse.forward(src_world.x, src_world.y))
    })
}

/// Changes the pixel size of `source` within its own CRS, covering the same
/// bounding box.
pub fn resize_pixels(source: &Raster, pixel_size: f64, method: ResampleMethod) -> Result<Raster> {
    if pixel_size <= 0.0 || !pixel_size.is_finite() {
        return Err(Error::ShapeMismatch(format!(
            "pixel size must be positive, got {}",
            pixel_size
        )));
    }
    let (min_x, min_y, max_x, max_y) = source.bounding_box();
    let cols = (((max_x - min_x) / pixel_size).ceil() as usize).max(1);
    let rows = (((max_y - min_y) / pixel_size).ceil() as usize).max(1);
    let transform = AffineTransform::new(pixel_size, 0.0, min_x, 0.0, -pixel_size, max_y)?;
    let grid = RasterGrid::new(rows, cols, transform, source.crs())?;
    resample::align(source, &grid, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AffineTransform;
    use crate::projection::{epsg, ScaledProjection};
    use crate::raster::RasterFactory;
    use crate::types::DataType;

    fn factory() -> RasterFactory {
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        RasterFactory::new(4326, DataType::F64, Some(-9999.0), 3, 4, affine).unwrap()
    }

    fn service() -> ScaledProjection {
        ScaledProjection::new(epsg::WGS84, epsg::UTM_31N, 111_000.0)
    }

    #[test]
    fn test_reproject_dimensions_from_ceil_rule() {
        // 4 degrees x 3 degrees footprint at 111 km/degree and 1000 m pixels
        let a = factory().alternating(1.0, 2.0).unwrap();
        let b = a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(1000.0), &service())
            .unwrap();
        assert_eq!(b.shape(), (333, 444));
        assert_eq!(b.crs(), epsg::UTM_31N);
    }

    #[test]
    fn test_reproject_ceil_rounds_partial_pixels_up() {
        let a = factory().uniform(1.0).unwrap();
        let b = a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(999.0), &service())
            .unwrap();
        // 444000 / 999 = 444.44.. -> 445; 333000 / 999 = 333.33.. -> 334
        assert_eq!(b.shape(), (334, 445));
    }

    #[test]
    fn test_reproject_grid_geometry() {
        let a = factory().uniform(1.0).unwrap();
        let b = a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(1000.0), &service())
            .unwrap();
        let gt = b.affine().to_gdal();
        assert_eq!(gt[0], 0.0); // min_x
        assert_eq!(gt[1], 1000.0); // pixel width
        assert_eq!(gt[3], 333_000.0); // max_y
        assert_eq!(gt[5], -1000.0); // pixel height
    }

    #[test]
    fn test_reproject_preserves_values() {
        let a = factory().uniform(7.0).unwrap();
        let b = a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(1000.0), &service())
            .unwrap();
        // interior pixel maps well inside the source
        assert_eq!(b.pixel(1, 100, 200).unwrap(), 7.0);
        assert_eq!(b.datatype(), DataType::F64);
        assert_eq!(b.nodata(), Some(-9999.0));
    }

    #[test]
    fn test_reproject_default_pixel_size_is_source_width() {
        let a = factory().uniform(1.0).unwrap();
        // identity "reprojection" back into the same CRS keeps 1-degree pixels
        let b = a
            .reproject(epsg::WGS84, ResampleMethod::Nearest, None, &service())
            .unwrap();
        assert_eq!(b.shape(), (3, 4));
        assert_eq!(b.band_values(1).unwrap(), a.band_values(1).unwrap());
    }

    #[test]
    fn test_reproject_rejects_bad_pixel_size() {
        let a = factory().uniform(1.0).unwrap();
        assert!(a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(0.0), &service())
            .is_err());
        assert!(a
            .reproject(epsg::UTM_31N, ResampleMethod::Nearest, Some(-5.0), &service())
            .is_err());
    }

    #[test]
    fn test_resize_pixels_halving_doubles_shape() {
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 4.0).unwrap();
        let f = RasterFactory::new(4326, DataType::F64, Some(-9999.0), 4, 4, affine).unwrap();
        let a = f.alternating(1.0, 2.0).unwrap();
        let b = a.resize_pixels(0.5, ResampleMethod::Nearest).unwrap();
        assert_eq!(b.shape(), (8, 8));
        // each source pixel becomes a 2x2 block
        assert_eq!(b.pixel(1, 0, 0).unwrap(), 1.0);
        assert_eq!(b.pixel(1, 0, 1).unwrap(), 1.0);
        assert_eq!(b.pixel(1, 0, 2).unwrap(), 2.0);
        assert_eq!(b.pixel(1, 1, 1).unwrap(), 1.0);
    }
}
