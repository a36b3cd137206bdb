//! Grid congruence checking and resampling onto a target grid

pub mod kernel;

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::RasterGrid;
use crate::raster::{Band, Raster};
use kernel::SourceView;

/// Interpolation policy used when mapping pixel values from a source grid
/// onto a different target grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleMethod {
    /// Value of the source pixel whose center is closest; ties break toward
    /// the smaller row, then the smaller column
    Nearest,
    /// Weighted mean of the 2x2 neighborhood
    Bilinear,
    /// Cubic convolution over the 4x4 neighborhood
    Cubic,
    /// Mean over the source footprint of the target pixel
    Average,
    /// Most frequent value over the source footprint; ties break toward the
    /// smallest value
    Mode,
}

impl ResampleMethod {
    /// Method name as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "nearest",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
            ResampleMethod::Average => "average",
            ResampleMethod::Mode => "mode",
        }
    }
}

/// True iff the two rasters occupy the same pixel grid: equal shape, affine
/// transform and CRS.
///
/// This is the single gate every elementwise operation depends on.
pub fn is_aligned(a: &Raster, b: &Raster) -> bool {
    a.grid().is_congruent(b.grid())
}

/// Resamples `source` onto `target_grid`.
///
/// Both grids must share a CRS; changing CRS goes through reprojection. The
/// output inherits the source datatype and nodata. Target pixels whose kernel
/// finds no usable source pixel become nodata (or zero when the source has no
/// sentinel).
pub fn align(source: &Raster, target_grid: &RasterGrid, method: ResampleMethod) -> Result<Raster> {
    if source.grid().crs() != target_grid.crs() {
        return Err(Error::Alignment(format!(
            "cannot align across CRS boundaries: EPSG:{} vs EPSG:{}; reproject instead",
            source.grid().crs(),
            target_grid.crs()
        )));
    }
    if source.grid().is_congruent(target_grid) {
        return Ok(source.clone());
    }

    debug!(
        "aligning {}x{} raster onto {}x{} grid ({})",
        source.rows(),
        source.cols(),
        target_grid.rows(),
        target_grid.cols(),
        method.name()
    );

    let src_inverse = source.grid().transform().inverse()?;
    let scale = (
        target_grid.transform().pixel_width() / source.affine().pixel_width(),
        target_grid.transform().pixel_height() / source.affine().pixel_height(),
    );

    resample_with(source, target_grid, method, scale, |x, y| {
        Ok(src_inverse.forward(x, y))
    })
}

/// Shared resampling loop: maps every target pixel center through
/// `world_to_source` (a world-coordinate to fractional-source-pixel mapping)
/// and samples the source there.
pub(crate) fn resample_with<F>(
    source: &Raster,
    target_grid: &RasterGrid,
    method: ResampleMethod,
    scale: (f64, f64),
    world_to_source: F,
) -> Result<Raster>
where
    F: Fn(f64, f64) -> Result<(f64, f64)>,
{
    let nodata = source.nodata();
    let fill = nodata.unwrap_or(0.0);
    let len = target_grid.pixel_count();
    let mut bands = Vec::with_capacity(source.band_count());

    for band_num in 1..=source.band_count() {
        let view = SourceView::new(source.band(band_num)?, source.rows(), source.cols(), nodata);
        let mut out = Band::zeroed(source.datatype(), len);
        for row in 0..target_grid.rows() {
            for col in 0..target_grid.cols() {
                let (x, y) = target_grid.pixel_center(row, col);
                let (col_f, row_f) = world_to_source(x, y)?;
                let value = kernel::sample(&view, col_f, row_f, method, scale).unwrap_or(fill);
                out.set(row * target_grid.cols() + col, value);
            }
        }
        bands.push(out);
    }

    Raster::from_bands(target_grid.clone(), source.datatype(), nodata, bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AffineTransform;
    use crate::raster::RasterFactory;
    use crate::types::DataType;

    fn factory() -> RasterFactory {
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        RasterFactory::new(4326, DataType::F64, Some(-9999.0), 3, 4, affine).unwrap()
    }

    fn misaligned_factory() -> RasterFactory {
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 4.0).unwrap();
        RasterFactory::new(4326, DataType::F64, Some(-9999.0), 3, 4, affine).unwrap()
    }

    #[test]
    fn test_is_aligned_symmetry() {
        let a = factory().uniform(1.0).unwrap();
        let b = factory().uniform(2.0).unwrap();
        let c = misaligned_factory().uniform(1.0).unwrap();
        assert!(is_aligned(&a, &b));
        assert!(is_aligned(&b, &a));
        assert!(!is_aligned(&a, &c));
        assert!(!is_aligned(&c, &a));
    }

    #[test]
    fn test_align_idempotence_every_method() {
        let a = factory().alternating(1.0, 2.0).unwrap();
        for method in [
            ResampleMethod::Nearest,
            ResampleMethod::Bilinear,
            ResampleMethod::Cubic,
            ResampleMethod::Average,
            ResampleMethod::Mode,
        ] {
            let out = align(&a, a.grid(), method).unwrap();
            assert_eq!(out.band_values(1).unwrap(), a.band_values(1).unwrap());
        }
    }

    #[test]
    fn test_align_onto_shifted_grid() {
        let a = misaligned_factory().uniform(1.0).unwrap();
        let b = factory().uniform(1.0).unwrap();
        assert!(!is_aligned(&a, &b));
        let c = align(&a, b.grid(), ResampleMethod::Nearest).unwrap();
        assert!(is_aligned(&b, &c));
    }

    #[test]
    fn test_align_wrappers() {
        let a = factory().uniform(1.0).unwrap();
        let b = misaligned_factory().uniform(1.0).unwrap();
        assert!(!a.is_aligned(&b));

        // align: other onto self's grid
        let c = a.align(&b, ResampleMethod::Nearest).unwrap();
        assert!(a.is_aligned(&c));

        // align_to: self onto other's grid
        let d = a.align_to(&b, ResampleMethod::Nearest).unwrap();
        assert!(b.is_aligned(&d));
    }

    #[test]
    fn test_align_rejects_cross_crs() {
        let a = factory().uniform(1.0).unwrap();
        let t = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        let other = RasterGrid::new(3, 4, t, 32631).unwrap();
        assert!(matches!(
            align(&a, &other, ResampleMethod::Nearest),
            Err(Error::Alignment(_))
        ));
    }

    #[test]
    fn test_align_shifted_values_nearest() {
        // shift the grid half a pixel right: each target center lands exactly
        // between two source centers, so the tie goes to the smaller column
        let values: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let src_affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        let src_grid = RasterGrid::new(3, 4, src_affine, 4326).unwrap();
        let source = Raster::from_array(src_grid, DataType::F64, Some(-9999.0), &values).unwrap();

        let dst_affine = AffineTransform::new(1.0, 0.0, 0.5, 0.0, -1.0, 3.0).unwrap();
        let dst_grid = RasterGrid::new(3, 4, dst_affine, 4326).unwrap();
        let out = align(&source, &dst_grid, ResampleMethod::Nearest).unwrap();

        // target (0,0) center is at x=1.0, equidistant from source cols 0 and 1
        assert_eq!(out.pixel(1, 0, 0).unwrap(), 0.0);
        // target (0,3) center is at x=4.0, tie between cols 3 and (out of bounds) 4
        assert_eq!(out.pixel(1, 0, 3).unwrap(), 3.0);
    }

    #[test]
    fn test_align_fills_uncovered_pixels_with_nodata() {
        // target grid one unit above the source: its top row maps outside
        let source = factory().uniform(7.0).unwrap();
        let dst_affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 4.0).unwrap();
        let dst_grid = RasterGrid::new(3, 4, dst_affine, 4326).unwrap();
        let out = align(&source, &dst_grid, ResampleMethod::Nearest).unwrap();
        assert_eq!(out.pixel(1, 0, 0).unwrap(), -9999.0);
        assert_eq!(out.pixel(1, 1, 0).unwrap(), 7.0);
    }

    #[test]
    fn test_align_downsample_average() {
        // 4x4 checkerboard averaged onto a 2x2 grid of double-size pixels
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 4.0).unwrap();
        let f = RasterFactory::new(4326, DataType::F64, Some(-9999.0), 4, 4, affine).unwrap();
        let source = f.alternating(1.0, 2.0).unwrap();

        let dst_affine = AffineTransform::new(2.0, 0.0, 0.0, 0.0, -2.0, 4.0).unwrap();
        let dst_grid = RasterGrid::new(2, 2, dst_affine, 4326).unwrap();
        let out = align(&source, &dst_grid, ResampleMethod::Average).unwrap();
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(out.pixel(1, row, col).unwrap(), 1.5);
            }
        }
    }

    #[test]
    fn test_align_preserves_datatype_and_nodata() {
        let affine = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        let f = RasterFactory::new(4326, DataType::I16, Some(-9999.0), 3, 4, affine).unwrap();
        let a = f.uniform(3.0).unwrap();
        let dst_affine = AffineTransform::new(1.0, 0.0, 0.5, 0.0, -1.0, 3.0).unwrap();
        let dst_grid = RasterGrid::new(3, 4, dst_affine, 4326).unwrap();
        let out = align(&a, &dst_grid, ResampleMethod::Bilinear).unwrap();
        assert_eq!(out.datatype(), DataType::I16);
        assert_eq!(out.nodata(), Some(-9999.0));
    }
}
