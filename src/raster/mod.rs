//! The raster entity: pixel bands plus grid geometry, nodata and datatype

pub mod band;
pub mod factory;
pub mod stack;

pub use band::Band;
pub use factory::RasterFactory;
pub use stack::RasterStack;

use std::fmt;

use log::debug;
use num_traits::ToPrimitive;

use crate::algebra;
use crate::algebra::reclass::ReclassTable;
use crate::error::{Error, Result};
use crate::geometry::{AffineTransform, RasterGrid};
use crate::projection::ProjectionService;
use crate::reproject;
use crate::resample::{self, ResampleMethod};
use crate::store::RasterStore;
use crate::types::DataType;

/// An in-memory raster: one or more pixel bands sharing a grid, a datatype
/// and a nodata sentinel.
///
/// Grid and datatype are immutable once constructed; every operation returns
/// a new `Raster`. The single exception is [`Raster::set_band`], an in-place
/// band assignment kept for fixture construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    grid: RasterGrid,
    datatype: DataType,
    nodata: Option<f64>,
    bands: Vec<Band>,
}

impl Raster {
    /// Builds a single-band raster from a value buffer.
    ///
    /// The buffer is quantized into `datatype` and must hold exactly
    /// `rows * cols` values.
    pub fn from_array<T: ToPrimitive + Copy>(
        grid: RasterGrid,
        datatype: DataType,
        nodata: Option<f64>,
        values: &[T],
    ) -> Result<Raster> {
        if values.len() != grid.pixel_count() {
            return Err(Error::ShapeMismatch(format!(
                "expected {} values for a {}x{} grid, got {}",
                grid.pixel_count(),
                grid.rows(),
                grid.cols(),
                values.len()
            )));
        }
        let band = Band::from_values(datatype, values);
        Self::from_bands(grid, datatype, nodata, vec![band])
    }

    /// Builds a raster from pre-constructed bands.
    pub fn from_bands(
        grid: RasterGrid,
        datatype: DataType,
        nodata: Option<f64>,
        bands: Vec<Band>,
    ) -> Result<Raster> {
        if bands.is_empty() {
            return Err(Error::ShapeMismatch("raster needs at least one band".to_string()));
        }
        for (i, band) in bands.iter().enumerate() {
            if band.len() != grid.pixel_count() {
                return Err(Error::ShapeMismatch(format!(
                    "band {} holds {} pixels, grid is {}x{}",
                    i + 1,
                    band.len(),
                    grid.rows(),
                    grid.cols()
                )));
            }
            if band.datatype() != datatype {
                return Err(Error::IncompatibleRaster(format!(
                    "band {} is {}, raster datatype is {}",
                    i + 1,
                    band.datatype().name(),
                    datatype.name()
                )));
            }
        }
        if let Some(n) = nodata {
            if !Band::representable(datatype, n) {
                return Err(Error::InvalidDatatype(format!(
                    "nodata {} is not representable as {}",
                    n,
                    datatype.name()
                )));
            }
        }
        Ok(Raster {
            grid,
            datatype,
            nodata,
            bands,
        })
    }

    /// Loads a raster from a store, reading every band.
    pub fn from_store(store: &dyn RasterStore, id: &str) -> Result<Raster> {
        let meta = store.open(id)?;
        let mut bands = Vec::with_capacity(meta.band_count);
        for band_num in 1..=meta.band_count {
            bands.push(store.read_band(id, band_num)?);
        }
        debug!("loaded raster '{}' with {} band(s)", id, bands.len());
        Self::from_bands(meta.grid, meta.datatype, meta.nodata, bands)
    }

    /// Builds a raster sharing another raster's grid, datatype, nodata and
    /// band count, with every pixel set to `fill`.
    pub fn from_template(template: &Raster, fill: f64) -> Raster {
        let bands = (0..template.band_count())
            .map(|_| Band::filled(template.datatype, template.grid.pixel_count(), fill))
            .collect();
        Raster {
            grid: template.grid.clone(),
            datatype: template.datatype,
            nodata: template.nodata,
            bands,
        }
    }

    /// Writes this raster to a store under `id`.
    pub fn write_to_store(&self, store: &dyn RasterStore, id: &str) -> Result<()> {
        debug!("writing raster '{}' ({} band(s))", id, self.band_count());
        store.write(id, &self.grid, self.datatype, self.nodata, &self.bands)
    }

    // --- metadata queries ---

    /// The grid descriptor
    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// The pixel datatype
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// The nodata sentinel, if any
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// EPSG code of the grid's CRS
    pub fn crs(&self) -> u32 {
        self.grid.crs()
    }

    /// The grid's affine transform
    pub fn affine(&self) -> &AffineTransform {
        self.grid.transform()
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// World-space bounding box (min_x, min_y, max_x, max_y)
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        self.grid.bounding_box()
    }

    /// True if `value` equals the nodata sentinel
    pub fn is_nodata(&self, value: f64) -> bool {
        self.nodata.map_or(false, |n| value == n)
    }

    // --- band access ---

    /// Borrows a band (1-based, matching raster convention)
    pub fn band(&self, band_num: usize) -> Result<&Band> {
        if band_num == 0 || band_num > self.bands.len() {
            return Err(Error::OutOfBounds(format!(
                "band {} of {}",
                band_num,
                self.bands.len()
            )));
        }
        Ok(&self.bands[band_num - 1])
    }

    /// All bands in order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Copies a band's pixels widened to f64
    pub fn band_values(&self, band_num: usize) -> Result<Vec<f64>> {
        Ok(self.band(band_num)?.to_f64_vec())
    }

    /// Reads one pixel of a band
    pub fn pixel(&self, band_num: usize, row: usize, col: usize) -> Result<f64> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::OutOfBounds(format!(
                "pixel ({}, {}) outside {}x{} grid",
                row,
                col,
                self.rows(),
                self.cols()
            )));
        }
        Ok(self.band(band_num)?.get(row * self.cols() + col))
    }

    /// Replaces a band in place. The narrow mutation exception used for
    /// fixture construction; the band must match the raster's shape and
    /// datatype.
    pub fn set_band(&mut self, band_num: usize, band: Band) -> Result<()> {
        if band_num == 0 || band_num > self.bands.len() {
            return Err(Error::OutOfBounds(format!(
                "band {} of {}",
                band_num,
                self.bands.len()
            )));
        }
        if band.len() != self.grid.pixel_count() {
            return Err(Error::ShapeMismatch(format!(
                "band holds {} pixels, grid is {}x{}",
                band.len(),
                self.rows(),
                self.cols()
            )));
        }
        if band.datatype() != self.datatype {
            return Err(Error::IncompatibleRaster(format!(
                "band is {}, raster datatype is {}",
                band.datatype().name(),
                self.datatype.name()
            )));
        }
        self.bands[band_num - 1] = band;
        Ok(())
    }

    // --- conveniences producing new rasters ---

    /// Deep copy
    pub fn copy(&self) -> Raster {
        self.clone()
    }

    /// New raster with a different nodata sentinel; pixels equal to the old
    /// sentinel are rewritten to the new one.
    pub fn set_nodata(&self, nodata: f64) -> Result<Raster> {
        if !Band::representable(self.datatype, nodata) {
            return Err(Error::InvalidDatatype(format!(
                "nodata {} is not representable as {}",
                nodata,
                self.datatype.name()
            )));
        }
        let mut bands = self.bands.clone();
        if let Some(old) = self.nodata {
            for band in &mut bands {
                for i in 0..band.len() {
                    if band.get(i) == old {
                        band.set(i, nodata);
                    }
                }
            }
        }
        Raster::from_bands(self.grid.clone(), self.datatype, Some(nodata), bands)
    }

    /// New raster with buffers cast to another datatype
    pub fn set_datatype(&self, datatype: DataType) -> Result<Raster> {
        if let Some(n) = self.nodata {
            if !Band::representable(datatype, n) {
                return Err(Error::InvalidDatatype(format!(
                    "nodata {} is not representable as {}",
                    n,
                    datatype.name()
                )));
            }
        }
        let bands = self.bands.iter().map(|b| b.cast(datatype)).collect();
        Raster::from_bands(self.grid.clone(), datatype, self.nodata, bands)
    }

    /// New raster with both datatype and nodata changed; old sentinel pixels
    /// are rewritten to the new sentinel before the cast.
    pub fn set_datatype_and_nodata(&self, datatype: DataType, nodata: f64) -> Result<Raster> {
        self.set_nodata(nodata)?.set_datatype(datatype)
    }

    /// Uniform raster of zeros sharing this raster's template
    pub fn zeros(&self) -> Raster {
        Raster::from_template(self, 0.0)
    }

    /// Uniform raster of ones sharing this raster's template
    pub fn ones(&self) -> Raster {
        Raster::from_template(self, 1.0)
    }

    // --- alignment and resampling ---

    /// True iff both rasters occupy the same pixel grid
    pub fn is_aligned(&self, other: &Raster) -> bool {
        resample::is_aligned(self, other)
    }

    /// Resamples `other` onto this raster's grid
    pub fn align(&self, other: &Raster, method: ResampleMethod) -> Result<Raster> {
        resample::align(other, &self.grid, method)
    }

    /// Resamples this raster onto `other`'s grid
    pub fn align_to(&self, other: &Raster, method: ResampleMethod) -> Result<Raster> {
        resample::align(self, other.grid(), method)
    }

    /// Reprojects to another CRS, optionally at a new pixel size
    pub fn reproject(
        &self,
        target_crs: u32,
        method: ResampleMethod,
        pixel_size: Option<f64>,
        service: &dyn ProjectionService,
    ) -> Result<Raster> {
        reproject::reproject(self, target_crs, method, pixel_size, service)
    }

    /// Same-CRS pixel-size change
    pub fn resize_pixels(&self, pixel_size: f64, method: ResampleMethod) -> Result<Raster> {
        reproject::resize_pixels(self, pixel_size, method)
    }

    // --- algebra ---

    /// Elementwise sum
    pub fn add(&self, other: &Raster) -> Result<Raster> {
        algebra::add(self, other)
    }

    /// Elementwise difference
    pub fn sub(&self, other: &Raster) -> Result<Raster> {
        algebra::sub(self, other)
    }

    /// Elementwise product
    pub fn mul(&self, other: &Raster) -> Result<Raster> {
        algebra::mul(self, other)
    }

    /// Elementwise quotient
    pub fn div(&self, other: &Raster) -> Result<Raster> {
        algebra::div(self, other)
    }

    /// Elementwise power
    pub fn pow(&self, other: &Raster) -> Result<Raster> {
        algebra::pow(self, other)
    }

    /// Elementwise minimum, nodata propagating
    pub fn minimum(&self, other: &Raster) -> Result<Raster> {
        algebra::minimum(self, other)
    }

    /// Elementwise minimum preferring the non-NaN operand
    pub fn fminimum(&self, other: &Raster) -> Result<Raster> {
        algebra::fminimum(self, other)
    }

    /// Elementwise equality as 1/0 pixels
    pub fn eq_values(&self, other: &Raster) -> Result<Raster> {
        algebra::eq_values(self, other)
    }

    /// Adds a constant to every data pixel
    pub fn add_scalar(&self, value: f64) -> Result<Raster> {
        algebra::add_scalar(self, value)
    }

    /// Subtracts a constant from every data pixel
    pub fn sub_scalar(&self, value: f64) -> Result<Raster> {
        algebra::sub_scalar(self, value)
    }

    /// Multiplies every data pixel by a constant
    pub fn mul_scalar(&self, value: f64) -> Result<Raster> {
        algebra::mul_scalar(self, value)
    }

    /// Divides every data pixel by a constant
    pub fn div_scalar(&self, value: f64) -> Result<Raster> {
        algebra::div_scalar(self, value)
    }

    /// Raises every data pixel to a constant power
    pub fn pow_scalar(&self, value: f64) -> Result<Raster> {
        algebra::pow_scalar(self, value)
    }

    /// Sum of band 1 data pixels
    pub fn sum(&self) -> Result<f64> {
        algebra::sum(self)
    }

    /// Minimum of band 1 data pixels
    pub fn min(&self) -> Result<f64> {
        algebra::min(self)
    }

    /// Maximum of band 1 data pixels
    pub fn max(&self) -> Result<f64> {
        algebra::max(self)
    }

    /// Mean of band 1 data pixels
    pub fn mean(&self) -> Result<f64> {
        algebra::mean(self)
    }

    /// Population standard deviation of band 1 data pixels
    pub fn std(&self) -> Result<f64> {
        algebra::std(self)
    }

    /// Sorted distinct band 1 data values
    pub fn unique(&self) -> Vec<f64> {
        algebra::unique(self)
    }

    /// Maps band values through a lookup table; unmapped values pass through
    pub fn reclass(&self, table: &ReclassTable, out_nodata: Option<f64>) -> Result<Raster> {
        algebra::reclass::reclassify(self, table, out_nodata)
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster {}x{}", self.rows(), self.cols())?;
        writeln!(f, "  Bands: {}", self.band_count())?;
        writeln!(f, "  Datatype: {}", self.datatype.name())?;
        match self.nodata {
            Some(n) => writeln!(f, "  NoData: {}", n)?,
            None => writeln!(f, "  NoData: none")?,
        }
        writeln!(f, "  CRS: EPSG:{}", self.crs())?;
        let gt = self.affine().to_gdal();
        writeln!(
            f,
            "  GeoTransform: ({}, {}, {}, {}, {}, {})",
            gt[0], gt[1], gt[2], gt[3], gt[4], gt[5]
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> RasterGrid {
        let t = AffineTransform::new(1.0, 0.0, 0.0, 0.0, -1.0, 3.0).unwrap();
        RasterGrid::new(3, 4, t, 4326).unwrap()
    }

    #[test]
    fn test_from_array_shape_guard() {
        let err = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &[1.0_f64; 10]);
        assert!(matches!(err, Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn test_from_array_metadata() {
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &[1.0_f64; 12]).unwrap();
        assert_eq!(r.rows(), 3);
        assert_eq!(r.cols(), 4);
        assert_eq!(r.shape(), (3, 4));
        assert_eq!(r.band_count(), 1);
        assert_eq!(r.datatype(), DataType::F64);
        assert_eq!(r.nodata(), Some(-9999.0));
        assert_eq!(r.crs(), 4326);
    }

    #[test]
    fn test_nodata_must_be_representable() {
        let err = Raster::from_array(grid(), DataType::U8, Some(-9999.0), &[1.0_f64; 12]);
        assert!(matches!(err, Err(Error::InvalidDatatype(_))));
    }

    #[test]
    fn test_pixel_access() {
        let values: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let r = Raster::from_array(grid(), DataType::F64, None, &values).unwrap();
        assert_eq!(r.pixel(1, 0, 0).unwrap(), 0.0);
        assert_eq!(r.pixel(1, 1, 2).unwrap(), 6.0);
        assert_eq!(r.pixel(1, 2, 3).unwrap(), 11.0);
        assert!(r.pixel(1, 3, 0).is_err());
        assert!(r.pixel(2, 0, 0).is_err());
    }

    #[test]
    fn test_set_band_validates() {
        let mut r = Raster::from_array(grid(), DataType::F64, None, &[0.0_f64; 12]).unwrap();
        let wrong_len = Band::filled(DataType::F64, 9, 1.0);
        assert!(r.set_band(1, wrong_len).is_err());
        let wrong_type = Band::filled(DataType::I16, 12, 1.0);
        assert!(r.set_band(1, wrong_type).is_err());
        let ok = Band::filled(DataType::F64, 12, 1.0);
        r.set_band(1, ok).unwrap();
        assert_eq!(r.pixel(1, 0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_set_nodata_rewrites_old_sentinel() {
        let values = [-9999.0_f64, 2.0, -9999.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &values).unwrap();
        let updated = r.set_nodata(100.0).unwrap();
        assert_eq!(updated.nodata(), Some(100.0));
        assert_eq!(updated.pixel(1, 0, 0).unwrap(), 100.0);
        assert_eq!(updated.pixel(1, 0, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_set_datatype() {
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &[1.6_f64; 12]).unwrap();
        let cast = r.set_datatype(DataType::I16).unwrap();
        assert_eq!(cast.datatype(), DataType::I16);
        assert_eq!(cast.pixel(1, 0, 0).unwrap(), 2.0);
    }

    #[test]
    fn test_set_datatype_rejects_unrepresentable_nodata() {
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &[1.0_f64; 12]).unwrap();
        assert!(matches!(
            r.set_datatype(DataType::U8),
            Err(Error::InvalidDatatype(_))
        ));
    }

    #[test]
    fn test_set_datatype_and_nodata() {
        let values = [-9999.0_f64, 2.0, -9999.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &values).unwrap();
        let updated = r.set_datatype_and_nodata(DataType::I16, 100.0).unwrap();
        assert_eq!(updated.datatype(), DataType::I16);
        assert_eq!(updated.nodata(), Some(100.0));
        assert_eq!(updated.pixel(1, 0, 0).unwrap(), 100.0);
    }

    #[test]
    fn test_zeros_and_ones_overwrite_nodata_cells() {
        let values = [-9999.0_f64, 2.0, -9999.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let r = Raster::from_array(grid(), DataType::F64, Some(-9999.0), &values).unwrap();
        assert_eq!(r.zeros().pixel(1, 0, 0).unwrap(), 0.0);
        assert_eq!(r.ones().pixel(1, 0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_copy_is_equal_but_independent() {
        let r = Raster::from_array(grid(), DataType::F64, None, &[1.0_f64; 12]).unwrap();
        let mut c = r.copy();
        assert_eq!(r, c);
        c.set_band(1, Band::filled(DataType::F64, 12, 5.0)).unwrap();
        assert_ne!(r.pixel(1, 0, 0).unwrap(), c.pixel(1, 0, 0).unwrap());
    }

    #[test]
    fn test_bounding_box() {
        let r = Raster::from_array(grid(), DataType::F64, None, &[1.0_f64; 12]).unwrap();
        assert_eq!(r.bounding_box(), (0.0, 0.0, 4.0, 3.0));
    }

    #[test]
    fn test_display_mentions_metadata() {
        let r = Raster::from_array(grid(), DataType::F32, Some(-1.0), &[1.0_f64; 12]).unwrap();
        let s = r.to_string();
        assert!(s.contains("3x4"));
        assert!(s.contains("F32"));
        assert!(s.contains("EPSG:4326"));
    }
}
