//! Nodata-aware elementwise raster algebra
//!
//! Every binary operation gates on grid congruence and a shared nodata
//! sentinel before touching pixels. Nodata propagates: if either input pixel
//! is the sentinel, the output pixel is the sentinel. Data pixels are
//! combined in the promoted datatype of the two inputs.

pub mod reclass;

use crate::error::{Error, Result};
use crate::raster::{Band, Raster};
use crate::resample::is_aligned;
use crate::types::DataType;

fn check_compatible(a: &Raster, b: &Raster) -> Result<()> {
    if !is_aligned(a, b) {
        return Err(Error::Alignment(
            "rasters do not occupy the same pixel grid".to_string(),
        ));
    }
    if a.nodata() != b.nodata() {
        return Err(Error::IncompatibleRaster(format!(
            "nodata sentinels differ: {:?} vs {:?}",
            a.nodata(),
            b.nodata()
        )));
    }
    if a.band_count() != b.band_count() {
        return Err(Error::IncompatibleRaster(format!(
            "band counts differ: {} vs {}",
            a.band_count(),
            b.band_count()
        )));
    }
    Ok(())
}

fn apply_binary<F>(a: &Raster, b: &Raster, out_datatype: DataType, op: F) -> Result<Raster>
where
    F: Fn(f64, f64) -> f64,
{
    check_compatible(a, b)?;
    let nodata = a.nodata();
    let len = a.grid().pixel_count();
    let mut bands = Vec::with_capacity(a.band_count());
    for band_num in 1..=a.band_count() {
        let left = a.band(band_num)?;
        let right = b.band(band_num)?;
        let mut out = Band::zeroed(out_datatype, len);
        for i in 0..len {
            let lv = left.get(i);
            let rv = right.get(i);
            let value = match nodata {
                Some(n) if lv == n || rv == n => n,
                _ => op(lv, rv),
            };
            out.set(i, value);
        }
        bands.push(out);
    }
    Raster::from_bands(a.grid().clone(), out_datatype, nodata, bands)
}

/// Elementwise sum of two aligned rasters
pub fn add(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), |x, y| x + y)
}

/// Elementwise difference of two aligned rasters
pub fn sub(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), |x, y| x - y)
}

/// Elementwise product of two aligned rasters
pub fn mul(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), |x, y| x * y)
}

/// Elementwise quotient of two aligned rasters; always floating point
pub fn div(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote_float(b.datatype()), |x, y| x / y)
}

/// Elementwise power of two aligned rasters; always floating point
pub fn pow(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote_float(b.datatype()), f64::powf)
}

/// Elementwise minimum; nodata propagates from either side
pub fn minimum(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), f64::min)
}

/// Elementwise minimum that prefers the non-NaN operand
pub fn fminimum(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), |x, y| {
        if x.is_nan() {
            y
        } else if y.is_nan() {
            x
        } else {
            x.min(y)
        }
    })
}

/// Elementwise equality as 1/0 pixels; nodata propagates
pub fn eq_values(a: &Raster, b: &Raster) -> Result<Raster> {
    apply_binary(a, b, a.datatype().promote(b.datatype()), |x, y| {
        if x == y {
            1.0
        } else {
            0.0
        }
    })
}

fn scalar_datatype(raster: &Raster, value: f64, float_required: bool) -> DataType {
    let dt = raster.datatype();
    if float_required {
        dt.promote_float(dt)
    } else if dt.is_float() || (value.fract() == 0.0 && value.is_finite()) {
        dt
    } else {
        DataType::F64
    }
}

fn apply_scalar<F>(raster: &Raster, out_datatype: DataType, op: F) -> Result<Raster>
where
    F: Fn(f64) -> f64,
{
    let nodata = raster.nodata();
    let len = raster.grid().pixel_count();
    let bands = raster
        .bands()
        .iter()
        .map(|band| {
            let mut out = Band::zeroed(out_datatype, len);
            for i in 0..len {
                let v = band.get(i);
                let value = match nodata {
                    Some(n) if v == n => n,
                    _ => op(v),
                };
                out.set(i, value);
            }
            out
        })
        .collect();
    Raster::from_bands(raster.grid().clone(), out_datatype, nodata, bands)
}

/// Adds a constant to every data pixel
pub fn add_scalar(raster: &Raster, value: f64) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, false), |v| v + value)
}

/// Subtracts a constant from every data pixel
pub fn sub_scalar(raster: &Raster, value: f64) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, false), |v| v - value)
}

/// Multiplies every data pixel by a constant
pub fn mul_scalar(raster: &Raster, value: f64) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, false), |v| v * value)
}

/// Divides every data pixel by a constant; always floating point
pub fn div_scalar(raster: &Raster, value: f64) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, true), |v| v / value)
}

/// Raises every data pixel to a constant power; always floating point
pub fn pow_scalar(raster: &Raster, value: f64) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, true), |v| v.powf(value))
}

/// Subtracts every data pixel from a constant (`value - pixel`)
pub fn scalar_sub(value: f64, raster: &Raster) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, false), |v| value - v)
}

/// Divides a constant by every data pixel; always floating point
pub fn scalar_div(value: f64, raster: &Raster) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, true), |v| value / v)
}

/// Raises a constant to every data pixel; always floating point
pub fn scalar_pow(value: f64, raster: &Raster) -> Result<Raster> {
    apply_scalar(raster, scalar_datatype(raster, value, true), |v| value.powf(v))
}

fn data_pixels(raster: &Raster) -> Result<Vec<f64>> {
    let band = raster.band(1)?;
    let values: Vec<f64> = (0..band.len())
        .map(|i| band.get(i))
        .filter(|&v| !raster.is_nodata(v))
        .collect();
    Ok(values)
}

fn non_empty(raster: &Raster) -> Result<Vec<f64>> {
    let values = data_pixels(raster)?;
    if values.is_empty() {
        return Err(Error::EmptyRaster);
    }
    Ok(values)
}

/// Sum of band 1 data pixels
pub fn sum(raster: &Raster) -> Result<f64> {
    Ok(non_empty(raster)?.iter().sum())
}

/// Minimum of band 1 data pixels
pub fn min(raster: &Raster) -> Result<f64> {
    Ok(non_empty(raster)?.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Maximum of band 1 data pixels
pub fn max(raster: &Raster) -> Result<f64> {
    Ok(non_empty(raster)?
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max))
}

/// Mean of band 1 data pixels
pub fn mean(raster: &Raster) -> Result<f64> {
    let values = non_empty(raster)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation of band 1 data pixels
pub fn std(raster: &Raster) -> Result<f64> {
    let values = non_empty(raster)?;
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Sorted distinct band 1 data values; empty for an all-nodata raster
pub fn unique(raster: &Raster) -> Vec<f64> {
    let mut values = data_pixels(raster).unwrap_or_default();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}
