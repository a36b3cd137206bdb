//! Interpolation kernels shared by grid alignment and reprojection
//!
//! All kernels work in fractional source pixel coordinates where pixel
//! (row, col) covers [col, col+1) x [row, row+1) and has its center at
//! (col + 0.5, row + 0.5). Source nodata pixels are excluded from every
//! kernel; a kernel whose samples are all excluded yields `None`.

use crate::raster::Band;
use crate::resample::ResampleMethod;

/// Read-only view of one source band with bounds and nodata masking
pub struct SourceView<'a> {
    band: &'a Band,
    rows: usize,
    cols: usize,
    nodata: Option<f64>,
}

impl<'a> SourceView<'a> {
    pub fn new(band: &'a Band, rows: usize, cols: usize, nodata: Option<f64>) -> Self {
        Self {
            band,
            rows,
            cols,
            nodata,
        }
    }

    /// Pixel value, or `None` when out of bounds or nodata
    fn value(&self, row: i64, col: i64) -> Option<f64> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        let v = self.band.get(row as usize * self.cols + col as usize);
        match self.nodata {
            Some(n) if v == n => None,
            _ => Some(v),
        }
    }
}

/// Samples the source at fractional pixel coordinates (col_f, row_f).
///
/// `scale` is the target pixel extent measured in source pixels per axis;
/// only Average and Mode use it to size their footprint.
pub fn sample(
    view: &SourceView<'_>,
    col_f: f64,
    row_f: f64,
    method: ResampleMethod,
    scale: (f64, f64),
) -> Option<f64> {
    match method {
        ResampleMethod::Nearest => nearest(view, col_f, row_f),
        ResampleMethod::Bilinear => bilinear(view, col_f, row_f),
        ResampleMethod::Cubic => cubic(view, col_f, row_f),
        ResampleMethod::Average => footprint_reduce(view, col_f, row_f, scale, average_of),
        ResampleMethod::Mode => footprint_reduce(view, col_f, row_f, scale, mode_of),
    }
}

/// Round-half-down index of the nearest pixel center: a target center exactly
/// halfway between two source centers takes the smaller index, which breaks
/// ties toward the smaller row and then the smaller column.
fn nearest_index(t: f64) -> i64 {
    (t - 1.0).ceil() as i64
}

fn nearest(view: &SourceView<'_>, col_f: f64, row_f: f64) -> Option<f64> {
    view.value(nearest_index(row_f), nearest_index(col_f))
}

fn bilinear(view: &SourceView<'_>, col_f: f64, row_f: f64) -> Option<f64> {
    let tc = col_f - 0.5;
    let tr = row_f - 0.5;
    let c0 = tc.floor();
    let r0 = tr.floor();
    let fx = tc - c0;
    let fy = tr - r0;

    let mut acc = 0.0;
    let mut weight_sum = 0.0;
    for (dr, wy) in [(0i64, 1.0 - fy), (1, fy)] {
        for (dc, wx) in [(0i64, 1.0 - fx), (1, fx)] {
            let w = wx * wy;
            if w == 0.0 {
                continue;
            }
            if let Some(v) = view.value(r0 as i64 + dr, c0 as i64 + dc) {
                acc += w * v;
                weight_sum += w;
            }
        }
    }
    if weight_sum > 0.0 {
        Some(acc / weight_sum)
    } else {
        None
    }
}

/// Cubic convolution weight (Catmull-Rom, a = -0.5)
fn cubic_weight(t: f64) -> f64 {
    let a = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        (a + 2.0) * t * t * t - (a + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        a * t * t * t - 5.0 * a * t * t + 8.0 * a * t - 4.0 * a
    } else {
        0.0
    }
}

fn cubic(view: &SourceView<'_>, col_f: f64, row_f: f64) -> Option<f64> {
    let tc = col_f - 0.5;
    let tr = row_f - 0.5;
    let c0 = tc.floor() as i64;
    let r0 = tr.floor() as i64;
    let fx = tc - tc.floor();
    let fy = tr - tr.floor();

    let mut acc = 0.0;
    let mut weight_sum = 0.0;
    for m in -1i64..=2 {
        let wy = cubic_weight(m as f64 - fy);
        for n in -1i64..=2 {
            let w = wy * cubic_weight(n as f64 - fx);
            if w == 0.0 {
                continue;
            }
            if let Some(v) = view.value(r0 + m, c0 + n) {
                acc += w * v;
                weight_sum += w;
            }
        }
    }
    if weight_sum.abs() > 1e-12 {
        Some(acc / weight_sum)
    } else {
        None
    }
}

fn footprint_reduce(
    view: &SourceView<'_>,
    col_f: f64,
    row_f: f64,
    scale: (f64, f64),
    reduce: fn(&[f64]) -> Option<f64>,
) -> Option<f64> {
    let tc = col_f - 0.5;
    let tr = row_f - 0.5;
    let half_w = (scale.0 / 2.0).max(0.5);
    let half_h = (scale.1 / 2.0).max(0.5);

    let mut values = Vec::new();
    let r_lo = (tr - half_h).ceil() as i64;
    let r_hi = (tr + half_h).floor() as i64;
    let c_lo = (tc - half_w).ceil() as i64;
    let c_hi = (tc + half_w).floor() as i64;
    for row in r_lo..=r_hi {
        for col in c_lo..=c_hi {
            if let Some(v) = view.value(row, col) {
                values.push(v);
            }
        }
    }
    reduce(&values)
}

fn average_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Most frequent value; ties break toward the smallest value
fn mode_of(values: &[f64]) -> Option<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match counts.iter_mut().find(|(value, _)| *value == v) {
            Some(entry) => entry.1 += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best: Option<(f64, usize)> = None;
    for (value, count) in counts {
        best = match best {
            None => Some((value, count)),
            Some((bv, bc)) if count > bc || (count == bc && value < bv) => Some((value, count)),
            other => other,
        };
    }
    best.map(|(value, _)| value)
}
