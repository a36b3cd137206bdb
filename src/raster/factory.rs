//! Synthesizes rasters with deterministic content patterns

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::geometry::{AffineTransform, RasterGrid};
use crate::raster::Raster;
use crate::types::DataType;

/// Generates rasters against a fixed grid template without any storage
/// round-trip. Cheap fixture construction for geoprocessing tests.
#[derive(Debug, Clone)]
pub struct RasterFactory {
    grid: RasterGrid,
    datatype: DataType,
    nodata: Option<f64>,
}

fn linspace(v1: f64, v2: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![v1];
    }
    (0..n)
        .map(|i| v1 + (v2 - v1) * i as f64 / (n - 1) as f64)
        .collect()
}

impl RasterFactory {
    /// Creates a factory from a grid template
    pub fn new(
        crs: u32,
        datatype: DataType,
        nodata: Option<f64>,
        rows: usize,
        cols: usize,
        affine: AffineTransform,
    ) -> Result<Self> {
        let grid = RasterGrid::new(rows, cols, affine, crs)?;
        Ok(Self {
            grid,
            datatype,
            nodata,
        })
    }

    /// The template grid every generated raster carries
    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    /// The template datatype
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// The template nodata sentinel
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn create(&self, values: &[f64]) -> Result<Raster> {
        Raster::from_array(self.grid.clone(), self.datatype, self.nodata, values)
    }

    /// Every pixel set to `value`
    pub fn uniform(&self, value: f64) -> Result<Raster> {
        self.create(&vec![value; self.grid.pixel_count()])
    }

    /// Checkerboard: `(row + col)` even gets `v1`, odd gets `v2`
    pub fn alternating(&self, v1: f64, v2: f64) -> Result<Raster> {
        let cols = self.grid.cols();
        let values: Vec<f64> = (0..self.grid.pixel_count())
            .map(|i| {
                let (row, col) = (i / cols, i % cols);
                if (row + col) % 2 == 0 {
                    v1
                } else {
                    v2
                }
            })
            .collect();
        self.create(&values)
    }

    /// Linear interpolation from `v1` to `v2` across columns, every row equal
    pub fn horizontal_ramp(&self, v1: f64, v2: f64) -> Result<Raster> {
        let ramp = linspace(v1, v2, self.grid.cols());
        let values: Vec<f64> = (0..self.grid.pixel_count())
            .map(|i| ramp[i % self.grid.cols()])
            .collect();
        self.create(&values)
    }

    /// Linear interpolation from `v1` to `v2` across rows, every column equal
    pub fn vertical_ramp(&self, v1: f64, v2: f64) -> Result<Raster> {
        let ramp = linspace(v1, v2, self.grid.rows());
        let values: Vec<f64> = (0..self.grid.pixel_count())
            .map(|i| ramp[i / self.grid.cols()])
            .collect();
        self.create(&values)
    }

    /// Uniform random values in [0, 1)
    pub fn random(&self) -> Result<Raster> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Uniform random values in [0, 1) from a fixed seed
    pub fn random_seeded(&self, seed: u64) -> Result<Raster> {
        self.random_with(&mut StdRng::seed_from_u64(seed))
    }

    fn random_with<R: Rng>(&self, rng: &mut R) -> Result<Raster> {
        let values: Vec<f64> = (0..self.grid.pixel_count()).map(|_| rng.gen::<f64>()).collect();
        self.create(&values)
    }

    /// Every pixel drawn uniformly from `choices`
    pub fn random_from_list(&self, choices: &[f64]) -> Result<Raster> {
        self.random_from_list_with(choices, &mut rand::thread_rng())
    }

    /// Every pixel drawn uniformly from `choices`, from a fixed seed
    pub fn random_from_list_seeded(&self, choices: &[f64], seed: u64) -> Result<Raster> {
        self.random_from_list_with(choices, &mut StdRng::seed_from_u64(seed))
    }

    fn random_from_list_with<R: Rng>(&self, choices: &[f64], rng: &mut R) -> Result<Raster> {
        let values: Vec<f64> = (0..self.grid.pixel_count())
            .map(|_| choices[rng.gen_range(0..choices.len())])
            .collect();
        self.create(&values)
    }

    /// A 1-degree global WGS84 map, uniformly filled with 1
    pub fn sample_global_map() -> Result<Raster> {
        let affine = AffineTransform::simple(-180.0, 90.0, 1.0, 1.0)?;
        let factory = RasterFactory::new(4326, DataType::F32, Some(-9999.0), 180, 360, affine)?;
        factory.uniform(1.0)
    }

    /// A small projected area-of-interest map carrying a horizontal ramp
    pub fn sample_aoi_map(datatype: DataType) -> Result<Raster> {
        let factory = RasterFactory::new(
            32618,
            datatype,
            Some(-9999.0),
            10,
            10,
            AffineTransform::identity(),
        )?;
        factory.horizontal_ramp(1.0, 10.0)
    }
}
