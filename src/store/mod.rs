//! Raster store collaborator interface
//!
//! The core never assumes a particular container format; it requires only
//! the operations below to round-trip a raster. Handles are acquired per
//! operation and released before returning, never held across algebra calls.

pub mod file;
pub mod memory;

pub use file::JsonStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::RasterGrid;
use crate::raster::Band;
use crate::types::DataType;

/// Metadata returned by opening a stored raster
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntryMeta {
    pub grid: RasterGrid,
    pub datatype: DataType,
    pub nodata: Option<f64>,
    pub band_count: usize,
}

/// A complete stored raster as both reference store implementations keep it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterDocument {
    pub grid: RasterGrid,
    pub datatype: DataType,
    pub nodata: Option<f64>,
    pub bands: Vec<Band>,
}

impl RasterDocument {
    /// The open-time metadata view of this document
    pub fn meta(&self) -> StoreEntryMeta {
        StoreEntryMeta {
            grid: self.grid.clone(),
            datatype: self.datatype,
            nodata: self.nodata,
            band_count: self.bands.len(),
        }
    }
}

/// Persistence collaborator for rasters
pub trait RasterStore {
    /// Opens a stored raster and returns its metadata
    fn open(&self, id: &str) -> Result<StoreEntryMeta>;

    /// Reads one band (1-based) of a stored raster
    fn read_band(&self, id: &str, band_index: usize) -> Result<Band>;

    /// Writes a raster under `id`, replacing any existing entry
    fn write(
        &self,
        id: &str,
        grid: &RasterGrid,
        datatype: DataType,
        nodata: Option<f64>,
        bands: &[Band],
    ) -> Result<()>;

    /// Removes a stored raster
    fn delete(&self, id: &str) -> Result<()>;
}
