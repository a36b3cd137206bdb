//! In-memory raster store

use dashmap::DashMap;
use log::debug;

use crate::error::{Error, Result};
use crate::geometry::RasterGrid;
use crate::raster::Band;
use crate::store::{RasterDocument, RasterStore, StoreEntryMeta};
use crate::types::DataType;

/// A concurrent in-memory store, the default collaborator for tests and
/// fixture pipelines that never touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, RasterDocument>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rasters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RasterStore for MemoryStore {
    fn open(&self, id: &str) -> Result<StoreEntryMeta> {
        self.entries
            .get(id)
            .map(|doc| doc.meta())
            .ok_or_else(|| Error::Store(format!("no raster stored under '{}'", id)))
    }

    fn read_band(&self, id: &str, band_index: usize) -> Result<Band> {
        let doc = self
            .entries
            .get(id)
            .ok_or_else(|| Error::Store(format!("no raster stored under '{}'", id)))?;
        if band_index == 0 || band_index > doc.bands.len() {
            return Err(Error::OutOfBounds(format!(
                "band {} of {}",
                band_index,
                doc.bands.len()
            )));
        }
        Ok(doc.bands[band_index - 1].clone())
    }

    fn write(
        &self,
        id: &str,
        grid: &RasterGrid,
        datatype: DataType,
        nodata: Option<f64>,
        bands: &[Band],
    ) -> Result<()> {
        debug!("memory store: writing '{}'", id);
        self.entries.insert(
            id.to_string(),
            RasterDocument {
                grid: grid.clone(),
                datatype,
                nodata,
                bands: bands.to_vec(),
            },
        );
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::Store(format!("no raster stored under '{}'", id)))
    }
}
