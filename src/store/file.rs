//! File-backed raster store, one JSON document per raster

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::RasterGrid;
use crate::raster::Band;
use crate::store::{RasterDocument, RasterStore, StoreEntryMeta};
use crate::types::DataType;

/// Stores each raster as a JSON document under a root directory.
///
/// Identifiers map directly to `<root>/<id>.json`. Useful for fixtures that
/// must survive a process restart; not a container format.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens a store rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    fn path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn load(&self, id: &str) -> Result<RasterDocument> {
        let file = fs::File::open(self.path(id))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Store(format!("malformed raster document '{}': {}", id, e)))
    }
}

impl RasterStore for JsonStore {
    fn open(&self, id: &str) -> Result<StoreEntryMeta> {
        Ok(self.load(id)?.meta())
    }

    fn read_band(&self, id: &str, band_index: usize) -> Result<Band> {
        let doc = self.load(id)?;
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
        let doc = RasterDocument {
            grid: grid.clone(),
            datatype,
            nodata,
            bands: bands.to_vec(),
        };
        let path = self.path(id);
        debug!("json store: writing {}", path.display());
        let file = fs::File::create(&path)?;
        serde_json::to_writer(BufWriter::new(file), &doc)
            .map_err(|e| Error::Store(format!("failed to serialize '{}': {}", id, e)))
    }

    fn delete(&self, id: &str) -> Result<()> {
        fs::remove_file(self.path(id))?;
        Ok(())
    }
}
