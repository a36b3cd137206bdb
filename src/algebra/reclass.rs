//! Value reclassification through a lookup table

use crate::error::{Error, Result};
use crate::raster::{Band, Raster};

/// A source-value to destination-value mapping with unique keys.
///
/// Partial tables are expected: values absent from the table pass through
/// reclassification unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReclassTable {
    entries: Vec<(f64, f64)>,
}

impl ReclassTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from (source, destination) pairs; later duplicates of
    /// a key replace earlier ones.
    pub fn from_pairs<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Self {
        let mut table = Self::new();
        for (from, to) in pairs {
            table.insert(from, to);
        }
        table
    }

    /// Maps `from` to `to`, replacing any existing mapping for `from`
    pub fn insert(&mut self, from: f64, to: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == from) {
            Some(entry) => entry.1 = to,
            None => self.entries.push((from, to)),
        }
    }

    /// Looks up the destination for `value`, if mapped
    pub fn get(&self, value: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| *k == value)
            .map(|(_, v)| *v)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no mappings
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps every band's values through `table`.
///
/// Pixels whose value is not in the table pass through unchanged. Source
/// nodata pixels become `out_nodata` (which defaults to the source nodata),
/// and the output carries `out_nodata` as its sentinel.
pub fn reclassify(source: &Raster, table: &ReclassTable, out_nodata: Option<f64>) -> Result<Raster> {
    let nodata = out_nodata.or(source.nodata());
    if let Some(n) = nodata {
        if !Band::representable(source.datatype(), n) {
            return Err(Error::InvalidDatatype(format!(
                "nodata {} is not representable as {}",
                n,
                source.datatype().name()
            )));
        }
    }

    let len = source.grid().pixel_count();
    let bands = source
        .bands()
        .iter()
        .map(|band| {
            let mut out = Band::zeroed(source.datatype(), len);
            for i in 0..len {
                let v = band.get(i);
                let value = if source.is_nodata(v) {
                    nodata.unwrap_or(v)
                } else {
                    table.get(v).unwrap_or(v)
                };
                out.set(i, value);
            }
            out
        })
        .collect();
    Raster::from_bands(source.grid().clone(), source.datatype(), nodata, bands)
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

    #[test]
    fn test_table_insert_replaces() {
        let mut table = ReclassTable::new();
        table.insert(1.0, 3.0);
        table.insert(1.0, 5.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1.0), Some(5.0));
        assert_eq!(table.get(2.0), None);
    }

    #[test]
    fn test_reclass() {
        let a = factory().alternating(1.0, 2.0).unwrap();
        let table = ReclassTable::from_pairs([(1.0, 3.0), (2.0, 4.0)]);
        let b = reclassify(&a, &table, None).unwrap();
        assert_eq!(b.pixel(1, 0, 0).unwrap(), 3.0);
        assert_eq!(b.pixel(1, 0, 1).unwrap(), 4.0);
    }

    #[test]
    fn test_unmapped_values_pass_through() {
        let a = factory().alternating(1.0, 7.0).unwrap();
        let table = ReclassTable::from_pairs([(1.0, 3.0)]);
        let b = reclassify(&a, &table, None).unwrap();
        assert_eq!(b.pixel(1, 0, 0).unwrap(), 3.0);
        assert_eq!(b.pixel(1, 0, 1).unwrap(), 7.0);
    }

    #[test]
    fn test_empty_table_is_identity() {
        let a = factory().alternating(1.0, 2.0).unwrap();
        let b = reclassify(&a, &ReclassTable::new(), None).unwrap();
        assert_eq!(a.band_values(1).unwrap(), b.band_values(1).unwrap());
    }

    #[test]
    fn test_nodata_is_not_reclassed_by_table() {
        let a = factory().alternating(-9999.0, 2.0).unwrap();
        let table = ReclassTable::from_pairs([(-9999.0, 1.0)]);
        let b = reclassify(&a, &table, None).unwrap();
        // sentinel cells stay sentinel; the table only applies to data pixels
        assert_eq!(b.pixel(1, 0, 0).unwrap(), -9999.0);
    }

    #[test]
    fn test_out_nodata_substitution() {
        let a = factory().alternating(-9999.0, 2.0).unwrap();
        let b = reclassify(&a, &ReclassTable::new(), Some(-1.0)).unwrap();
        assert_eq!(b.nodata(), Some(-1.0));
        assert_eq!(b.pixel(1, 0, 0).unwrap(), -1.0);
        assert_eq!(b.pixel(1, 0, 1).unwrap(), 2.0);
    }
}
