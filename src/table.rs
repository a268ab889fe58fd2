//! Statistics table accumulation and persistence
//!
//! Rows accumulate in insertion order, one per (exposure, amplifier) pair,
//! and are never mutated after creation. The table is column-oriented only
//! at the serialization boundary: rows are written to and read from CSV,
//! with a missing sequence number persisted as an empty field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors from table persistence.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Statistics for one amplifier of one exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmpStatsRow {
    /// 1-based amplifier id
    pub amp: u32,
    /// Exposure sequence number from metadata; None when the field is absent
    pub tseqnum: Option<i64>,
    pub mean: f64,
    pub stdev: f64,
    pub meanclip: f64,
    pub stdevclip: f64,
}

/// Ordered collection of per-amplifier statistics rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmpStatsTable {
    rows: Vec<AmpStatsRow>,
}

impl AmpStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, preserving insertion order.
    pub fn push(&mut self, row: AmpStatsRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[AmpStatsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct amplifier ids present in the table, sorted ascending.
    pub fn amps(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.rows.iter().map(|r| r.amp).collect();
        set.into_iter().collect()
    }

    /// Rows belonging to one amplifier, in insertion order.
    pub fn rows_for_amp(&self, amp: u32) -> impl Iterator<Item = &AmpStatsRow> {
        self.rows.iter().filter(move |r| r.amp == amp)
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_path(path)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Load a table previously written by [`write_csv`](Self::write_csv).
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            rows.push(result?);
        }
        Ok(Self { rows })
    }
}

impl FromIterator<AmpStatsRow> for AmpStatsTable {
    fn from_iter<I: IntoIterator<Item = AmpStatsRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_row(amp: u32, tseqnum: Option<i64>, mean: f64) -> AmpStatsRow {
        AmpStatsRow {
            amp,
            tseqnum,
            mean,
            stdev: 0.5,
            meanclip: mean - 0.1,
            stdevclip: 0.4,
        }
    }

    #[test]
    fn test_amps_sorted_distinct() {
        let table: AmpStatsTable = [
            sample_row(3, Some(1), 10.0),
            sample_row(1, Some(1), 11.0),
            sample_row(3, Some(2), 12.0),
            sample_row(2, Some(2), 13.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.amps(), vec![1, 2, 3]);
        assert_eq!(table.rows_for_amp(3).count(), 2);
    }

    #[test]
    fn test_csv_roundtrip() {
        let table: AmpStatsTable = [
            sample_row(1, Some(20), 100.25),
            sample_row(2, None, 101.5),
            sample_row(1, Some(21), 99.75),
        ]
        .into_iter()
        .collect();

        let file = NamedTempFile::new().unwrap();
        table.write_csv(file.path()).unwrap();
        let reloaded = AmpStatsTable::read_csv(file.path()).unwrap();

        // Row order and values reproduced exactly, null tseqnum included
        assert_eq!(reloaded, table);
        assert_eq!(reloaded.rows()[1].tseqnum, None);
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(AmpStatsTable::read_csv("/no/such/path.csv").is_err());
    }
}
