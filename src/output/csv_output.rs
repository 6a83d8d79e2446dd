//! CSV table export
//!
//! The exported file is written next to its final path first and renamed
//! into place once complete, so a failed write never leaves a partial export
//! under the final name.

use crate::output::column_union;
use crate::output::traits::{OutputResult, TableSink};
use crate::record::ListingRecord;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Table sink writing CSV to any writer
pub struct CsvTableSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvTableSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.to_string()).into())
    }
}

impl<W: Write> TableSink for CsvTableSink<W> {
    fn write_table(&mut self, records: &[ListingRecord]) -> OutputResult<()> {
        let columns = column_union(records);
        if columns.is_empty() {
            return Ok(());
        }

        self.writer.write_record(&columns)?;
        for record in records {
            self.writer
                .write_record(columns.iter().map(|column| record.get(column).unwrap_or("")))?;
        }
        self.writer.flush()?;

        Ok(())
    }
}

/// Writes records to a CSV file at `path`, replacing any existing file
///
/// # Arguments
///
/// * `records` - The aggregated result set
/// * `path` - Final path of the export
///
/// # Returns
///
/// * `Ok(())` - The complete file exists at `path`
/// * `Err(OutputError)` - Nothing was written under `path`
pub fn write_csv_file(records: &[ListingRecord], path: &Path) -> OutputResult<()> {
    let partial = path.with_extension("csv.partial");

    let result: OutputResult<()> = File::create(&partial)
        .map_err(Into::into)
        .and_then(|file| {
            let mut sink = CsvTableSink::new(file);
            sink.write_table(records)?;
            sink.into_inner()?.sync_all()?;
            Ok(())
        })
        .and_then(|()| std::fs::rename(&partial, path).map_err(Into::into));

    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }

    result
}
