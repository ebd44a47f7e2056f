//! The `RecordWriter` trait implemented by backend writers.

use crate::{GaugeRow, OutputResult, StationRow, SummaryRow};

/// Sink for run output.  CSV is the shipped backend; the trait is the seam
/// through which others (SQLite, Parquet) would plug in.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with [`RunRecorder::take_error`].
///
/// [`RunRecorder::take_error`]: crate::RunRecorder::take_error
pub trait RecordWriter {
    /// Write one system-wide gauge sample.
    fn write_gauges(&mut self, row: &GaugeRow) -> OutputResult<()>;

    /// Write a batch of per-station gauge samples (one per station).
    fn write_stations(&mut self, rows: &[StationRow]) -> OutputResult<()>;

    /// Write the end-of-run summary rows.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
