//! `drc-output` — file output for `rust_drc` runs.
//!
//! A [`RunRecorder`] hangs off the simulation's observer seam and streams
//! gauge samples into CSV time series, then writes the end-of-run summary.
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`row`]      | Plain row structs written by backends               |
//! | [`writer`]   | The `RecordWriter` trait                            |
//! | [`csv`]      | CSV backend (`gauge_series`, `station_series`, `run_summary`) |
//! | [`observer`] | `RunRecorder` — bridges `RunObserver` to a writer   |
//! | [`error`]    | `OutputError`, `OutputResult`                       |

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RunRecorder;
pub use row::{GaugeRow, StationRow, SummaryRow};
pub use writer::RecordWriter;
