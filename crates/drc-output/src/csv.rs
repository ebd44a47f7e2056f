//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `gauge_series.csv` — system-wide gauges per sampling instant
//! - `station_series.csv` — per-station backlog and busy slots
//! - `run_summary.csv` — end-of-run metric/value pairs

use std::fs::File;
use std::path::Path;

use ::csv::Writer;

use crate::writer::RecordWriter;
use crate::{GaugeRow, OutputResult, StationRow, SummaryRow};

/// Writes run output to three CSV files.
pub struct CsvWriter {
    gauges:   Writer<File>,
    stations: Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut gauges = Writer::from_path(dir.join("gauge_series.csv"))?;
        gauges.write_record([
            "time",
            "wip",
            "fgi",
            "backorders",
            "busy_slots",
            "busy_workers",
        ])?;

        let mut stations = Writer::from_path(dir.join("station_series.csv"))?;
        stations.write_record(["time", "station", "backlog", "busy"])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record(["metric", "value"])?;

        Ok(Self {
            gauges,
            stations,
            summary,
            finished: false,
        })
    }
}

impl RecordWriter for CsvWriter {
    fn write_gauges(&mut self, row: &GaugeRow) -> OutputResult<()> {
        self.gauges.write_record(&[
            row.time.to_string(),
            row.wip.to_string(),
            row.fgi.to_string(),
            row.backorders.to_string(),
            row.busy_slots.to_string(),
            row.busy_workers.to_string(),
        ])?;
        Ok(())
    }

    fn write_stations(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        for row in rows {
            self.stations.write_record(&[
                row.time.to_string(),
                row.station.to_string(),
                row.backlog.to_string(),
                row.busy.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary
                .write_record(&[row.metric.clone(), row.value.to_string()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.gauges.flush()?;
        self.stations.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
