//! `RunRecorder<W>` — bridges `RunObserver` to a `RecordWriter`.

use drc_core::SimTime;
use drc_sim::{GaugeSnapshot, RunObserver, RunSummary};

use crate::row::{GaugeRow, StationRow, SummaryRow};
use crate::writer::RecordWriter;
use crate::OutputError;

/// A [`RunObserver`] that streams gauge samples and the final summary into
/// any [`RecordWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, check with
/// [`take_error`][Self::take_error].
pub struct RunRecorder<W: RecordWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: RecordWriter> RunRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run finishes.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: RecordWriter> RunObserver for RunRecorder<W> {
    fn on_sample(&mut self, now: SimTime, snapshot: &GaugeSnapshot) {
        let gauges = GaugeRow {
            time:         now.value(),
            wip:          snapshot.wip,
            fgi:          snapshot.fgi,
            backorders:   snapshot.backorders,
            busy_slots:   snapshot.system_busy,
            busy_workers: snapshot.workers_busy,
        };
        let result = self.writer.write_gauges(&gauges);
        self.store_err(result);

        let stations: Vec<StationRow> = snapshot
            .station_backlog
            .iter()
            .zip(&snapshot.station_busy)
            .enumerate()
            .map(|(s, (&backlog, &busy))| StationRow {
                time: now.value(),
                station: s as u16,
                backlog,
                busy,
            })
            .collect();
        let result = self.writer.write_stations(&stations);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _now: SimTime, summary: &RunSummary) {
        let rows = flatten_summary(summary);
        let result = self.writer.write_summary(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// Explode a [`RunSummary`] into metric/value rows, one per scalar, with
/// per-station and per-worker vectors suffixed by their index.
pub fn flatten_summary(summary: &RunSummary) -> Vec<SummaryRow> {
    let mut rows = vec![
        ("jobs_measured", summary.jobs_measured as f64),
        ("jobs_unfinished", summary.jobs_unfinished as f64),
        ("service_level", summary.service_level),
        ("wip_mean", summary.wip_mean),
        ("wip_max", summary.wip_max),
        ("fgi_mean", summary.fgi_mean),
        ("backorders_mean", summary.backorders_mean),
        ("backorders_max", summary.backorders_max),
        ("lead_time_mean", summary.lead_time_mean),
        ("lead_time_max", summary.lead_time_max),
        ("fgi_dwell_mean", summary.fgi_dwell_mean),
        ("tardiness_mean", summary.tardiness_mean),
        ("tardiness_max", summary.tardiness_max),
        ("system_utilization", summary.system_utilization),
        ("worker_utilization", summary.worker_utilization),
    ]
    .into_iter()
    .map(|(metric, value)| SummaryRow { metric: metric.to_string(), value })
    .collect::<Vec<_>>();

    for (s, &u) in summary.station_utilization.iter().enumerate() {
        rows.push(SummaryRow { metric: format!("station_utilization_{s}"), value: u });
    }
    for (w, &u) in summary.per_worker_utilization.iter().enumerate() {
        rows.push(SummaryRow { metric: format!("worker_utilization_{w}"), value: u });
    }
    rows
}
