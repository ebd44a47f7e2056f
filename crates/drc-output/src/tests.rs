//! Tests for the CSV recording backend.

use std::fs;

use drc_sim::{DispatchStrategy, NoopObserver, PlantConfig, RunConfig, Simulation, StationSpec};

use crate::csv::CsvWriter;
use crate::observer::{RunRecorder, flatten_summary};

fn line_plant() -> PlantConfig {
    PlantConfig {
        stations: vec![
            StationSpec { line: 0, skill: 0, nominal_slots: 1 },
            StationSpec { line: 0, skill: 1, nominal_slots: 1 },
            StationSpec { line: 0, skill: 2, nominal_slots: 1 },
        ],
        routes: vec![vec![0, 1, 2]],
        processing_time: 3.0,
    }
}

fn sampled_run() -> RunConfig {
    RunConfig {
        utilization: 0.1,
        order_amount: 1.0,
        worker_ratio: 1.0,
        change_ratio: 0.0,
        line_change_factor: 1.0,
        due_date_fixed: 100.0,
        due_date_variable: 0.0,
        cv_due_date: 0.0,
        cv_processing: 0.0,
        cv_arrival: 0.0,
        observation: 50.0,
        warmup: 0.0,
        sample_interval: 10.0,
        qualification: vec![true; 3],
        strategy: DispatchStrategy::FirstComeFirstServe,
        seed: 42,
    }
}

#[cfg(test)]
mod csv_files {
    use super::*;

    #[test]
    fn writer_creates_files_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvWriter::new(dir.path()).unwrap();
        use crate::writer::RecordWriter;
        writer.finish().unwrap();

        let gauges = fs::read_to_string(dir.path().join("gauge_series.csv")).unwrap();
        assert_eq!(
            gauges.lines().next().unwrap(),
            "time,wip,fgi,backorders,busy_slots,busy_workers"
        );
        let stations = fs::read_to_string(dir.path().join("station_series.csv")).unwrap();
        assert_eq!(stations.lines().next().unwrap(), "time,station,backlog,busy");
        let summary = fs::read_to_string(dir.path().join("run_summary.csv")).unwrap();
        assert_eq!(summary.lines().next().unwrap(), "metric,value");
    }

    #[test]
    fn recorder_streams_a_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut recorder = RunRecorder::new(writer);

        let mut sim = Simulation::new(&sampled_run(), &line_plant()).unwrap();
        sim.run(&mut recorder).unwrap();
        assert!(recorder.take_error().is_none());

        // 5 sampling instants (t = 10..50) on a 3-station plant.
        let gauges = fs::read_to_string(dir.path().join("gauge_series.csv")).unwrap();
        assert_eq!(gauges.lines().count(), 1 + 5);
        let stations = fs::read_to_string(dir.path().join("station_series.csv")).unwrap();
        assert_eq!(stations.lines().count(), 1 + 5 * 3);

        // Summary: 15 scalars + 3 station + 1 worker utilization rows.
        let summary = fs::read_to_string(dir.path().join("run_summary.csv")).unwrap();
        assert_eq!(summary.lines().count(), 1 + 15 + 3 + 1);
        assert!(summary.contains("service_level,1"));
    }

    #[test]
    fn sampling_disabled_writes_only_summary() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut recorder = RunRecorder::new(writer);

        let mut run = sampled_run();
        run.sample_interval = 0.0;
        let mut sim = Simulation::new(&run, &line_plant()).unwrap();
        sim.run(&mut recorder).unwrap();
        assert!(recorder.take_error().is_none());

        let gauges = fs::read_to_string(dir.path().join("gauge_series.csv")).unwrap();
        assert_eq!(gauges.lines().count(), 1, "header only");
        let summary = fs::read_to_string(dir.path().join("run_summary.csv")).unwrap();
        assert!(summary.lines().count() > 1);
    }
}

#[cfg(test)]
mod summary_rows {
    use super::*;

    #[test]
    fn flatten_covers_every_metric() {
        let mut sim = Simulation::new(&sampled_run(), &line_plant()).unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();
        let rows = flatten_summary(&summary);
        assert_eq!(rows.len(), 15 + 3 + 1);
        assert!(rows.iter().any(|r| r.metric == "lead_time_mean"));
        assert!(rows.iter().any(|r| r.metric == "station_utilization_2"));
        assert!(rows.iter().any(|r| r.metric == "worker_utilization_0"));
        // No duplicated metric names.
        let mut names: Vec<&str> = rows.iter().map(|r| r.metric.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rows.len());
    }
}
