//! The run orchestrator: wiring, warm-up, stopping condition, summary.

use drc_core::SimTime;
use drc_des::EventQueue;

use crate::config::{PlantConfig, RunConfig};
use crate::error::SimResult;
use crate::event::ModelEvent;
use crate::facility::Facility;
use crate::job::JobOutcome;
use crate::metrics::{GaugeSnapshot, Metrics};
use crate::plant::Plant;
use crate::qualification::QualificationMatrix;

// ── RunObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked at key points of a run.
///
/// All methods default to no-ops so implementors only override what they
/// care about.  Observers are the framework's observability seam — output
/// writers, progress printers, and tests all hang off it.
pub trait RunObserver {
    /// The warm-up transient ended; every collector was just reset.
    fn on_warmup_end(&mut self, _now: SimTime) {}

    /// Periodic gauge snapshot (every `sample_interval`; never called when
    /// the interval is zero).
    fn on_sample(&mut self, _now: SimTime, _snapshot: &GaugeSnapshot) {}

    /// A job left the system — delivered from finished goods on its due
    /// date, or handed over late the instant its flow finished.
    fn on_job_delivered(&mut self, _now: SimTime, _outcome: &JobOutcome) {}

    /// The observation window closed and the summary is final.
    fn on_run_end(&mut self, _now: SimTime, _summary: &RunSummary) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// End-of-run aggregate statistics over the observation window.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RunSummary {
    /// Jobs folded into the service-level statistic (delivered + unfinished).
    pub jobs_measured: u64,
    /// Jobs still mid-flow when the window closed (scored service level 0).
    pub jobs_unfinished: u64,

    pub service_level: f64,

    pub wip_mean: f64,
    pub wip_max:  f64,

    pub fgi_mean: f64,

    pub backorders_mean: f64,
    pub backorders_max:  f64,

    pub lead_time_mean: f64,
    pub lead_time_max:  f64,

    pub fgi_dwell_mean: f64,

    pub tardiness_mean: f64,
    pub tardiness_max:  f64,

    /// Busy slots over total slots, time-averaged.
    pub system_utilization: f64,
    /// Busy workers over workforce size, time-averaged.
    pub worker_utilization: f64,
    /// Per-station busy slots over that station's capacity.
    pub station_utilization: Vec<f64>,
    /// Per-worker busy fraction.
    pub per_worker_utilization: Vec<f64>,
}

impl RunSummary {
    pub(crate) fn build(
        metrics:    &Metrics,
        plant:      &Plant,
        workers:    usize,
        unfinished: usize,
    ) -> Self {
        let total_capacity: usize = (0..plant.station_count())
            .map(|s| plant.station(drc_core::StationId::new(s)).capacity)
            .sum();

        RunSummary {
            jobs_measured:   metrics.service_level.count(),
            jobs_unfinished: unfinished as u64,
            service_level:   metrics.service_level.mean(),
            wip_mean:        metrics.wip.mean(),
            wip_max:         metrics.wip.max(),
            fgi_mean:        metrics.fgi.mean(),
            backorders_mean: metrics.backorders.mean(),
            backorders_max:  metrics.backorders.max(),
            lead_time_mean:  metrics.lead_time.mean(),
            lead_time_max:   metrics.lead_time.max().unwrap_or(0.0),
            fgi_dwell_mean:  metrics.fgi_dwell.mean(),
            tardiness_mean:  metrics.tardiness.mean(),
            tardiness_max:   metrics.tardiness.max().unwrap_or(0.0),
            system_utilization: metrics.system_busy.mean() / total_capacity as f64,
            worker_utilization: metrics.workers_busy.mean() / workers as f64,
            station_utilization: metrics
                .station_busy
                .iter()
                .enumerate()
                .map(|(s, g)| {
                    g.mean() / plant.station(drc_core::StationId::new(s)).capacity as f64
                })
                .collect(),
            per_worker_utilization: metrics.worker_busy.iter().map(|g| g.mean()).collect(),
        }
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One replication: a facility plus its event queue and stopping condition.
pub struct Simulation {
    queue:           EventQueue<ModelEvent>,
    facility:        Facility,
    deadline:        SimTime,
    warmup:          f64,
    sample_interval: f64,
    started:         bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("deadline", &self.deadline)
            .field("warmup", &self.warmup)
            .field("sample_interval", &self.sample_interval)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Validate the configuration, build the plant and workforce, and wire a
    /// ready-to-run simulation.
    pub fn new(run: &RunConfig, plant_cfg: &PlantConfig) -> SimResult<Simulation> {
        run.validate()?;
        let plant = Plant::build(plant_cfg, run)?;
        let matrix = QualificationMatrix::new(run.qualification.clone(), plant.skill_count())?;
        let deadline = SimTime(run.deadline());
        let facility = Facility::new(plant, matrix, run);

        Ok(Simulation {
            queue: EventQueue::new(),
            facility,
            deadline,
            warmup: run.warmup,
            sample_interval: run.sample_interval,
            started: false,
        })
    }

    /// Seed the demand timers, the warm-up cutover, and the sampling clock.
    /// Idempotent; [`run`][Self::run] and [`step_until`][Self::step_until]
    /// call it on first use.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.facility.start(&mut self.queue);
        if self.warmup > 0.0 {
            self.queue.schedule(SimTime(self.warmup), ModelEvent::WarmupOver);
        }
        if self.sample_interval > 0.0 {
            self.queue.schedule(SimTime(self.sample_interval), ModelEvent::Sample);
        }
    }

    /// Deliver events up to `until` (clamped to the run deadline).  Useful
    /// for inspecting mid-run state; [`run`][Self::run] subsumes it.
    pub fn step_until<O: RunObserver>(&mut self, until: SimTime, obs: &mut O) -> SimResult<()> {
        self.start();
        let limit = if until > self.deadline { self.deadline } else { until };
        while let Some(event) = self.queue.pop_until(limit) {
            self.facility.handle(event, &mut self.queue, obs)?;
        }
        Ok(())
    }

    /// Drive the run to its deadline and close the books.
    pub fn run<O: RunObserver>(&mut self, obs: &mut O) -> SimResult<RunSummary> {
        self.step_until(self.deadline, obs)?;
        let now = self.queue.now();
        let summary = self.facility.finalize(now);
        obs.on_run_end(now, &summary);
        Ok(summary)
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    /// Read-only view of the facility state (metrics, registries).
    pub fn facility(&self) -> &Facility {
        &self.facility
    }
}
