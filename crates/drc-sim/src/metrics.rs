//! The run's collector bundle.
//!
//! All gauges and sample collectors live here, mutated only inside the
//! facility's event handlers (single-writer by construction).  The warm-up
//! cutover resets every collector while the live gauge levels carry over
//! unbroken.

use drc_core::{SampleStats, SimTime, TimeWeighted};

/// Every statistic the simulation maintains.
#[derive(Clone, Debug)]
pub struct Metrics {
    // ── Time-weighted gauges ──────────────────────────────────────────────
    /// Jobs inside the route-walking flow.
    pub wip: TimeWeighted,
    /// Completed jobs dwelling until their due date.
    pub fgi: TimeWeighted,
    /// Jobs past due and still in process.
    pub backorders: TimeWeighted,
    /// Busy machine slots, all stations together.
    pub system_busy: TimeWeighted,
    /// Busy workers.
    pub workers_busy: TimeWeighted,
    /// Jobs queued (slot or worker) per station.
    pub station_backlog: Vec<TimeWeighted>,
    /// Busy machine slots per station.
    pub station_busy: Vec<TimeWeighted>,
    /// 0/1 occupancy per worker.
    pub worker_busy: Vec<TimeWeighted>,

    // ── Sample collectors ─────────────────────────────────────────────────
    /// Arrival → flow completion.
    pub lead_time: SampleStats,
    /// Completion → delivery, 0 for late jobs.
    pub fgi_dwell: SampleStats,
    /// `max(completion − due, 0)`.
    pub tardiness: SampleStats,
    /// 1 if completed before due, else 0; mean = service level.
    pub service_level: SampleStats,
}

impl Metrics {
    /// All collectors seeded at level zero at `t = 0`.
    pub fn new(stations: usize, workers: usize) -> Self {
        let seeded = || {
            let mut g = TimeWeighted::new();
            g.update_to(SimTime::ZERO, 0.0);
            g
        };
        Metrics {
            wip:             seeded(),
            fgi:             seeded(),
            backorders:      seeded(),
            system_busy:     seeded(),
            workers_busy:    seeded(),
            station_backlog: (0..stations).map(|_| seeded()).collect(),
            station_busy:    (0..stations).map(|_| seeded()).collect(),
            worker_busy:     (0..workers).map(|_| seeded()).collect(),
            lead_time:       SampleStats::new(),
            fgi_dwell:       SampleStats::new(),
            tardiness:       SampleStats::new(),
            service_level:   SampleStats::new(),
        }
    }

    /// Warm-up cutover: discard the transient, keep the live levels.
    pub fn reset(&mut self, now: SimTime) {
        for g in self.gauges_mut() {
            g.reset(now, g.level());
        }
        self.lead_time.reset();
        self.fgi_dwell.reset();
        self.tardiness.reset();
        self.service_level.reset();
    }

    /// Integrate every gauge up to `now` (sampling instants, end of run).
    pub fn flush(&mut self, now: SimTime) {
        for g in self.gauges_mut() {
            g.flush(now);
        }
    }

    /// Current gauge levels, for observers.
    pub fn snapshot(&self) -> GaugeSnapshot {
        GaugeSnapshot {
            wip:             self.wip.level(),
            fgi:             self.fgi.level(),
            backorders:      self.backorders.level(),
            system_busy:     self.system_busy.level(),
            workers_busy:    self.workers_busy.level(),
            station_backlog: self.station_backlog.iter().map(TimeWeighted::level).collect(),
            station_busy:    self.station_busy.iter().map(TimeWeighted::level).collect(),
        }
    }

    fn gauges_mut(&mut self) -> impl Iterator<Item = &mut TimeWeighted> {
        [
            &mut self.wip,
            &mut self.fgi,
            &mut self.backorders,
            &mut self.system_busy,
            &mut self.workers_busy,
        ]
        .into_iter()
        .chain(self.station_backlog.iter_mut())
        .chain(self.station_busy.iter_mut())
        .chain(self.worker_busy.iter_mut())
    }
}

/// One sampling instant's gauge levels.
#[derive(Clone, Debug)]
pub struct GaugeSnapshot {
    pub wip:             f64,
    pub fgi:             f64,
    pub backorders:      f64,
    pub system_busy:     f64,
    pub workers_busy:    f64,
    pub station_backlog: Vec<f64>,
    pub station_busy:    Vec<f64>,
}
