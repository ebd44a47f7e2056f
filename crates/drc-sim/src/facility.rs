//! The facility — all mutable simulation state and the event handlers that
//! advance it.
//!
//! One `Facility` owns the worker pool, the station capacity stores, the
//! in-flight job table, the backorder registry, the variate streams, and the
//! metrics bundle.  Every handler runs to completion before the next event
//! is delivered, so gauges are mutated at suspension-point boundaries only
//! and capacity accounting can never race.
//!
//! # The route-walking flow
//!
//! ```text
//! arrive ─→ [backlog+1] ─→ slot? ─→ worker? ─→ changeover? ─→ busy gauges,
//!    backlog−1 ─→ attended run ─→ release worker ─→ unattended run ─→
//!    release slot ─→ next station … ─→ flow done (lead time, tardiness)
//! ```
//!
//! The due-date timer races the flow.  Firing first backorders the job
//! (registry insert, gauge up) without disturbing the flow; firing while the
//! job dwells in finished goods delivers it.  The timer of an already
//! delivered job is simply ignored — losing a race cancels nothing.

use drc_core::{JobId, RouteId, SimTime, StationId, StreamKind, VariateStream, WorkerId};
use drc_des::{CapacityStore, EventQueue, TokenPool};

use crate::config::RunConfig;
use crate::dispatch::{DispatchStrategy, choose_idle_worker};
use crate::error::SimResult;
use crate::event::ModelEvent;
use crate::job::{Job, JobOutcome, JobPhase};
use crate::metrics::Metrics;
use crate::plant::Plant;
use crate::qualification::QualificationMatrix;
use crate::run::{RunObserver, RunSummary};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// A backordered job's registry entry: late and still in process.
#[derive(Clone, Copy, Debug)]
pub struct Backorder {
    pub arrival: SimTime,
    pub due:     SimTime,
}

struct Streams {
    arrival:    VariateStream,
    due_date:   VariateStream,
    processing: VariateStream,
    dispatch:   VariateStream,
}

impl Streams {
    fn new(seed: u64) -> Self {
        Streams {
            arrival:    VariateStream::new(seed, StreamKind::Arrival),
            due_date:   VariateStream::new(seed, StreamKind::DueDate),
            processing: VariateStream::new(seed, StreamKind::Processing),
            dispatch:   VariateStream::new(seed, StreamKind::Dispatch),
        }
    }
}

/// All mutable state of one replication.
pub struct Facility {
    plant:    Plant,
    matrix:   QualificationMatrix,
    strategy: DispatchStrategy,

    // Run parameters, copied out of the config.
    worker_ratio:    f64,
    cv_processing:   f64,
    cv_arrival:      f64,
    cv_due_date:     f64,
    due_fixed:       f64,
    due_variable:    f64,
    mean_gap:        f64,
    sample_interval: f64,

    stations:     Vec<CapacityStore<JobId>>,
    workers:      TokenPool<JobId>,
    /// Last station each worker worked at; `INVALID` before their first job.
    last_station: Vec<StationId>,

    jobs:       Map<JobId, Job>,
    backorders: Map<JobId, Backorder>,
    next_job:   u64,

    streams: Streams,
    metrics: Metrics,
}

impl Facility {
    pub(crate) fn new(plant: Plant, matrix: QualificationMatrix, run: &RunConfig) -> Self {
        let stations = (0..plant.station_count())
            .map(|s| CapacityStore::new(plant.station(StationId::new(s)).capacity))
            .collect();
        let workers = TokenPool::new(matrix.worker_count());
        let last_station = vec![StationId::INVALID; matrix.worker_count()];
        let metrics = Metrics::new(plant.station_count(), matrix.worker_count());
        let mean_gap = plant.mean_interarrival(run.utilization);

        Facility {
            matrix,
            strategy: run.strategy,
            worker_ratio: run.worker_ratio,
            cv_processing: run.cv_processing,
            cv_arrival: run.cv_arrival,
            cv_due_date: run.cv_due_date,
            due_fixed: run.due_date_fixed,
            due_variable: run.due_date_variable,
            mean_gap,
            sample_interval: run.sample_interval,
            stations,
            workers,
            last_station,
            jobs: Map::default(),
            backorders: Map::default(),
            next_job: 0,
            streams: Streams::new(run.seed),
            metrics,
            plant,
        }
    }

    /// Arm one demand timer per route.  The first job of every route arrives
    /// after a full inter-arrival gap.
    pub(crate) fn start(&mut self, q: &mut EventQueue<ModelEvent>) {
        for route in 0..self.plant.route_count() {
            let gap = self.streams.arrival.lognormal(self.mean_gap, self.cv_arrival);
            q.schedule_in(gap, ModelEvent::NextArrival { route: RouteId::new(route) });
        }
    }

    pub(crate) fn handle(
        &mut self,
        event: ModelEvent,
        q:     &mut EventQueue<ModelEvent>,
        obs:   &mut dyn RunObserver,
    ) -> SimResult<()> {
        match event {
            ModelEvent::NextArrival { route } => self.on_next_arrival(route, q),
            ModelEvent::DueDate { job } => {
                self.on_due_date(job, q, obs);
                Ok(())
            }
            ModelEvent::SlotGranted { job } => self.on_slot_granted(job, q),
            ModelEvent::WorkerGranted { job, worker } => {
                self.assign_worker(job, worker, q);
                Ok(())
            }
            ModelEvent::ChangeoverDone { job, worker } => {
                self.on_changeover_done(job, worker, q);
                Ok(())
            }
            ModelEvent::WorkerPhaseDone { job, worker } => {
                self.on_worker_phase_done(job, worker, q);
                Ok(())
            }
            ModelEvent::MachinePhaseDone { job } => self.on_machine_phase_done(job, q, obs),
            ModelEvent::WarmupOver => {
                self.metrics.reset(q.now());
                obs.on_warmup_end(q.now());
                Ok(())
            }
            ModelEvent::Sample => {
                self.metrics.flush(q.now());
                obs.on_sample(q.now(), &self.metrics.snapshot());
                q.schedule_in(self.sample_interval, ModelEvent::Sample);
                Ok(())
            }
        }
    }

    // ── Demand ────────────────────────────────────────────────────────────

    fn on_next_arrival(
        &mut self,
        route: RouteId,
        q:     &mut EventQueue<ModelEvent>,
    ) -> SimResult<()> {
        let now = q.now();
        let id = JobId(self.next_job);
        self.next_job += 1;

        let variable = if self.due_variable > 0.0 {
            self.streams.due_date.lognormal(self.due_variable, self.cv_due_date)
        } else {
            0.0
        };
        let due = now + self.due_fixed + variable;

        self.jobs.insert(id, Job {
            id,
            route,
            arrival: now,
            due,
            phase: JobPhase::AwaitingSlot { step: 0 },
        });
        q.schedule(due, ModelEvent::DueDate { job: id });

        self.metrics.wip.increase(now, 1.0);
        self.enter_step(id, 0, q)?;

        let gap = self.streams.arrival.lognormal(self.mean_gap, self.cv_arrival);
        q.schedule_in(gap, ModelEvent::NextArrival { route });
        Ok(())
    }

    // ── Route walking ─────────────────────────────────────────────────────

    /// Join the backlog of the `step`-th station and request a machine slot.
    fn enter_step(
        &mut self,
        job:  JobId,
        step: usize,
        q:    &mut EventQueue<ModelEvent>,
    ) -> SimResult<()> {
        let now = q.now();
        let station = self.station_at(job, step);
        self.metrics.station_backlog[station.index()].increase(now, 1.0);

        if self.stations[station.index()].request(job) {
            self.request_worker(job, step, q)
        } else {
            self.job_mut(job).phase = JobPhase::AwaitingSlot { step };
            Ok(())
        }
    }

    fn on_slot_granted(&mut self, job: JobId, q: &mut EventQueue<ModelEvent>) -> SimResult<()> {
        let JobPhase::AwaitingSlot { step } = self.job(job).phase else {
            unreachable!("slot granted to a job that was not waiting for one");
        };
        self.request_worker(job, step, q)
    }

    /// Slot held; pick or queue for a worker per the dispatch strategy.
    fn request_worker(
        &mut self,
        job:  JobId,
        step: usize,
        q:    &mut EventQueue<ModelEvent>,
    ) -> SimResult<()> {
        let station = self.station_at(job, step);
        let picked = choose_idle_worker(
            self.strategy,
            station,
            &self.matrix,
            &self.plant,
            &self.workers,
            &self.last_station,
            &mut self.streams.dispatch,
        )?;

        let granted = match picked {
            Some(worker) => {
                self.workers.claim(worker.index());
                Some(worker)
            }
            None => {
                let skill = self.plant.station(station).skill;
                let eligible = self.matrix.workers_with(skill).to_vec();
                self.workers
                    .request(
                        job,
                        Box::new(move |t| eligible.binary_search(&WorkerId::new(t)).is_ok()),
                    )
                    .map(WorkerId::new)
            }
        };

        match granted {
            Some(worker) => {
                self.job_mut(job).phase = JobPhase::AwaitingWorker { step };
                self.assign_worker(job, worker, q);
            }
            None => self.job_mut(job).phase = JobPhase::AwaitingWorker { step },
        }
        Ok(())
    }

    /// Worker in hand: change over if their last station demands it.
    fn assign_worker(&mut self, job: JobId, worker: WorkerId, q: &mut EventQueue<ModelEvent>) {
        let JobPhase::AwaitingWorker { step } = self.job(job).phase else {
            unreachable!("worker granted to a job that was not waiting for one");
        };
        let station = self.station_at(job, step);
        let from = self.last_station[worker.index()];
        let change = self.plant.change_time(from, station);

        if from != station && change > 0.0 {
            self.job_mut(job).phase = JobPhase::Changeover { step, worker };
            q.schedule_in(change, ModelEvent::ChangeoverDone { job, worker });
        } else {
            self.last_station[worker.index()] = station;
            self.start_processing(job, step, worker, q);
        }
    }

    fn on_changeover_done(&mut self, job: JobId, worker: WorkerId, q: &mut EventQueue<ModelEvent>) {
        let JobPhase::Changeover { step, .. } = self.job(job).phase else {
            unreachable!("changeover finished for a job not changing over");
        };
        let station = self.station_at(job, step);
        self.last_station[worker.index()] = station;
        self.start_processing(job, step, worker, q);
    }

    /// Mark station and worker active, split the processing draw, and start
    /// the attended part.
    fn start_processing(
        &mut self,
        job:    JobId,
        step:   usize,
        worker: WorkerId,
        q:      &mut EventQueue<ModelEvent>,
    ) {
        let now = q.now();
        let station = self.station_at(job, step);

        self.metrics.station_busy[station.index()].increase(now, 1.0);
        self.metrics.system_busy.increase(now, 1.0);
        self.metrics.worker_busy[worker.index()].update_to(now, 1.0);
        self.metrics.workers_busy.increase(now, 1.0);
        self.metrics.station_backlog[station.index()].decrease(now, 1.0);

        let total = self
            .streams
            .processing
            .lognormal(self.plant.mean_processing(), self.cv_processing);
        let attended = self.worker_ratio * total;
        let machine_time = total - attended;

        self.job_mut(job).phase = JobPhase::AttendedRun { step, worker, machine_time };
        q.schedule_in(attended, ModelEvent::WorkerPhaseDone { job, worker });
    }

    fn on_worker_phase_done(
        &mut self,
        job:    JobId,
        worker: WorkerId,
        q:      &mut EventQueue<ModelEvent>,
    ) {
        let now = q.now();
        let JobPhase::AttendedRun { step, machine_time, .. } = self.job(job).phase else {
            unreachable!("worker phase finished for a job not in its attended run");
        };

        self.metrics.worker_busy[worker.index()].update_to(now, 0.0);
        self.metrics.workers_busy.decrease(now, 1.0);
        if let Some((waiting, token)) = self.workers.release(worker.index()) {
            q.schedule_in(0.0, ModelEvent::WorkerGranted {
                job:    waiting,
                worker: WorkerId::new(token),
            });
        }

        self.job_mut(job).phase = JobPhase::UnattendedRun { step };
        q.schedule_in(machine_time, ModelEvent::MachinePhaseDone { job });
    }

    fn on_machine_phase_done(
        &mut self,
        job: JobId,
        q:   &mut EventQueue<ModelEvent>,
        obs: &mut dyn RunObserver,
    ) -> SimResult<()> {
        let now = q.now();
        let JobPhase::UnattendedRun { step } = self.job(job).phase else {
            unreachable!("machine phase finished for a job not in its unattended run");
        };
        let station = self.station_at(job, step);

        self.metrics.station_busy[station.index()].decrease(now, 1.0);
        self.metrics.system_busy.decrease(now, 1.0);
        if let Some(next) = self.stations[station.index()].release() {
            q.schedule_in(0.0, ModelEvent::SlotGranted { job: next });
        }

        let route_len = self.plant.route(self.job(job).route.index()).len();
        if step + 1 < route_len {
            self.enter_step(job, step + 1, q)
        } else {
            self.complete_flow(job, q, obs);
            Ok(())
        }
    }

    // ── Completion and delivery ───────────────────────────────────────────

    fn complete_flow(&mut self, job: JobId, q: &mut EventQueue<ModelEvent>, obs: &mut dyn RunObserver) {
        let now = q.now();
        self.metrics.wip.decrease(now, 1.0);

        let (arrival, due, route) = {
            let j = self.job(job);
            (j.arrival, j.due, j.route)
        };
        let lead_time = now - arrival;
        let tardiness = (now - due).max(0.0);
        self.metrics.lead_time.add(lead_time);
        self.metrics.tardiness.add(tardiness);

        if self.backorders.remove(&job).is_some() {
            // Late: the backorder clears the moment the flow finishes.
            self.metrics.service_level.add(0.0);
            self.metrics.fgi_dwell.add(0.0);
            self.metrics.backorders.decrease(now, 1.0);
            self.jobs.remove(&job);
            obs.on_job_delivered(now, &JobOutcome {
                job,
                route,
                lead_time,
                tardiness,
                on_time: false,
            });
        } else if now < due {
            // On time: dwell in finished goods until the due-date timer
            // fires and delivers.
            self.metrics.service_level.add(1.0);
            self.metrics.fgi.increase(now, 1.0);
            self.job_mut(job).phase = JobPhase::FinishedGoods { completed: now };
        } else {
            // Completed exactly at the due instant, ahead of the timer.
            self.metrics.service_level.add(0.0);
            self.metrics.fgi_dwell.add(0.0);
            self.jobs.remove(&job);
            obs.on_job_delivered(now, &JobOutcome {
                job,
                route,
                lead_time,
                tardiness,
                on_time: false,
            });
        }
    }

    fn on_due_date(&mut self, job: JobId, q: &mut EventQueue<ModelEvent>, obs: &mut dyn RunObserver) {
        let now = q.now();
        let Some((phase, route, arrival, due)) = self
            .jobs
            .get(&job)
            .map(|j| (j.phase, j.route, j.arrival, j.due))
        else {
            // Already delivered (late path); the timer has nothing to do.
            return;
        };

        match phase {
            JobPhase::FinishedGoods { completed } => {
                self.metrics.fgi.decrease(now, 1.0);
                self.metrics.fgi_dwell.add(now - completed);
                self.jobs.remove(&job);
                obs.on_job_delivered(now, &JobOutcome {
                    job,
                    route,
                    lead_time: completed - arrival,
                    tardiness: 0.0,
                    on_time: true,
                });
            }
            _ => {
                // Still in the flow: now late and in process.
                self.backorders.insert(job, Backorder { arrival, due });
                self.metrics.backorders.increase(now, 1.0);
            }
        }
    }

    // ── End of run ────────────────────────────────────────────────────────

    /// Close the books at `now`: integrate every gauge to the deadline and
    /// fold jobs still in the flow in with zero service level.
    pub(crate) fn finalize(&mut self, now: SimTime) -> RunSummary {
        self.metrics.flush(now);
        let unfinished = self.jobs.values().filter(|j| j.phase.in_flow()).count();
        for _ in 0..unfinished {
            self.metrics.service_level.add(0.0);
        }
        RunSummary::build(&self.metrics, &self.plant, self.matrix.worker_count(), unfinished)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    /// Mean inter-arrival gap each demand process was calibrated to.
    pub fn mean_gap(&self) -> f64 {
        self.mean_gap
    }

    /// Jobs currently late and still in process.
    pub fn backorder_count(&self) -> usize {
        self.backorders.len()
    }

    pub fn is_backordered(&self, job: JobId) -> bool {
        self.backorders.contains_key(&job)
    }

    /// Jobs currently inside the route-walking flow.
    pub fn jobs_in_flow(&self) -> usize {
        self.jobs.values().filter(|j| j.phase.in_flow()).count()
    }

    // ── Internal helpers ──────────────────────────────────────────────────

    fn job(&self, id: JobId) -> &Job {
        self.jobs.get(&id).expect("job alive until delivered")
    }

    fn job_mut(&mut self, id: JobId) -> &mut Job {
        self.jobs.get_mut(&id).expect("job alive until delivered")
    }

    fn station_at(&self, job: JobId, step: usize) -> StationId {
        self.plant.route(self.job(job).route.index())[step]
    }
}
