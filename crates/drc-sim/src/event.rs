//! Model events — everything that can wake the facility.
//!
//! Each variant is one suspension point resolving: a timer firing or a
//! resource grant arriving.  The facility never polls; it only reacts.

use drc_core::{JobId, RouteId, WorkerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ModelEvent {
    /// A route's demand process fires: spawn a job, re-arm the timer.
    NextArrival { route: RouteId },
    /// A job's due date elapsed.  Backorders the job if it is still in the
    /// flow; delivers it if it is dwelling in finished goods.
    DueDate { job: JobId },
    /// A station slot freed up and passed to this queued job.
    SlotGranted { job: JobId },
    /// The worker pool granted a queued request.
    WorkerGranted { job: JobId, worker: WorkerId },
    /// A worker finished changing over to the job's station.
    ChangeoverDone { job: JobId, worker: WorkerId },
    /// The worker-attended part of processing finished.
    WorkerPhaseDone { job: JobId, worker: WorkerId },
    /// The machine-only part of processing finished.
    MachinePhaseDone { job: JobId },
    /// End of the warm-up transient: reset every collector.
    WarmupOver,
    /// Periodic gauge snapshot for observers; re-arms itself.
    Sample,
}
