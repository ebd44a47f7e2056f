//! `drc-sim` — the production-scheduling model of the `rust_drc` simulator.
//!
//! A dual-resource-constrained flow line: jobs need both a machine slot and
//! a qualified worker at every route step, and the worker-dispatch policy
//! decides how well cross-training pays off.
//!
//! # Event-driven lifecycle
//!
//! ```text
//! per route:  gap ~ lognormal ─→ job spawns ─→ due-date timer races the flow
//! per step:   backlog ─→ machine slot ─→ worker (dispatch policy) ─→
//!             changeover ─→ attended run ─→ unattended run ─→ next step
//! at the end: lead time, tardiness, service level; on-time jobs dwell in
//!             finished goods until the due date delivers them
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use drc_sim::{NoopObserver, PlantConfig, RunConfig, Simulation};
//!
//! let mut sim = Simulation::new(&run_config, &plant_config)?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("service level {:.3}", summary.service_level);
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash for the job table and backorder registry.          |

pub mod config;
pub mod dispatch;
pub mod error;
pub mod facility;
pub mod job;
pub mod metrics;
pub mod plant;
pub mod qualification;
pub mod run;

mod event;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{PlantConfig, RunConfig, StationSpec};
pub use dispatch::DispatchStrategy;
pub use error::{SimError, SimResult};
pub use facility::{Backorder, Facility};
pub use job::{Job, JobOutcome, JobPhase};
pub use metrics::{GaugeSnapshot, Metrics};
pub use plant::{Plant, Station};
pub use qualification::QualificationMatrix;
pub use run::{NoopObserver, RunObserver, RunSummary, Simulation};
