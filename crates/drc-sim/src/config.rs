//! Run and plant configuration.
//!
//! Both structs are plain serde-friendly data (integer indices, no typed
//! IDs) so they can be read from a JSON file by an application binary and
//! validated once at simulation build time.

use crate::dispatch::DispatchStrategy;
use crate::error::{SimError, SimResult};

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// All knobs of one replication.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    /// Target utilization of the bottleneck station, in `(0, 1]`.  Demand
    /// rates are calibrated from this (see `Plant::mean_interarrival`).
    pub utilization: f64,

    /// Units per order.  Scales the per-station processing mean.
    pub order_amount: f64,

    /// Fraction of each processing duration that needs the worker present,
    /// in `(0, 1]`.  The remainder runs unattended on the machine; station
    /// capacity is scaled up by its inverse.
    pub worker_ratio: f64,

    /// Changeover mean as a fraction of the processing mean.
    pub change_ratio: f64,

    /// Multiplier on the changeover mean when the worker crosses lines.
    pub line_change_factor: f64,

    /// Fixed part of every job's due-date horizon.
    pub due_date_fixed: f64,

    /// Mean of the stochastic part of the due-date horizon (0 = none).
    pub due_date_variable: f64,

    /// Dispersion inputs of the three log-normal draws (0 = deterministic).
    pub cv_due_date:   f64,
    pub cv_processing: f64,
    pub cv_arrival:    f64,

    /// Length of the measured window, after warm-up.
    pub observation: f64,

    /// Transient discarded before measurement starts.
    pub warmup: f64,

    /// Gauge-snapshot period for observers; 0 disables sampling.
    pub sample_interval: f64,

    /// Worker-major qualification vector; length must be a positive
    /// multiple of the plant's skill count.
    pub qualification: Vec<bool>,

    /// Worker-dispatch heuristic.
    pub strategy: DispatchStrategy,

    /// Base seed; the four variate streams derive from it by fixed offsets.
    pub seed: u64,
}

impl RunConfig {
    /// Range-check every parameter.  Cross-checks against the plant (skill
    /// count, schedulability) happen when the simulation is built.
    pub fn validate(&self) -> SimResult<()> {
        fn require(ok: bool, what: &str) -> SimResult<()> {
            if ok {
                Ok(())
            } else {
                Err(SimError::Config(what.to_string()))
            }
        }

        require(
            self.utilization > 0.0 && self.utilization <= 1.0,
            "utilization must be in (0, 1]",
        )?;
        require(self.order_amount > 0.0, "order_amount must be positive")?;
        require(
            self.worker_ratio > 0.0 && self.worker_ratio <= 1.0,
            "worker_ratio must be in (0, 1]",
        )?;
        require(self.change_ratio >= 0.0, "change_ratio must be non-negative")?;
        require(
            self.line_change_factor >= 0.0,
            "line_change_factor must be non-negative",
        )?;
        require(self.due_date_fixed >= 0.0, "due_date_fixed must be non-negative")?;
        require(
            self.due_date_variable >= 0.0,
            "due_date_variable must be non-negative",
        )?;
        require(
            self.cv_due_date >= 0.0 && self.cv_processing >= 0.0 && self.cv_arrival >= 0.0,
            "coefficients of variation must be non-negative",
        )?;
        require(self.observation > 0.0, "observation must be positive")?;
        require(self.warmup >= 0.0, "warmup must be non-negative")?;
        require(
            self.sample_interval >= 0.0,
            "sample_interval must be non-negative",
        )?;
        require(!self.qualification.is_empty(), "qualification vector is empty")?;
        Ok(())
    }

    /// End of the measured window on the absolute timeline.
    pub fn deadline(&self) -> f64 {
        self.warmup + self.observation
    }
}

// ── PlantConfig ───────────────────────────────────────────────────────────────

/// One station of the plant, as configured.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StationSpec {
    /// Which line the station belongs to (changeovers across lines cost more).
    pub line: u16,
    /// The single skill required to operate this station.
    pub skill: u16,
    /// Nominal machine slots before scaling by the worker ratio.
    pub nominal_slots: u32,
}

/// Static plant description: stations, product routes, processing nominal.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlantConfig {
    pub stations: Vec<StationSpec>,
    /// One route per product: the ordered station indices it visits.
    pub routes: Vec<Vec<u16>>,
    /// Nominal per-unit processing time; the per-station mean is this times
    /// the order amount.
    pub processing_time: f64,
}
