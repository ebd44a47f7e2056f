//! The frozen plant: stations, routes, change-time matrix, demand rates.
//!
//! Built once from [`PlantConfig`] + the run parameters and immutable
//! afterwards.  Derivations done here:
//!
//! - **Station capacity** — the worker attends only `worker_ratio` of each
//!   job's processing, so one worker's attention spreads over `1/ratio`
//!   machine slots: `capacity = max(1, round(nominal / ratio))`.
//! - **Change-time matrix** — symmetric S×S expected changeover durations.
//!   Zero on the diagonal and between same-skill stations on the same line;
//!   `change_ratio × processing mean` between different-skill stations on
//!   one line; that times the line-change factor across lines.
//! - **Demand calibration** — equal per-route arrival rates sized so the
//!   busiest station reaches the target utilization.

use drc_core::{SkillId, StationId};

use crate::config::{PlantConfig, RunConfig};
use crate::error::{SimError, SimResult};

/// One station after derivation.
#[derive(Clone, Debug)]
pub struct Station {
    pub line:     u16,
    pub skill:    SkillId,
    /// Concurrent machine slots, already scaled by the worker ratio.
    pub capacity: usize,
}

/// The immutable plant layout for one run.
#[derive(Clone, Debug)]
pub struct Plant {
    stations:        Vec<Station>,
    routes:          Vec<Vec<StationId>>,
    /// Flattened symmetric S×S matrix, `change[from * S + to]`.
    change:          Vec<f64>,
    mean_processing: f64,
}

impl Plant {
    pub fn build(cfg: &PlantConfig, run: &RunConfig) -> SimResult<Self> {
        if cfg.stations.is_empty() {
            return Err(SimError::Config("plant has no stations".into()));
        }
        if cfg.processing_time <= 0.0 {
            return Err(SimError::Config("processing_time must be positive".into()));
        }
        if cfg.routes.is_empty() || cfg.routes.iter().any(Vec::is_empty) {
            return Err(SimError::Config("every product needs a non-empty route".into()));
        }

        let station_count = cfg.stations.len();
        let routes: Vec<Vec<StationId>> = cfg
            .routes
            .iter()
            .map(|route| {
                route
                    .iter()
                    .map(|&s| {
                        let id = StationId(s);
                        if (s as usize) < station_count {
                            Ok(id)
                        } else {
                            Err(SimError::UnknownStation { station: id })
                        }
                    })
                    .collect()
            })
            .collect::<SimResult<_>>()?;

        let stations: Vec<Station> = cfg
            .stations
            .iter()
            .map(|spec| Station {
                line:     spec.line,
                skill:    SkillId(spec.skill),
                capacity: scaled_capacity(spec.nominal_slots, run.worker_ratio),
            })
            .collect();

        let mean_processing = cfg.processing_time * run.order_amount;
        let change = change_matrix(
            &stations,
            mean_processing * run.change_ratio,
            run.line_change_factor,
        );

        Ok(Plant { stations, routes, change, mean_processing })
    }

    #[inline]
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.index()]
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn route(&self, index: usize) -> &[StationId] {
        &self.routes[index]
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Skills are numbered densely; a skill index at or above this never
    /// appears on a station.
    pub fn skill_count(&self) -> usize {
        self.stations
            .iter()
            .map(|s| s.skill.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Expected changeover duration for a worker moving `from → to`.
    ///
    /// A worker with no station history (`from == INVALID`) changes over for
    /// free — there is nothing to tear down.
    #[inline]
    pub fn change_time(&self, from: StationId, to: StationId) -> f64 {
        if from == StationId::INVALID {
            return 0.0;
        }
        self.change[from.index() * self.stations.len() + to.index()]
    }

    /// Per-station processing mean (nominal × order amount).
    #[inline]
    pub fn mean_processing(&self) -> f64 {
        self.mean_processing
    }

    /// Mean inter-arrival gap per route for a target bottleneck utilization.
    ///
    /// With one arrival process per route at a common rate λ, station `s`
    /// carries `λ · visits(s) · p` work against `capacity(s)` slots.  The
    /// busiest station binds:
    ///
    ///   λ = u · min_s capacity(s) / (visits(s) · p)
    pub fn mean_interarrival(&self, utilization: f64) -> f64 {
        let mut visits = vec![0u32; self.stations.len()];
        for route in &self.routes {
            for s in route {
                visits[s.index()] += 1;
            }
        }
        let rate = self
            .stations
            .iter()
            .zip(&visits)
            .filter(|&(_, &v)| v > 0)
            .map(|(st, &v)| st.capacity as f64 / (v as f64 * self.mean_processing))
            .fold(f64::INFINITY, f64::min);
        debug_assert!(rate.is_finite(), "no route visits any station");
        1.0 / (utilization * rate)
    }
}

/// `max(1, round(nominal / ratio))` — never below one slot, never below the
/// nominal itself for any ratio in `(0, 1]`.
fn scaled_capacity(nominal: u32, ratio: f64) -> usize {
    ((nominal as f64 / ratio).round() as usize).max(1)
}

fn change_matrix(stations: &[Station], base: f64, line_factor: f64) -> Vec<f64> {
    let n = stations.len();
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (a, b) = (&stations[i], &stations[j]);
            m[i * n + j] = if a.line != b.line {
                base * line_factor
            } else if a.skill == b.skill {
                0.0
            } else {
                base
            };
        }
    }
    m
}
