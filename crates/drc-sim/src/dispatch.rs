//! Worker-dispatch heuristics.
//!
//! Given a station that needs a worker, decide which idle worker to take —
//! or that none qualifies right now and the request must queue on the
//! shared pool (first-come-first-serve semantics).
//!
//! The heuristics rank idle qualified workers by *flexibility* (total skills
//! held): taking the least-skilled worker keeps the highly cross-trained
//! ones free for stations only they can cover.  The modified variant first
//! looks for a worker who can start without a changeover.
//!
//! Ties are broken uniformly at random with a streaming reservoir: walk the
//! candidates once, count ties `k` at the current minimum, replace the pick
//! with probability `1/k`.  A singleton minimum draws nothing, so the
//! dispatch stream is only consumed when an actual tie exists.

use std::fmt;
use std::str::FromStr;

use drc_core::{StationId, VariateStream, WorkerId};
use drc_des::TokenPool;

use crate::error::{SimError, SimResult};
use crate::plant::Plant;
use crate::qualification::QualificationMatrix;

// ── DispatchStrategy ──────────────────────────────────────────────────────────

/// The worker-dispatch policy for a run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStrategy {
    /// No preference among qualified workers; the pool grants in request
    /// order.
    FirstComeFirstServe,
    /// Prefer the idle qualified worker with the fewest total skills.
    LeastSkillFirst,
    /// Like least-skill-first, but zero-changeover candidates come first.
    ModifiedLeastSkillFirst,
}

impl FromStr for DispatchStrategy {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s {
            "fcfs" => Ok(DispatchStrategy::FirstComeFirstServe),
            "lsf"  => Ok(DispatchStrategy::LeastSkillFirst),
            "mlsf" => Ok(DispatchStrategy::ModifiedLeastSkillFirst),
            other  => Err(SimError::Config(format!(
                "unknown dispatch strategy `{other}` (expected fcfs, lsf, or mlsf)"
            ))),
        }
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DispatchStrategy::FirstComeFirstServe     => "fcfs",
            DispatchStrategy::LeastSkillFirst         => "lsf",
            DispatchStrategy::ModifiedLeastSkillFirst => "mlsf",
        })
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Pick an idle worker for `station` per `strategy`.
///
/// `Ok(Some(w))` — claim exactly `w` from the pool.
/// `Ok(None)` — no pick; enqueue a first-come-first-serve predicate request.
/// `Err` — the station's skill is held by no worker at all: the workforce
/// was built inconsistently with the routes, which is fatal.
pub(crate) fn choose_idle_worker(
    strategy:     DispatchStrategy,
    station:      StationId,
    matrix:       &QualificationMatrix,
    plant:        &Plant,
    pool:         &TokenPool<drc_core::JobId>,
    last_station: &[StationId],
    stream:       &mut VariateStream,
) -> SimResult<Option<WorkerId>> {
    let skill = plant.station(station).skill;
    if matrix.workers_with(skill).is_empty() {
        return Err(SimError::UnschedulableStation { station, skill });
    }
    if strategy == DispatchStrategy::FirstComeFirstServe {
        return Ok(None);
    }

    let idle: Vec<WorkerId> = pool
        .idle_matching(|t| matrix.is_qualified(WorkerId::new(t), skill))
        .map(WorkerId::new)
        .collect();
    if idle.is_empty() {
        // Fall back to first-come-first-serve: request and wait.
        return Ok(None);
    }

    let pick = match strategy {
        DispatchStrategy::ModifiedLeastSkillFirst => {
            let no_changeover: Vec<WorkerId> = idle
                .iter()
                .copied()
                .filter(|&w| plant.change_time(last_station[w.index()], station) == 0.0)
                .collect();
            if no_changeover.is_empty() {
                least_skilled_uniform(&idle, matrix, stream)
            } else {
                least_skilled_uniform(&no_changeover, matrix, stream)
            }
        }
        _ => least_skilled_uniform(&idle, matrix, stream),
    };
    Ok(Some(pick))
}

/// Uniform choice among the least-skilled candidates via streaming reservoir.
fn least_skilled_uniform(
    candidates: &[WorkerId],
    matrix:     &QualificationMatrix,
    stream:     &mut VariateStream,
) -> WorkerId {
    let mut pick = candidates[0];
    let mut fewest = matrix.flexibility(pick);
    let mut ties = 1u32;
    for &w in &candidates[1..] {
        let skills = matrix.flexibility(w);
        if skills < fewest {
            pick = w;
            fewest = skills;
            ties = 1;
        } else if skills == fewest {
            ties += 1;
            if stream.uniform() < 1.0 / ties as f64 {
                pick = w;
            }
        }
    }
    pick
}
