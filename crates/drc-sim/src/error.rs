//! Model error type.
//!
//! Everything here is a configuration error: the model was built
//! inconsistently and the run must not proceed (or continue).  The domain
//! has no retryable class — lateness, contention, and queueing are modeled
//! business events, not errors.

use drc_core::{CoreError, SkillId, StationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("qualification vector length {len} is not a positive multiple of skill count {skills}")]
    QualificationShape { len: usize, skills: usize },

    #[error("station {station} requires {skill} but no worker holds it")]
    UnschedulableStation {
        station: StationId,
        skill:   SkillId,
    },

    #[error("route references unknown station {station}")]
    UnknownStation { station: StationId },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
