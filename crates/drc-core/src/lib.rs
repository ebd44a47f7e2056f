//! `drc-core` — foundational types for the `rust_drc` flow-line simulator.
//!
//! This crate is a dependency of every other `drc-*` crate.  It has no
//! `drc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `WorkerId`, `SkillId`, `StationId`, `RouteId`, `JobId`  |
//! | [`time`]  | `SimTime` — continuous simulated time                   |
//! | [`rng`]   | `VariateStream`, `StreamKind` — seeded variate streams  |
//! | [`stats`] | `SampleStats`, `TimeWeighted` — online collectors       |
//! | [`error`] | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod stats;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{JobId, RouteId, SkillId, StationId, WorkerId};
pub use rng::{StreamKind, VariateStream};
pub use stats::{SampleStats, TimeWeighted};
pub use time::SimTime;
