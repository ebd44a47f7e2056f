//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous `f64` in abstract simulated-time units (the reference
//! configuration reads them as minutes, but nothing in the framework assumes
//! a unit).  The model is event-driven, so there is no tick grid: every
//! timestamp is the exact instant an event fires.
//!
//! `SimTime` wraps the raw `f64` to give it a total order (`f64::total_cmp`)
//! so timestamps can live in ordered collections such as the event heap.
//! NaN never occurs in well-formed runs — durations are drawn from
//! generators that only produce finite values — so `total_cmp`'s NaN
//! ordering is irrelevant in practice.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// An absolute instant on the simulated timeline.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Raw value in simulated-time units.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Elapsed duration from `earlier` to `self`, clamped at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// The later of two instants.
    #[inline]
    pub fn max(self, other: SimTime) -> SimTime {
        if other > self { other } else { self }
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }
}

impl AddAssign<f64> for SimTime {
    #[inline]
    fn add_assign(&mut self, delay: f64) {
        self.0 += delay;
    }
}

impl Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}
