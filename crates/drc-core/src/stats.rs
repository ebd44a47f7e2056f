//! Online statistics collectors.
//!
//! Two kinds, both numerically stable single-pass accumulators:
//!
//! - [`SampleStats`] — discrete observations (lead times, tardiness, …)
//!   using Welford's online mean/variance update.
//! - [`TimeWeighted`] — a step function of simulated time (WIP, backlog,
//!   utilization gauges) integrated exactly between level changes, with the
//!   same Welford update weighted by elapsed duration instead of unit count.
//!
//! Reported variances are population variances (divide by count/duration,
//! not count−1): a run's observation window is the whole population being
//! summarized, not a sample of a larger one.

use crate::time::SimTime;

// ── SampleStats ───────────────────────────────────────────────────────────────

/// Min/max/mean/variance over discrete observations.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStats {
    count: u64,
    min:   f64,
    max:   f64,
    total: f64,
    mean:  f64,
    m2:    f64,
}

impl Default for SampleStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleStats {
    pub fn new() -> Self {
        SampleStats {
            count: 0,
            min:   f64::INFINITY,
            max:   f64::NEG_INFINITY,
            total: 0.0,
            mean:  0.0,
            m2:    0.0,
        }
    }

    /// Record one observation.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.total += value;

        // Welford: mean, then M2 against both the old and new mean.
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Discard all state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Smallest observation, or `None` before the first `add`.
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest observation, or `None` before the first `add`.
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Arithmetic mean; 0 before the first observation.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (`M2 / count`); 0 before the first observation.
    pub fn variance(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.m2 / self.count as f64 }
    }
}

// ── TimeWeighted ──────────────────────────────────────────────────────────────

/// Integrates a step function of simulated time.
///
/// The collector holds the current level and the timestamp of the last level
/// change.  Each update first folds the *previous* level, held over the
/// elapsed interval, into the area and the duration-weighted mean/variance,
/// then switches to the new level.  The very first observation only seeds
/// level/min/max/mean — no interval has elapsed yet.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWeighted {
    level:    f64,
    last:     SimTime,
    seeded:   bool,
    area:     f64,
    duration: f64,
    min:      f64,
    max:      f64,
    mean:     f64,
    m2:       f64,
}

impl Default for TimeWeighted {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeWeighted {
    pub fn new() -> Self {
        TimeWeighted {
            level:    0.0,
            last:     SimTime::ZERO,
            seeded:   false,
            area:     0.0,
            duration: 0.0,
            min:      0.0,
            max:      0.0,
            mean:     0.0,
            m2:       0.0,
        }
    }

    /// Record a new level at `now`.
    pub fn update_to(&mut self, now: SimTime, value: f64) {
        if !self.seeded {
            self.seeded = true;
            self.level = value;
            self.last = now;
            self.min = value;
            self.max = value;
            self.mean = value;
            return;
        }
        self.flush(now);
        self.level = value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Raise the level by `delta` at `now`.
    pub fn increase(&mut self, now: SimTime, delta: f64) {
        self.update_to(now, self.level + delta);
    }

    /// Lower the level by `delta` at `now`.
    pub fn decrease(&mut self, now: SimTime, delta: f64) {
        self.update_to(now, self.level - delta);
    }

    /// Integrate the current level up to `now` without changing it.
    ///
    /// Call at sampling instants and at the end of the observation window so
    /// the area and weighted moments cover the full elapsed time.
    pub fn flush(&mut self, now: SimTime) {
        let dt = now.since(self.last);
        if dt > 0.0 {
            self.area += self.level * dt;
            self.duration += dt;

            let delta = self.level - self.mean;
            self.mean += delta * (dt / self.duration);
            self.m2 += dt * delta * (self.level - self.mean);
        }
        self.last = now;
    }

    /// Warm-up cutover: zero area/duration/variance, keep a live level.
    ///
    /// Sets the level to `initial` (callers pass the current level to keep
    /// the step function unbroken across the reset) and restarts the
    /// timestamp at `now`, so the transient before `now` leaves no trace.
    pub fn reset(&mut self, now: SimTime, initial: f64) {
        self.level = initial;
        self.last = now;
        self.seeded = true;
        self.area = 0.0;
        self.duration = 0.0;
        self.min = initial;
        self.max = initial;
        self.mean = initial;
        self.m2 = 0.0;
    }

    /// The current level of the step function.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Integrated `level × time` since the last reset.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Time-weighted mean; equals the seed level before any time elapses.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Time-weighted population variance.
    pub fn variance(&self) -> f64 {
        if self.duration == 0.0 { 0.0 } else { self.m2 / self.duration }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
