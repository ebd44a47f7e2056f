//! Deterministic variate streams.
//!
//! # Determinism strategy
//!
//! Each stochastic concern of the model draws from its own independent
//! `SmallRng`, seeded by:
//!
//!   seed = base_seed XOR (stream_offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.
//! Because the streams never share state, changing how many values one
//! concern consumes (e.g. switching dispatch policy, which draws tie-breaks
//! at a different rate) does not perturb any other concern's sequence.
//!
//! # Variate algorithms
//!
//! The normal generator is ratio-of-uniforms rejection sampling, and the
//! algorithm itself is part of the contract: given the same uniform stream it
//! must reproduce the reference sequence bit for bit, so it must not be
//! swapped for another normal method (Box–Muller, ziggurat, `rand_distr`).
//!
//! The log-normal parameterization folds the target mean into its dispersion
//! input (`alpha = sqrt(mu·sigma)/mu`); the input behaves like variance/mean
//! rather than a literal coefficient of variation.  Kept deliberately —
//! changing it would change every simulated outcome.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── StreamKind ────────────────────────────────────────────────────────────────

/// The four independent stochastic concerns of a run, with fixed seed offsets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamKind {
    /// Inter-arrival gaps of the demand processes.
    Arrival,
    /// Variable part of each job's due-date horizon.
    DueDate,
    /// Station processing durations.
    Processing,
    /// Uniform tie-breaks inside the dispatch engine.
    Dispatch,
}

impl StreamKind {
    /// Fixed, documented seed offset.  Part of the reproducibility contract.
    #[inline]
    pub fn offset(self) -> u64 {
        match self {
            StreamKind::Arrival    => 0,
            StreamKind::DueDate    => 1,
            StreamKind::Processing => 2,
            StreamKind::Dispatch   => 3,
        }
    }
}

// ── VariateStream ─────────────────────────────────────────────────────────────

/// One seeded stream of random variates.
///
/// Create all four at run start via [`VariateStream::new`]; the type is
/// deliberately `!Sync` (the model is single-threaded by construction).
pub struct VariateStream {
    rng: SmallRng,
}

impl VariateStream {
    /// Seed deterministically from the run's base seed and the stream's kind.
    pub fn new(base_seed: u64, kind: StreamKind) -> Self {
        let seed = base_seed ^ kind.offset().wrapping_mul(MIXING_CONSTANT);
        VariateStream { rng: SmallRng::seed_from_u64(seed) }
    }

    /// A uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Normal variate via ratio-of-uniforms rejection sampling.
    ///
    /// Draw `u1 ~ U(0,1)` and `u2 = 1 − U(0,1)` (so `u2 ∈ (0,1]`), form
    /// `z = k·(u1 − ½)/u2` with `k = 4·e^(−½)/√2`, and accept when
    /// `z²/4 ≤ −ln u2`.  Expected draws per accept ≈ 1.37.
    pub fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let k = 4.0 * (-0.5f64).exp() / std::f64::consts::SQRT_2;
        loop {
            let u1: f64 = self.rng.r#gen();
            let u2: f64 = 1.0 - self.rng.r#gen::<f64>();
            let z = k * (u1 - 0.5) / u2;
            if z * z / 4.0 <= -u2.ln() {
                return mu + z * sigma;
            }
        }
    }

    /// Log-normal variate with target mean `mu` and dispersion input `sigma`.
    ///
    /// `sigma == 0` returns exactly `mu` without touching the stream —
    /// callers use this to model deterministic processing or due-date slack.
    pub fn lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        if sigma == 0.0 {
            return mu;
        }
        let alpha = (mu * sigma).sqrt() / mu;
        let sigma_ln = (1.0 + alpha * alpha).ln().sqrt();
        let mu_ln = mu.ln() - 0.5 * sigma_ln * sigma_ln;
        self.normal(mu_ln, sigma_ln).exp()
    }
}
