//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through a single `SimRng` seeded from the
//! run's seed, and is consumed in a fixed per-cohort, per-user,
//! per-week order. Same seed, same build => byte-identical output.
//!
//! The stream is language-local: a port to another ecosystem will
//! not reproduce these exact values, only the statistical shape.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// The random draws the retention model consumes.
///
/// Production code uses `SimRng`. Tests substitute scripted sources
/// to pin the noise term or force a re-engagement.
pub trait Draws {
    /// Uniform float in [0.0, 1.0).
    fn uniform(&mut self) -> f64;

    /// Normally distributed float.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Uniform integer in [lo, hi], both ends inclusive.
    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64;
}

/// The single seeded stream for a generation run.
pub struct SimRng {
    inner: Pcg64Mcg,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Standard normal sample (Box-Muller, cosine branch only).
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl Draws for SimRng {
    fn uniform(&mut self) -> f64 {
        self.next_f64()
    }

    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi >= lo, "empty range [{lo}, {hi}]");
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }
}
