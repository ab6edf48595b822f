//! Guarded random distributions
//!
//! Every statistical draw in the engine goes through this module. All
//! functions take an injectable uniform source so tests can replay exact
//! sequences, and all of them survive arbitrary parameters: a NaN, an
//! Infinity, or a non-positive scale never escapes a call here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fallback delay in milliseconds when a numeric result cannot be sanitized
pub const SAFE_DELAY_MS: f64 = 500.0;

/// Uniform-[0,1) source injected through the engine constructor.
///
/// The engine never calls a global RNG directly; everything flows through
/// this trait so statistical behavior is reproducible under a seeded source.
pub trait RandomSource: Send {
    /// Next uniform draw in [0, 1)
    fn uniform(&mut self) -> f64;

    /// Uniform draw in [lo, hi)
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return if lo.is_finite() { lo } else { 0.0 };
        }
        lo + self.uniform() * (hi - lo)
    }

    /// Uniform integer millisecond draw in [lo, hi]
    fn range_ms(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + (self.uniform() * (hi - lo + 1) as f64) as u64
    }

    /// Bernoulli draw with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        if !p.is_finite() || p <= 0.0 {
            return false;
        }
        self.uniform() < p
    }

    /// Pick an index in [0, len)
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.uniform() * len as f64) as usize).min(len - 1)
    }
}

/// Default source backed by an entropy-seeded `StdRng`
pub struct OsRandom(StdRng);

impl OsRandom {
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl Default for OsRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for OsRandom {
    fn uniform(&mut self) -> f64 {
        self.0.gen()
    }
}

/// Deterministic source for tests and replay
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.0.gen()
    }
}

/// Replace a non-finite or negative value with a fallback.
///
/// Applied at every pipeline-stage boundary so a single bad multiplication
/// cannot propagate through the rest of the stack.
pub fn sanitize(x: f64, fallback: f64) -> f64 {
    if x.is_finite() && x >= 0.0 {
        x
    } else {
        fallback
    }
}

/// Gaussian draw via the Box–Muller transform.
///
/// Uniform draws of exactly 0 or 1 are replaced with 0.5 before the
/// transform; a non-finite result collapses to `mean`.
pub fn gaussian(rng: &mut dyn RandomSource, mean: f64, stdev: f64) -> f64 {
    let mut u1 = rng.uniform();
    let mut u2 = rng.uniform();
    if u1 <= 0.0 || u1 >= 1.0 {
        u1 = 0.5;
    }
    if u2 <= 0.0 || u2 >= 1.0 {
        u2 = 0.5;
    }

    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    let out = mean + z * stdev;
    if out.is_finite() {
        out
    } else {
        mean
    }
}

/// Log-normal draw parameterized by its median
pub fn log_normal(rng: &mut dyn RandomSource, median: f64, sigma: f64) -> f64 {
    let median = if median.is_finite() && median > 0.0 {
        median
    } else {
        SAFE_DELAY_MS
    };
    let out = median * gaussian(rng, 0.0, sigma).exp();
    if out.is_finite() && out > 0.0 {
        out
    } else {
        median
    }
}

/// Exponential draw via inverse CDF
pub fn exponential(rng: &mut dyn RandomSource, lambda: f64) -> f64 {
    let lambda = if lambda.is_finite() && lambda > 0.0 {
        lambda
    } else {
        0.01
    };
    let mut u = rng.uniform();
    if u <= 0.0 || u >= 1.0 {
        u = 0.5;
    }
    let out = -(1.0 - u).ln() / lambda;
    if out.is_finite() && out >= 0.0 {
        out
    } else {
        1.0 / lambda
    }
}

/// Weibull draw via inverse CDF
pub fn weibull(rng: &mut dyn RandomSource, scale: f64, shape: f64) -> f64 {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let shape = if shape.is_finite() && shape > 0.0 {
        shape
    } else {
        1.0
    };
    let mut u = rng.uniform();
    if u <= 0.0 || u >= 1.0 {
        u = 0.5;
    }
    let out = scale * (-(1.0 - u).ln()).powf(1.0 / shape);
    if out.is_finite() && out >= 0.0 {
        out
    } else {
        scale
    }
}

/// NaN-guarded clamp; non-finite input collapses to the bound midpoint
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if !x.is_finite() {
        return (lo + hi) / 2.0;
    }
    x.clamp(lo, hi)
}

/// Linear interpolation with a clamped, NaN-guarded parameter
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    a + (b - a) * t
}

/// Hermite smoothstep between two edges
pub fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    if !x.is_finite() || edge1 == edge0 {
        return 0.5;
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
