//! Random draws from a [`Distribution`].
//!
//! Every draw is an inverse-CDF lookup: a uniform `r ∈ [0, 1)` is compared
//! against the running prefix sums of the weights, in storage order, and
//! the first value whose cumulative probability reaches `r` is returned.
//!
//! # Random source
//!
//! The plain methods ([`sample`](Distribution::sample),
//! [`sample_n`](Distribution::sample_n), [`resample`](Distribution::resample))
//! use the thread-local generator from [`rand::rng`], which can be called
//! from anywhere without passing state around. The `*_with` variants accept
//! any [`Rng`]; [`create_rng`] builds a seeded one for tests and experiments.

use std::hash::Hash;

use rand::Rng;

use crate::distribution::Distribution;
use crate::error::Result;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++). The sequence is deterministic for a
/// given seed on the same platform.
///
/// # Examples
/// ```
/// use u_discrete::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Pre-computed cumulative table for repeated draws from one distribution.
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use u_discrete::Distribution;
/// use u_discrete::random::{create_rng, Sampler};
/// let d6 = Distribution::uniform(1..=6).unwrap();
/// let sampler = Sampler::new(&d6).unwrap();
/// let mut rng = create_rng(7);
/// let roll = sampler.sample(&mut rng);
/// assert!((1..=6).contains(roll));
/// ```
#[derive(Debug, Clone)]
pub struct Sampler<'a, A> {
    entries: &'a [(A, f64)],
    cumulative: Vec<f64>,
    fallback: usize,
}

impl<'a, A> Sampler<'a, A> {
    /// Builds the cumulative table in the distribution's storage order.
    ///
    /// # Returns
    /// - `None` if the distribution has no entry with positive weight.
    pub fn new(distribution: &'a Distribution<A>) -> Option<Self> {
        let entries = distribution.weighted_values();
        let fallback = entries.iter().rposition(|(_, w)| *w > 0.0)?;
        let mut total = 0.0;
        let cumulative = entries
            .iter()
            .map(|(_, w)| {
                total += w;
                total
            })
            .collect();
        Some(Self {
            entries,
            cumulative,
            fallback,
        })
    }

    /// Draws one value.
    ///
    /// Returns the first entry with positive weight whose cumulative
    /// probability is `>= r`; rounding that leaves every prefix sum below
    /// `r` falls back to the last entry with positive weight.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &'a A {
        let r: f64 = rng.random();
        let mut i = self.cumulative.partition_point(|&c| c < r);
        while i < self.entries.len() && self.entries[i].1 <= 0.0 {
            i += 1;
        }
        if i >= self.entries.len() {
            log::warn!(
                "cumulative weight {} fell short of draw {r}; using last entry",
                self.cumulative.last().copied().unwrap_or(0.0)
            );
            i = self.fallback;
        }
        &self.entries[i].0
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Clone> Distribution<A> {
    fn sampler(&self) -> Sampler<'_, A> {
        Sampler::new(self).expect("constructed distributions carry positive mass")
    }

    /// Draws one value using the thread-local generator.
    ///
    /// The returned value always has strictly positive weight.
    pub fn sample(&self) -> A {
        self.sample_with(&mut rand::rng())
    }

    /// Draws one value using `rng`.
    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> A {
        self.sampler().sample(rng).clone()
    }

    /// Draws `n` independent values, in draw order.
    pub fn sample_n(&self, n: usize) -> Vec<A> {
        self.sample_n_with(n, &mut rand::rng())
    }

    /// Draws `n` independent values using `rng`, in draw order.
    pub fn sample_n_with<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<A> {
        let sampler = self.sampler();
        (0..n).map(|_| sampler.sample(rng).clone()).collect()
    }
}

impl<A: Clone + Eq + Hash> Distribution<A> {
    /// Empirical distribution of `n` draws.
    ///
    /// # Errors
    /// [`DistributionError::EmptyDistribution`](crate::DistributionError::EmptyDistribution)
    /// if `n` is zero.
    pub fn resample(&self, n: usize) -> Result<Self> {
        self.resample_with(n, &mut rand::rng())
    }

    /// Empirical distribution of `n` draws using `rng`.
    pub fn resample_with<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Self> {
        let draws = self.sample_n_with(n, rng);
        let empirical = Distribution::weighted(draws.into_iter().map(|v| (v, 1.0)))?;
        log::debug!(
            "resampled {n} draws into {} distinct outcomes (source had {})",
            empirical.len(),
            self.len()
        );
        Ok(empirical)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn sample_has_positive_weight(
            seed in 0_u64..10000,
            pairs in proptest::collection::vec((0_i32..20, 0.0_f64..10.0), 1..20),
        ) {
            prop_assume!(pairs.iter().any(|&(_, w)| w > 0.0));
            let d = Distribution::weighted(pairs).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                let v = d.sample_with(&mut rng);
                prop_assert!(d.probability_of(&v) > 0.0);
            }
        }
    }
}
