//! Summary statistics and cumulative series of a [`Distribution`].
//!
//! All quantities are exact up to floating-point rounding: they are
//! weighted sums over the distribution's entries, never estimates.
//!
//! # Algorithms
//!
//! - **Sums of weights**: Kahan compensated summation, so long tails of
//!   tiny probabilities (e.g. after [`repeat`](Distribution::repeat))
//!   are not swallowed by rounding.
//! - **Variance**: two-pass `Σ w·(x − μ)²`, avoiding the cancellation of
//!   `E[X²] − (E[X])²`.
//! - **Quantile**: smallest value whose cumulative probability reaches `p`
//!   (the generalized inverse CDF of a discrete distribution).

use std::cmp::Ordering;

use num_traits::ToPrimitive;

use crate::distribution::Distribution;

impl<A> Distribution<A> {
    /// Expected value `Σ weight · value`.
    ///
    /// Values that cannot be represented as `f64` contribute `NaN`.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let d6 = Distribution::uniform(1..=6).unwrap();
    /// assert!((d6.ev() - 3.5).abs() < 1e-12);
    /// ```
    pub fn ev(&self) -> f64
    where
        A: ToPrimitive,
    {
        self.ev_by(|v| v.to_f64().unwrap_or(f64::NAN))
    }

    /// Expected value under an explicit numeric conversion.
    pub fn ev_by<F>(&self, mut to_f64: F) -> f64
    where
        F: FnMut(&A) -> f64,
    {
        let terms: Vec<f64> = self.iter().map(|(v, w)| w * to_f64(v)).collect();
        kahan_sum(&terms)
    }

    /// Variance `Σ weight · (value − ev)²`.
    pub fn variance(&self) -> f64
    where
        A: ToPrimitive,
    {
        let to_f64 = |v: &A| v.to_f64().unwrap_or(f64::NAN);
        let mean = self.ev_by(to_f64);
        let terms: Vec<f64> = self
            .iter()
            .map(|(v, w)| {
                let d = to_f64(v) - mean;
                w * d * d
            })
            .collect();
        kahan_sum(&terms)
    }

    /// Standard deviation, `sqrt(variance)`.
    pub fn std_dev(&self) -> f64
    where
        A: ToPrimitive,
    {
        self.variance().sqrt()
    }

    /// Running prefix sums of the weights in storage order.
    ///
    /// The last cumulative probability is 1 within rounding for a
    /// normalized distribution.
    pub fn cumulative_weighted_values(&self) -> Vec<(A, f64)>
    where
        A: Clone,
    {
        prefix_sums(self.weighted_values().to_vec())
    }

    /// Running prefix sums of the weights after sorting values by `compare`.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let d = Distribution::weighted([(3, 1.0), (1, 1.0), (2, 2.0)]).unwrap();
    /// let cdf = d.cumulative_weighted_values_by(|a, b| a.cmp(b));
    /// assert_eq!(cdf[0].0, 1);
    /// assert!((cdf[1].1 - 0.75).abs() < 1e-12);
    /// ```
    pub fn cumulative_weighted_values_by<F>(&self, mut compare: F) -> Vec<(A, f64)>
    where
        A: Clone,
        F: FnMut(&A, &A) -> Ordering,
    {
        let mut entries = self.weighted_values().to_vec();
        entries.sort_by(|(a, _), (b, _)| compare(a, b));
        prefix_sums(entries)
    }

    /// Survival series `1 − F(x)` in storage order.
    pub fn inverse_cumulative_weighted_values(&self) -> Vec<(A, f64)>
    where
        A: Clone,
    {
        complement(self.cumulative_weighted_values())
    }

    /// Survival series `1 − F(x)` after sorting values by `compare`.
    pub fn inverse_cumulative_weighted_values_by<F>(&self, compare: F) -> Vec<(A, f64)>
    where
        A: Clone,
        F: FnMut(&A, &A) -> Ordering,
    {
        complement(self.cumulative_weighted_values_by(compare))
    }

    /// Smallest value `x` with `P(X <= x) >= p`.
    ///
    /// # Returns
    /// - `None` if `p` is outside `[0, 1]` or the distribution is empty.
    pub fn quantile(&self, p: f64) -> Option<A>
    where
        A: Clone + Ord,
    {
        if !(0.0..=1.0).contains(&p) {
            return None;
        }
        let cdf = self.cumulative_weighted_values_by(A::cmp);
        // Rounding can leave the final prefix sum a hair below 1.
        cdf.iter()
            .find(|(_, c)| *c >= p)
            .or_else(|| cdf.last())
            .map(|(v, _)| v.clone())
    }

    /// The 0.5 quantile.
    pub fn median(&self) -> Option<A>
    where
        A: Clone + Ord,
    {
        self.quantile(0.5)
    }

    /// Values carrying the largest weight, in storage order.
    pub fn mode(&self) -> Vec<A>
    where
        A: Clone,
    {
        let best = self
            .iter()
            .map(|(_, w)| w)
            .fold(f64::NEG_INFINITY, f64::max);
        self.iter()
            .filter(|(_, w)| *w == best)
            .map(|(v, _)| v.clone())
            .collect()
    }
}

/// Running compensated sums; the last one equals [`kahan_sum`] of the
/// same weights in the same order.
fn prefix_sums<A>(entries: Vec<(A, f64)>) -> Vec<(A, f64)> {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    entries
        .into_iter()
        .map(|(v, w)| {
            let t = sum + w;
            if sum.abs() >= w.abs() {
                c += (sum - t) + w;
            } else {
                c += (w - t) + sum;
            }
            sum = t;
            (v, sum + c)
        })
        .collect()
}

fn complement<A>(cdf: Vec<(A, f64)>) -> Vec<(A, f64)> {
    cdf.into_iter().map(|(v, c)| (v, 1.0 - c)).collect()
}

/// Kahan–Babuška compensated summation.
///
/// Achieves O(ε) error independent of `n` (vs O(nε) for naive summation).
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
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
        fn cumulative_ends_at_one(
            pairs in proptest::collection::vec((0_i32..50, 0.001_f64..100.0), 1..40),
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            let cdf = d.cumulative_weighted_values_by(i32::cmp);
            prop_assert!((cdf.last().unwrap().1 - 1.0).abs() < 1e-9);
            for pair in cdf.windows(2) {
                prop_assert!(pair[1].1 >= pair[0].1);
            }
        }

        #[test]
        fn ev_is_linear_under_shift(
            pairs in proptest::collection::vec((-50_i64..50, 0.001_f64..100.0), 1..30),
            shift in -100_i64..100,
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            let shifted = d.add_scalar(shift);
            prop_assert!((shifted.ev() - (d.ev() + shift as f64)).abs() < 1e-9);
        }

        #[test]
        fn variance_non_negative(
            pairs in proptest::collection::vec((-50_i64..50, 0.001_f64..100.0), 1..30),
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            prop_assert!(d.variance() >= -1e-12);
        }

        #[test]
        fn quantiles_monotonic(
            pairs in proptest::collection::vec((0_i32..50, 0.001_f64..100.0), 1..30),
            p1 in 0.0_f64..=1.0,
            p2 in 0.0_f64..=1.0,
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            prop_assert!(d.quantile(lo).unwrap() <= d.quantile(hi).unwrap());
        }
    }
}
