//! Exact discrete probability distributions.
//!
//! A [`Distribution`] is an ordered list of `(value, weight)` pairs. Every
//! operation returns a new distribution; nothing is mutated in place.
//!
//! # Algebra
//!
//! | Operation | Result |
//! |---|---|
//! | [`map`](Distribution::map) | push every value through `f`, merge equal outputs |
//! | [`flat_map`](Distribution::flat_map) | monadic bind, weights multiply |
//! | [`filter`](Distribution::filter) | condition on a predicate, renormalize |
//! | [`zip`](Distribution::zip) | independent joint distribution of two |
//! | `+` / `-` | distribution of the sum / difference of independent draws |
//!
//! # Invariants
//!
//! - Weights are non-negative.
//! - Constructors and combinators return *collapsed* distributions: values
//!   are pairwise distinct and appear in first-occurrence order.
//! - Constructors normalize, so weights sum to 1 within rounding.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Add, Sub};

use crate::error::{DistributionError, Result};
use crate::stats::kahan_sum;

/// Tolerance used when comparing probability masses.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// A finite discrete probability distribution over values of type `A`.
///
/// # Examples
/// ```
/// use u_discrete::Distribution;
///
/// let coin = Distribution::uniform(["heads", "tails"]).unwrap();
/// assert_eq!(coin.probability_of(&"heads"), 0.5);
///
/// let two_coins = coin.zip(&coin);
/// assert_eq!(two_coins.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<A> {
    entries: Vec<(A, f64)>,
}

/// Merges entries sharing a value, keeping first-occurrence order.
fn collapse_entries<A, I>(entries: I) -> Vec<(A, f64)>
where
    A: Clone + Eq + Hash,
    I: IntoIterator<Item = (A, f64)>,
{
    let iter = entries.into_iter();
    let mut index: HashMap<A, usize> = HashMap::with_capacity(iter.size_hint().0);
    let mut out: Vec<(A, f64)> = Vec::with_capacity(iter.size_hint().0);
    for (value, weight) in iter {
        match index.get(&value) {
            Some(&i) => out[i].1 += weight,
            None => {
                index.insert(value.clone(), out.len());
                out.push((value, weight));
            }
        }
    }
    out
}

/// Divides every weight by the largest one when the total would overflow.
///
/// Finite non-negative weights can still sum past `f64::MAX`; after scaling
/// every weight is at most 1, so the total is bounded by the entry count.
fn fit_total_weight<A>(entries: Vec<(A, f64)>) -> Vec<(A, f64)> {
    let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
    if kahan_sum(&weights).is_finite() {
        return entries;
    }
    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 || !max.is_finite() {
        return entries;
    }
    entries.into_iter().map(|(v, w)| (v, w / max)).collect()
}

impl<A> Distribution<A> {
    /// Builds a distribution from entries that already satisfy the
    /// collapsed and normalized invariants.
    pub(crate) fn from_entries(entries: Vec<(A, f64)>) -> Self {
        Self { entries }
    }

    /// Degenerate distribution: `value` with probability 1.
    pub fn fixed(value: A) -> Self {
        Self {
            entries: vec![(value, 1.0)],
        }
    }

    /// Read-only view of the `(value, weight)` pairs in storage order.
    ///
    /// This is the export consumed by external renderers.
    pub fn weighted_values(&self) -> &[(A, f64)] {
        &self.entries
    }

    /// Iterates over `(value, weight)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&A, f64)> {
        self.entries.iter().map(|(v, w)| (v, *w))
    }

    /// Iterates over the values in storage order.
    pub fn values(&self) -> impl Iterator<Item = &A> {
        self.entries.iter().map(|(v, _)| v)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    ///
    /// Distributions produced by the public constructors are never empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights, using compensated summation.
    pub fn total_weight(&self) -> f64 {
        let weights: Vec<f64> = self.entries.iter().map(|(_, w)| *w).collect();
        kahan_sum(&weights)
    }

    /// Rescales the weights so they sum to 1.
    ///
    /// # Errors
    /// [`DistributionError::EmptyDistribution`] if the total weight is zero.
    pub fn normalize(&self) -> Result<Self>
    where
        A: Clone,
    {
        let entries = fit_total_weight(self.entries.clone());
        let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
        let total = kahan_sum(&weights);
        if total <= 0.0 || !total.is_finite() {
            return Err(DistributionError::EmptyDistribution);
        }
        Ok(Self {
            entries: entries.into_iter().map(|(v, w)| (v, w / total)).collect(),
        })
    }

    /// Total probability mass of values satisfying `pred`.
    pub fn pr<P>(&self, mut pred: P) -> f64
    where
        P: FnMut(&A) -> bool,
    {
        let matching: Vec<f64> = self
            .entries
            .iter()
            .filter(|(v, _)| pred(v))
            .map(|(_, w)| *w)
            .collect();
        kahan_sum(&matching)
    }
}

impl<A: Clone + Eq + Hash> Distribution<A> {
    /// Uniform distribution over `values`; duplicate inputs merge.
    ///
    /// Each input receives weight `1/n` where `n` counts duplicates, so
    /// `uniform([1, 1, 2])` gives `1` a mass of 2/3.
    ///
    /// # Errors
    /// [`DistributionError::EmptyDistribution`] if `values` is empty.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let d20 = Distribution::uniform(1..=20).unwrap();
    /// assert!(d20.iter().all(|(_, w)| w == 0.05));
    /// ```
    pub fn uniform<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
    {
        let values: Vec<A> = values.into_iter().collect();
        if values.is_empty() {
            return Err(DistributionError::EmptyDistribution);
        }
        let p = 1.0 / values.len() as f64;
        Ok(Self {
            entries: collapse_entries(values.into_iter().map(|v| (v, p))),
        })
    }

    /// Builds a distribution from explicit `(value, weight)` pairs.
    ///
    /// Weights need not sum to 1; the result is collapsed and normalized.
    ///
    /// # Errors
    /// - [`DistributionError::InvalidWeight`] if a weight is negative or not finite.
    /// - [`DistributionError::EmptyDistribution`] if `pairs` is empty or the
    ///   total weight is zero.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let loaded = Distribution::weighted([(1, 1.0), (6, 3.0)]).unwrap();
    /// assert!((loaded.probability_of(&6) - 0.75).abs() < 1e-12);
    /// ```
    pub fn weighted<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, f64)>,
    {
        let pairs: Vec<(A, f64)> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return Err(DistributionError::EmptyDistribution);
        }
        if let Some(&(_, weight)) = pairs.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(DistributionError::InvalidWeight { weight });
        }
        Self {
            entries: collapse_entries(fit_total_weight(pairs)),
        }
        .normalize()
    }

    /// Merges entries with equal values by summing their weights.
    ///
    /// Idempotent: collapsing a collapsed distribution changes nothing.
    pub fn collapse(&self) -> Self {
        Self {
            entries: collapse_entries(self.entries.iter().cloned()),
        }
    }

    /// Applies `f` to every value; outputs that coincide merge their mass.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let d6 = Distribution::uniform(1..=6).unwrap();
    /// let parity = d6.map(|v| v % 2 == 0);
    /// assert_eq!(parity.len(), 2);
    /// ```
    pub fn map<B, F>(&self, mut f: F) -> Distribution<B>
    where
        B: Clone + Eq + Hash,
        F: FnMut(&A) -> B,
    {
        Distribution {
            entries: collapse_entries(self.entries.iter().map(|(v, w)| (f(v), *w))),
        }
    }

    /// Fallible [`map`](Self::map): the first error aborts the transformation.
    pub fn try_map<B, E, F>(&self, mut f: F) -> std::result::Result<Distribution<B>, E>
    where
        B: Clone + Eq + Hash,
        F: FnMut(&A) -> std::result::Result<B, E>,
    {
        let mapped = self
            .entries
            .iter()
            .map(|(v, w)| f(v).map(|b| (b, *w)))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Distribution {
            entries: collapse_entries(mapped),
        })
    }

    /// Monadic bind: every `(v1, w1)` contributes `(v2, w1 * w2)` for each
    /// `(v2, w2)` in `f(v1)`.
    ///
    /// # Complexity
    /// Time: O(Σ |f(v)|) plus a hash per produced entry.
    pub fn flat_map<B, F>(&self, mut f: F) -> Distribution<B>
    where
        B: Clone + Eq + Hash,
        F: FnMut(&A) -> Distribution<B>,
    {
        let mut produced: Vec<(B, f64)> = Vec::new();
        for (v1, w1) in &self.entries {
            let inner = f(v1);
            produced.extend(inner.entries.into_iter().map(|(v2, w2)| (v2, w1 * w2)));
        }
        Distribution {
            entries: collapse_entries(produced),
        }
    }

    /// Conditions on `pred`: keeps matching entries and renormalizes.
    ///
    /// # Errors
    /// [`DistributionError::EmptyDistribution`] if no entry with positive
    /// weight satisfies `pred`.
    pub fn filter<P>(&self, mut pred: P) -> Result<Self>
    where
        P: FnMut(&A) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(v, _)| pred(v))
                .cloned()
                .collect(),
        }
        .normalize()
    }

    /// Cross product of two independent distributions, combining values with `f`.
    pub fn combine<B, C, F>(&self, other: &Distribution<B>, mut f: F) -> Distribution<C>
    where
        C: Clone + Eq + Hash,
        F: FnMut(&A, &B) -> C,
    {
        let mut produced = Vec::with_capacity(self.entries.len() * other.entries.len());
        for (a, wa) in &self.entries {
            for (b, wb) in &other.entries {
                produced.push((f(a, b), wa * wb));
            }
        }
        Distribution {
            entries: collapse_entries(produced),
        }
    }

    /// Joint distribution of independent draws from `self` and `other`.
    pub fn zip<B>(&self, other: &Distribution<B>) -> Distribution<(A, B)>
    where
        B: Clone + Eq + Hash,
    {
        self.combine(other, |a, b| (a.clone(), b.clone()))
    }

    /// [`zip`](Self::zip) followed by [`map`](Self::map) with `f`.
    pub fn zip_with<B, C, F>(&self, other: &Distribution<B>, mut f: F) -> Distribution<C>
    where
        B: Clone + Eq + Hash,
        C: Clone + Eq + Hash,
        F: FnMut(&A, &B) -> C,
    {
        self.zip(other).map(|(a, b)| f(a, b))
    }

    /// Adds `rhs` to every value.
    pub fn add_scalar(&self, rhs: A) -> Self
    where
        A: Add<Output = A>,
    {
        self.map(|v| v.clone() + rhs.clone())
    }

    /// Subtracts `rhs` from every value.
    pub fn sub_scalar(&self, rhs: A) -> Self
    where
        A: Sub<Output = A>,
    {
        self.map(|v| v.clone() - rhs.clone())
    }

    /// Probability mass assigned to `value` (0 if absent).
    pub fn probability_of(&self, value: &A) -> f64 {
        self.pr(|v| v == value)
    }

    /// Collapsed `(value, probability)` pairs in ascending value order.
    ///
    /// This is the tabular projection handed to histogram renderers.
    pub fn histogram_data(&self) -> Vec<(A, f64)>
    where
        A: Ord,
    {
        self.histogram_data_by(A::cmp)
    }

    /// Like [`histogram_data`](Self::histogram_data) with an explicit order.
    pub fn histogram_data_by<F>(&self, mut compare: F) -> Vec<(A, f64)>
    where
        F: FnMut(&A, &A) -> Ordering,
    {
        let mut rows = self.collapse().entries;
        rows.sort_by(|(a, _), (b, _)| compare(a, b));
        rows
    }

    /// Returns true if both distributions assign the same mass to every
    /// value, within `tolerance`.
    ///
    /// Storage order is ignored.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let lhs = self.collapse();
        let rhs: HashMap<A, f64> = other.collapse().entries.into_iter().collect();
        let mut seen = 0;
        for (v, w) in &lhs.entries {
            match rhs.get(v) {
                Some(&w2) => {
                    seen += 1;
                    if (w - w2).abs() > tolerance {
                        return false;
                    }
                }
                None if *w > tolerance => return false,
                None => {}
            }
        }
        // Values only present on the right must carry negligible mass.
        seen == rhs.len()
            || rhs
                .iter()
                .filter(|(v, _)| !lhs.entries.iter().any(|(l, _)| l == *v))
                .all(|(_, w)| *w <= tolerance)
    }
}

impl<A> Add for Distribution<A>
where
    A: Clone + Eq + Hash + Add<Output = A>,
{
    type Output = Distribution<A>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<'a, A> Add<&'a Distribution<A>> for &'a Distribution<A>
where
    A: Clone + Eq + Hash + Add<Output = A>,
{
    type Output = Distribution<A>;

    fn add(self, rhs: &'a Distribution<A>) -> Self::Output {
        self.combine(rhs, |a, b| a.clone() + b.clone())
    }
}

impl<A> Sub for Distribution<A>
where
    A: Clone + Eq + Hash + Sub<Output = A>,
{
    type Output = Distribution<A>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<'a, A> Sub<&'a Distribution<A>> for &'a Distribution<A>
where
    A: Clone + Eq + Hash + Sub<Output = A>,
{
    type Output = Distribution<A>;

    fn sub(self, rhs: &'a Distribution<A>) -> Self::Output {
        self.combine(rhs, |a, b| a.clone() - b.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
