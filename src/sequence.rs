//! Reducers for distributions over sequences.
//!
//! These operate on `Distribution<Vec<A>>`, the output of
//! [`Distribution::repeat`] and [`Distribution::repeat_unordered`], and
//! turn each sequence outcome into a single value. Masses of sequences
//! that reduce to the same value merge.
//!
//! Dice-pool mechanics map directly onto them:
//!
//! | Mechanic | Reducer |
//! |---|---|
//! | `3d6` | [`sum`] of `d6.repeat(3)` |
//! | `4d6` drop lowest | [`keep`]`(3)` of `d6.repeat(4)` |
//! | advantage | [`nth`]`(1)` of `d20.repeat(2)` |

use std::cmp::Ordering;
use std::hash::Hash;
use std::iter::Sum;

use crate::distribution::Distribution;
use crate::error::{DistributionError, Result};

/// Sum of the elements of each sequence.
pub fn sum<A>(d: &Distribution<Vec<A>>) -> Distribution<A>
where
    A: Clone + Eq + Hash + Sum<A>,
{
    d.map(|seq| seq.iter().cloned().sum())
}

/// Each sequence sorted ascending.
pub fn sorted<A>(d: &Distribution<Vec<A>>) -> Distribution<Vec<A>>
where
    A: Clone + Eq + Hash + Ord,
{
    sorted_by(d, A::cmp)
}

/// Each sequence sorted by `compare`.
pub fn sorted_by<A, F>(d: &Distribution<Vec<A>>, mut compare: F) -> Distribution<Vec<A>>
where
    A: Clone + Eq + Hash,
    F: FnMut(&A, &A) -> Ordering,
{
    d.map(|seq| {
        let mut seq = seq.clone();
        seq.sort_by(&mut compare);
        seq
    })
}

/// Each sequence reversed.
pub fn reverse<A>(d: &Distribution<Vec<A>>) -> Distribution<Vec<A>>
where
    A: Clone + Eq + Hash,
{
    d.map(|seq| seq.iter().rev().cloned().collect())
}

/// The `k`-th smallest element (0-based) of each sequence.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if some sequence has `k` or
/// fewer elements.
///
/// # Examples
/// ```
/// use u_discrete::{sequence, Distribution};
/// let d20 = Distribution::uniform(1..=20).unwrap();
/// let advantage = sequence::nth(&d20.repeat(2), 1).unwrap();
/// assert!(advantage.ev() > d20.ev());
/// ```
pub fn nth<A>(d: &Distribution<Vec<A>>, k: usize) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Ord,
{
    nth_by(d, k, A::cmp)
}

/// The element at 0-based index `k` of each sequence sorted by `compare`.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if some sequence has `k` or
/// fewer elements.
pub fn nth_by<A, F>(d: &Distribution<Vec<A>>, k: usize, mut compare: F) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash,
    F: FnMut(&A, &A) -> Ordering,
{
    d.try_map(|seq| {
        let mut seq = seq.clone();
        seq.sort_by(&mut compare);
        let len = seq.len();
        seq.into_iter()
            .nth(k)
            .ok_or(DistributionError::IndexOutOfRange { index: k, len })
    })
}

/// Sum of the `k` highest elements of each sequence.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if `k` exceeds a sequence's length.
pub fn keep<A>(d: &Distribution<Vec<A>>, k: usize) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Ord + Sum<A>,
{
    keep_by(d, k, A::cmp)
}

/// Sum of the `k` greatest elements of each sequence under `compare`.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if `k` exceeds a sequence's length.
pub fn keep_by<A, F>(d: &Distribution<Vec<A>>, k: usize, mut compare: F) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Sum<A>,
    F: FnMut(&A, &A) -> Ordering,
{
    keep_sorted(d, k, |a, b| compare(b, a))
}

/// Sum of the `k` lowest elements of each sequence.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if `k` exceeds a sequence's length.
pub fn keep_lowest<A>(d: &Distribution<Vec<A>>, k: usize) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Ord + Sum<A>,
{
    keep_lowest_by(d, k, A::cmp)
}

/// Sum of the `k` least elements of each sequence under `compare`.
///
/// # Errors
/// [`DistributionError::IndexOutOfRange`] if `k` exceeds a sequence's length.
pub fn keep_lowest_by<A, F>(d: &Distribution<Vec<A>>, k: usize, compare: F) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Sum<A>,
    F: FnMut(&A, &A) -> Ordering,
{
    keep_sorted(d, k, compare)
}

fn keep_sorted<A, F>(d: &Distribution<Vec<A>>, k: usize, mut compare: F) -> Result<Distribution<A>>
where
    A: Clone + Eq + Hash + Sum<A>,
    F: FnMut(&A, &A) -> Ordering,
{
    d.try_map(|seq| {
        if k > seq.len() {
            return Err(DistributionError::IndexOutOfRange {
                index: k,
                len: seq.len(),
            });
        }
        let mut seq = seq.clone();
        seq.sort_by(&mut compare);
        Ok(seq.into_iter().take(k).sum())
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DEFAULT_TOLERANCE;

    fn d(sides: i64) -> Distribution<i64> {
        Distribution::uniform(1..=sides).unwrap()
    }

    #[test]
    fn test_sum_2d6() {
        let total = sum(&d(6).repeat(2));
        assert_eq!(total.len(), 11);
        assert!((total.probability_of(&2) - 1.0 / 36.0).abs() < 1e-12);
        assert!((total.probability_of(&12) - 1.0 / 36.0).abs() < 1e-12);
        assert!((total.probability_of(&7) - 6.0 / 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_and_reverse() {
        let pairs = d(3).repeat(2);
        let asc = sorted(&pairs);
        assert!((asc.probability_of(&vec![1, 3]) - 2.0 / 9.0).abs() < 1e-12);
        assert_eq!(asc.probability_of(&vec![3, 1]), 0.0);
        let desc = reverse(&asc);
        assert!((desc.probability_of(&vec![3, 1]) - 2.0 / 9.0).abs() < 1e-12);
        let desc_by = sorted_by(&pairs, |a, b| b.cmp(a));
        assert!(desc_by.approx_eq(&desc, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_nth_min_and_max() {
        let pairs = d(6).repeat(2);
        let low = nth(&pairs, 0).unwrap();
        let high = nth(&pairs, 1).unwrap();
        // P(max = 6) = 11/36, P(min = 1) = 11/36
        assert!((high.probability_of(&6) - 11.0 / 36.0).abs() < 1e-12);
        assert!((low.probability_of(&1) - 11.0 / 36.0).abs() < 1e-12);
        assert!((low.ev() + high.ev() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_nth_out_of_range() {
        let pairs = d(6).repeat(2);
        assert_eq!(
            nth(&pairs, 2),
            Err(DistributionError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_keep_highest_three_of_four() {
        let stat = keep(&d(6).repeat_unordered(4), 3).unwrap();
        assert_eq!(stat.values().copied().min(), Some(3));
        assert_eq!(stat.values().copied().max(), Some(18));
        // Known mean of 4d6 drop lowest.
        assert!((stat.ev() - 12.2446).abs() < 1e-4, "ev = {}", stat.ev());
    }

    #[test]
    fn test_keep_lowest() {
        let low = keep_lowest(&d(6).repeat(2), 1).unwrap();
        let min = nth(&d(6).repeat(2), 0).unwrap();
        assert!(low.approx_eq(&min, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_keep_all_is_sum() {
        let pool = d(4).repeat(3);
        let kept = keep(&pool, 3).unwrap();
        assert!(kept.approx_eq(&sum(&pool), DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_nth_by_reversed_order() {
        let pairs = d(6).repeat(2);
        let high = nth_by(&pairs, 0, |a: &i64, b: &i64| b.cmp(a)).unwrap();
        assert!(high.approx_eq(&nth(&pairs, 1).unwrap(), DEFAULT_TOLERANCE));
        assert_eq!(
            nth_by(&pairs, 2, |a: &i64, b: &i64| b.cmp(a)),
            Err(DistributionError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_keep_by_magnitude() {
        // Faces -3..=3, ranked by magnitude rather than signed order.
        let pool = Distribution::uniform(-3_i64..=3).unwrap().repeat(2);
        let by_abs = |a: &i64, b: &i64| a.abs().cmp(&b.abs());
        let loud = keep_by(&pool, 1, by_abs).unwrap();
        let quiet = keep_lowest_by(&pool, 1, by_abs).unwrap();
        assert!(loud.probability_of(&-3) > 0.0);
        assert_eq!(quiet.values().map(|v| v.abs()).max(), Some(3));
        assert!((loud.probability_of(&0) - 1.0 / 49.0).abs() < 1e-12);
        assert!((quiet.probability_of(&0) - 13.0 / 49.0).abs() < 1e-12);
        assert!(keep_by(&pool, 3, by_abs).is_err());
    }

    #[test]
    fn test_by_variants_match_ord() {
        let pool = d(4).repeat(3);
        for k in 0..=3 {
            let high = keep_by(&pool, k, i64::cmp).unwrap();
            let low = keep_lowest_by(&pool, k, i64::cmp).unwrap();
            assert!(high.approx_eq(&keep(&pool, k).unwrap(), DEFAULT_TOLERANCE));
            assert!(low.approx_eq(&keep_lowest(&pool, k).unwrap(), DEFAULT_TOLERANCE));
        }
    }

    #[test]
    fn test_keep_too_many() {
        let pool = d(6).repeat(2);
        assert_eq!(
            keep(&pool, 3),
            Err(DistributionError::IndexOutOfRange { index: 3, len: 2 })
        );
        assert!(keep_lowest(&pool, 3).is_err());
    }
}
