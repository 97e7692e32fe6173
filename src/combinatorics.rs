//! Repeated and conditional draws built on [`Distribution::flat_map`].
//!
//! | Operation | State per step | Distinct states after `n` draws from `m` values |
//! |---|---|---|
//! | [`repeat`](Distribution::repeat) | ordered sequence | up to `m^n` |
//! | [`repeat_unordered`](Distribution::repeat_unordered) | multiset (value → count) | at most `C(m + n − 1, n)` |
//!
//! Both run as explicit loops, one `flat_map` per additional draw, so the
//! call depth does not grow with `n`.

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::distribution::Distribution;
use crate::sequence;

impl<A: Clone + Eq + Hash> Distribution<A> {
    /// Distribution of `n` independent draws as ordered sequences.
    ///
    /// Permutations stay distinct: `[1, 2]` and `[2, 1]` are separate
    /// outcomes, so positional reducers such as
    /// [`sequence::nth`] see every arrangement.
    ///
    /// `repeat(0)` is the singleton distribution of the empty sequence.
    ///
    /// # Complexity
    /// O(m^n) entries for `m` distinct values.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::{sequence, Distribution};
    /// let d6 = Distribution::uniform(1..=6).unwrap();
    /// let two = d6.repeat(2);
    /// assert_eq!(two.len(), 36);
    /// let total = sequence::sum(&two);
    /// assert!((total.probability_of(&7) - 6.0 / 36.0).abs() < 1e-12);
    /// ```
    pub fn repeat(&self, n: usize) -> Distribution<Vec<A>> {
        if n == 0 {
            return Distribution::fixed(Vec::new());
        }
        let mut acc = self.map(|v| vec![v.clone()]);
        for drawn in 2..=n {
            acc = acc.flat_map(|seq| {
                self.map(|v| {
                    let mut next = Vec::with_capacity(drawn);
                    next.extend_from_slice(seq);
                    next.push(v.clone());
                    next
                })
            });
            log::trace!("repeat: {} ordered sequences after {drawn} draws", acc.len());
        }
        acc
    }

    /// Distribution of `n` independent draws, ignoring draw order.
    ///
    /// Each outcome is the ascending sequence of the drawn values. The
    /// working set holds multisets rather than sequences, so permutations
    /// merge as they are produced.
    ///
    /// `repeat_unordered(0)` is the singleton distribution of the empty sequence.
    pub fn repeat_unordered(&self, n: usize) -> Distribution<Vec<A>>
    where
        A: Ord,
    {
        if n == 0 {
            return Distribution::fixed(Vec::new());
        }
        let mut acc: Distribution<BTreeMap<A, usize>> =
            self.map(|v| BTreeMap::from([(v.clone(), 1)]));
        for drawn in 2..=n {
            acc = acc.flat_map(|counts| {
                self.map(|v| {
                    let mut next = counts.clone();
                    *next.entry(v.clone()).or_insert(0) += 1;
                    next
                })
            });
            log::trace!("repeat_unordered: {} multisets after {drawn} draws", acc.len());
        }
        let expanded = acc.map(|counts| {
            counts
                .iter()
                .flat_map(|(v, &count)| std::iter::repeat(v).take(count).cloned())
                .collect::<Vec<A>>()
        });
        sequence::sorted(&expanded)
    }

    /// Rerolls once whenever `pred` holds for the first draw.
    ///
    /// The reroll is final even if it satisfies `pred` again.
    ///
    /// # Examples
    /// ```
    /// use u_discrete::Distribution;
    /// let d6 = Distribution::uniform(1..=6).unwrap();
    /// let rerolled = d6.reroll_where(|&v| v == 1);
    /// assert!((rerolled.probability_of(&1) - 1.0 / 36.0).abs() < 1e-12);
    /// ```
    pub fn reroll_where<P>(&self, mut pred: P) -> Self
    where
        P: FnMut(&A) -> bool,
    {
        self.flat_map(|v| {
            if pred(v) {
                self.clone()
            } else {
                Distribution::fixed(v.clone())
            }
        })
    }

    /// Applies `transition` to the state `steps` times.
    ///
    /// `self` is the initial state distribution; each step replaces every
    /// state with the distribution of its successors.
    pub fn markov<F>(&self, steps: usize, mut transition: F) -> Self
    where
        F: FnMut(&A) -> Distribution<A>,
    {
        let mut state = self.clone();
        for step in 1..=steps {
            state = state.flat_map(&mut transition);
            log::trace!("markov: {} states after step {step}", state.len());
        }
        state
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::distribution::DEFAULT_TOLERANCE;
    use proptest::prelude::*;

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn unordered_state_count_bounded(m in 2_i32..6, n in 2_usize..4) {
            let d = Distribution::uniform(0..m).unwrap();
            let unordered = d.repeat_unordered(n);
            let ordered = d.repeat(n);
            let bound = binomial(m as usize + n - 1, n);
            prop_assert!(unordered.len() <= bound);
            prop_assert!(unordered.len() < ordered.len());
        }

        #[test]
        fn unordered_equals_sorted_ordered(
            pairs in proptest::collection::vec((0_i32..5, 0.01_f64..5.0), 1..6),
            n in 1_usize..4,
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            let unordered = d.repeat_unordered(n);
            let sorted = sequence::sorted(&d.repeat(n));
            prop_assert!(unordered.approx_eq(&sorted, DEFAULT_TOLERANCE));
        }

        #[test]
        fn repeat_preserves_mass(
            pairs in proptest::collection::vec((0_i32..5, 0.01_f64..5.0), 1..6),
            n in 0_usize..4,
        ) {
            let d = Distribution::weighted(pairs).unwrap();
            prop_assert!((d.repeat(n).total_weight() - 1.0).abs() < 1e-9);
        }
    }
}
