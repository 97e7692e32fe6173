//! Common dice constructors.

use crate::distribution::Distribution;
use crate::error::Result;
use crate::sequence;

/// A fair die numbered `1..=sides`.
///
/// # Errors
/// [`DistributionError::EmptyDistribution`](crate::DistributionError::EmptyDistribution)
/// if `sides < 1`.
///
/// # Examples
/// ```
/// use u_discrete::dice::d;
/// assert!((d(6).unwrap().ev() - 3.5).abs() < 1e-12);
/// ```
pub fn d(sides: i64) -> Result<Distribution<i64>> {
    Distribution::uniform(1..=sides)
}

/// Sum of `count` fair dice with `sides` faces (`count`d`sides`).
///
/// Built by repeated convolution, so the intermediate state is the
/// distribution of partial sums rather than of roll sequences.
pub fn dice(count: usize, sides: i64) -> Result<Distribution<i64>> {
    let die = d(sides)?;
    let mut total = Distribution::fixed(0);
    for _ in 0..count {
        total = &total + &die;
    }
    Ok(total)
}

/// Higher of two rolls.
pub fn advantage(sides: i64) -> Result<Distribution<i64>> {
    sequence::nth(&d(sides)?.repeat(2), 1)
}

/// Lower of two rolls.
pub fn disadvantage(sides: i64) -> Result<Distribution<i64>> {
    sequence::nth(&d(sides)?.repeat(2), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DEFAULT_TOLERANCE;
    use crate::error::DistributionError;

    #[test]
    fn test_d20_flat() {
        let d20 = d(20).unwrap();
        let rows = d20.histogram_data();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|&(_, p)| p == 0.05));
    }

    #[test]
    fn test_d_zero_sides() {
        assert_eq!(d(0), Err(DistributionError::EmptyDistribution));
    }

    #[test]
    fn test_dice_matches_repeat_sum() {
        let three = dice(3, 6).unwrap();
        let via_repeat = sequence::sum(&d(6).unwrap().repeat(3));
        assert!(three.approx_eq(&via_repeat, DEFAULT_TOLERANCE));
        assert!((three.ev() - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_dice_zero_count() {
        assert_eq!(dice(0, 6).unwrap(), Distribution::fixed(0));
    }

    #[test]
    fn test_advantage_disadvantage() {
        let adv = advantage(20).unwrap();
        let dis = disadvantage(20).unwrap();
        // E[max of 2d20] = 13.825, E[min] = 7.175
        assert!((adv.ev() - 13.825).abs() < 1e-9);
        assert!((dis.ev() - 7.175).abs() < 1e-9);
        assert!((adv.pr(|&v| v >= 11) - 0.75).abs() < 1e-12);
    }
}
