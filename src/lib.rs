//! # u-discrete
//!
//! Exact discrete probability distributions for the U-Engine ecosystem.
//!
//! A [`Distribution`] stores every outcome with its probability and is
//! composed algebraically instead of being estimated by simulation. The
//! price of exactness is size: repeated draws grow the outcome space
//! exponentially.
//!
//! ## Modules
//!
//! - [`distribution`] — the [`Distribution`] type and its monadic algebra
//! - [`stats`] — expected value, variance, cumulative series, quantiles
//! - [`random`] — sampling and empirical resampling
//! - [`combinatorics`] — repeated draws, rerolls, Markov iteration
//! - [`sequence`] — reducers over distributions of sequences
//! - [`dice`] — common dice constructors
//!
//! ## Example
//!
//! ```
//! use u_discrete::{sequence, Distribution};
//!
//! let d6 = Distribution::uniform(1..=6).unwrap();
//! let ability_score = sequence::keep(&d6.repeat_unordered(4), 3).unwrap();
//! assert!(ability_score.pr(|&v| v >= 15) > 0.2);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Immutable values**: every combinator returns a new distribution
//! - **Explicit capabilities**: ordering and numeric conversion come from
//!   trait bounds or `*_by` closures, never from hidden state
//! - **Property-based testing**: algebraic laws verified via proptest

pub mod combinatorics;
pub mod dice;
pub mod distribution;
pub mod error;
pub mod random;
pub mod sequence;
pub mod stats;

pub use distribution::{Distribution, DEFAULT_TOLERANCE};
pub use error::{DistributionError, Result};
