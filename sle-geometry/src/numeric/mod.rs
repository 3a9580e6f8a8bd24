//! # Numeric Module
//!
//! Provides the [`Decimal`] scalar used by every other module and the near-zero
//! comparisons that stand in for exact equality.

pub mod helper;
pub mod math;

pub use helper::{Tolerance, is_close, near_zero};
pub use math::{DEFAULT_PRECISION, Decimal};
