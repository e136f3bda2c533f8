//! Technical indicator implementations.
//!
//! Everything in here is pure: inputs are borrowed, outputs are freshly
//! allocated, and no state is kept between calls.

pub mod aligner;
pub mod fibonacci;
pub mod sma;

pub use aligner::{align, align_sma};
pub use fibonacci::{compute_fibonacci_levels, price_range};
pub use sma::{compute_sma, Sma};

use crate::types::{IndicatorId, IndicatorSeries, PricePoint};
use thiserror::Error;

/// Errors raised by indicator construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Invalid period {0}: must be at least 1")]
    InvalidPeriod(usize),
}

/// Trait for timeline-aligned overlay indicators.
pub trait Indicator: Send + Sync {
    /// Identifier of the series this indicator produces.
    fn id(&self) -> IndicatorId;

    /// Compute one value per input point.
    fn compute(&self, points: &[PricePoint]) -> IndicatorSeries;
}
