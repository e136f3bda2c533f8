//! Simple Moving Average (SMA) indicator.

use super::{Indicator, IndicatorError};
use crate::types::{IndicatorId, IndicatorSeries, PricePoint};

/// Compute the simple moving average of `closes` over `period` values.
///
/// The output has the same length as the input. The first `period - 1`
/// positions are `None`; every later position holds the unweighted mean of
/// the `period` closes ending there. A period longer than the input yields
/// an all-`None` series.
pub fn compute_sma(closes: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(period));
    }

    let mut sma = vec![None; closes.len()];
    if closes.len() < period {
        return Ok(sma);
    }

    for (i, window) in closes.windows(period).enumerate() {
        let sum: f64 = window.iter().sum();
        sma[i + period - 1] = Some(sum / period as f64);
    }

    Ok(sma)
}

/// SMA (Simple Moving Average) over close prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod(period));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn id(&self) -> IndicatorId {
        IndicatorId::sma(self.period)
    }

    fn compute(&self, points: &[PricePoint]) -> IndicatorSeries {
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        // period is validated in `new`
        compute_sma(&closes, self.period).unwrap_or_else(|_| vec![None; points.len()])
    }
}
