//! Chart analysis: combines moving averages and Fibonacci levels into the
//! data model consumed by the chart renderer.

use crate::services::indicators::{align_sma, compute_fibonacci_levels, price_range, IndicatorError};
use crate::types::{ChartAnalysis, FibonacciOverlay, PricePoint, SmaLine};
use serde::Deserialize;
use tracing::debug;

/// Default moving-average windows shown on a chart.
pub const DEFAULT_SMA_PERIODS: [usize; 4] = [25, 50, 75, 200];

/// What to overlay on a chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default = "default_sma_periods")]
    pub sma_periods: Vec<usize>,
    #[serde(default = "default_true")]
    pub fibonacci: bool,
    /// Inclusive timestamp window the Fibonacci range is taken from.
    /// `None` uses the whole series.
    #[serde(default)]
    pub fibonacci_window: Option<(i64, i64)>,
}

fn default_sma_periods() -> Vec<usize> {
    DEFAULT_SMA_PERIODS.to_vec()
}

fn default_true() -> bool {
    true
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            sma_periods: default_sma_periods(),
            fibonacci: true,
            fibonacci_window: None,
        }
    }
}

/// Build the enriched chart data for a price series.
pub fn analyze(points: &[PricePoint], options: &ChartOptions) -> Result<ChartAnalysis, IndicatorError> {
    let aligned = align_sma(points, &options.sma_periods)?;

    let fibonacci = if options.fibonacci {
        fibonacci_overlay(points, options.fibonacci_window)
    } else {
        None
    };

    debug!(
        "Analyzed {} points with {} SMA lines (fibonacci: {})",
        aligned.points.len(),
        aligned.indicators.len(),
        fibonacci.is_some()
    );

    Ok(ChartAnalysis {
        points: aligned.points,
        sma: aligned.indicators.into_iter().map(SmaLine::from).collect(),
        fibonacci,
    })
}

fn fibonacci_overlay(points: &[PricePoint], window: Option<(i64, i64)>) -> Option<FibonacciOverlay> {
    let (high, low) = match window {
        Some((from, to)) => {
            let visible: Vec<PricePoint> = points
                .iter()
                .filter(|p| p.timestamp >= from && p.timestamp <= to)
                .copied()
                .collect();
            price_range(&visible)?
        }
        None => price_range(points)?,
    };

    let levels = compute_fibonacci_levels(high, low);
    Some(FibonacciOverlay {
        high,
        low,
        levels: levels.labeled(),
    })
}
