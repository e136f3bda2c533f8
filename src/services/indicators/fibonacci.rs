//! Fibonacci retracement levels.

use crate::types::{FibonacciLevels, PricePoint};
use tracing::debug;

/// Retracement depths measured down from the high.
const RETRACEMENTS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Compute the seven retracement levels between `high` and `low`.
///
/// Levels are ordered from `high` down to `low`. Inputs given the wrong way
/// round are swapped so the result is always non-increasing.
pub fn compute_fibonacci_levels(high: f64, low: f64) -> FibonacciLevels {
    let (high, low) = if high < low {
        debug!("Fibonacci range inverted ({} < {}), swapping", high, low);
        (low, high)
    } else {
        (high, low)
    };

    let diff = high - low;
    let mut levels = [high; 7];
    for (slot, ratio) in levels[1..6].iter_mut().zip(RETRACEMENTS) {
        *slot = high - diff * ratio;
    }
    levels[6] = low;

    FibonacciLevels(levels)
}

/// Highest high and lowest low across `points`, `None` when empty.
pub fn price_range(points: &[PricePoint]) -> Option<(f64, f64)> {
    points.iter().fold(None, |acc, p| match acc {
        None => Some((p.high, p.low)),
        Some((high, low)) => Some((high.max(p.high), low.min(p.low))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round1(v: f64) -> f64 {
        (v * 10.0).round() / 10.0
    }

    #[test]
    fn test_levels_for_100_50() {
        let levels = compute_fibonacci_levels(100.0, 50.0);
        let rounded: Vec<f64> = levels.levels().iter().map(|&v| round1(v)).collect();
        assert_eq!(rounded, vec![100.0, 88.2, 80.9, 75.0, 69.1, 60.7, 50.0]);
    }

    #[test]
    fn test_levels_degenerate_range() {
        let levels = compute_fibonacci_levels(5.0, 5.0);
        assert_eq!(levels.0, [5.0; 7]);
    }

    #[test]
    fn test_levels_swap_inverted_inputs() {
        let levels = compute_fibonacci_levels(50.0, 100.0);
        assert_eq!(levels, compute_fibonacci_levels(100.0, 50.0));
    }

    #[test]
    fn test_levels_endpoints_exact() {
        let levels = compute_fibonacci_levels(123.45, 67.89);
        assert_eq!(levels.0[0], 123.45);
        assert_eq!(levels.0[6], 67.89);
        assert!(levels.0.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_labels_pair_with_ratios() {
        let labeled = compute_fibonacci_levels(200.0, 100.0).labeled();
        let labels: Vec<&str> = labeled.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["100.0%", "78.6%", "61.8%", "50.0%", "38.2%", "23.6%", "0.0%"]
        );
        assert_eq!(labeled[3].price, 150.0);
        assert_eq!(labeled[3].ratio, 0.5);
    }

    #[test]
    fn test_price_range() {
        let points = vec![
            PricePoint { timestamp: 1, open: 10.0, high: 12.0, low: 9.0, close: 11.0, volume: 5 },
            PricePoint { timestamp: 2, open: 11.0, high: 15.0, low: 10.5, close: 14.0, volume: 7 },
            PricePoint { timestamp: 3, open: 14.0, high: 14.5, low: 8.0, close: 9.5, volume: 3 },
        ];
        assert_eq!(price_range(&points), Some((15.0, 8.0)));
        assert_eq!(price_range(&points[..1]), Some((12.0, 9.0)));
        assert_eq!(price_range(&[]), None);
    }
}
