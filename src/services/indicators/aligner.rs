//! Aligns indicator series onto the price timeline.

use super::{Indicator, IndicatorError, Sma};
use crate::types::{AlignedSeries, EnrichedPoint, IndicatorId, IndicatorSeries, PricePoint};
use std::collections::BTreeMap;

/// Attach each series to the price point at the same position.
///
/// Always yields exactly one record per input point. A series that is
/// shorter than the timeline is padded with `None`, extra values are
/// ignored. A repeated identifier keeps its first position in
/// `indicators` and the values of its last occurrence.
pub fn align(points: &[PricePoint], series: Vec<(IndicatorId, IndicatorSeries)>) -> AlignedSeries {
    let mut indicators: Vec<IndicatorId> = Vec::with_capacity(series.len());
    let mut by_id: BTreeMap<IndicatorId, IndicatorSeries> = BTreeMap::new();
    for (id, values) in series {
        if !indicators.contains(&id) {
            indicators.push(id);
        }
        by_id.insert(id, values);
    }

    let points = points
        .iter()
        .enumerate()
        .map(|(i, point)| EnrichedPoint {
            point: *point,
            values: by_id
                .iter()
                .map(|(id, values)| (*id, values.get(i).copied().flatten()))
                .collect(),
        })
        .collect();

    AlignedSeries { indicators, points }
}

/// Compute an SMA for every requested period and align them all.
///
/// Duplicate periods are computed once. Fails only on a zero period.
pub fn align_sma(points: &[PricePoint], periods: &[usize]) -> Result<AlignedSeries, IndicatorError> {
    let mut smas: Vec<Sma> = Vec::with_capacity(periods.len());
    for &period in periods {
        let sma = Sma::new(period)?;
        if !smas.contains(&sma) {
            smas.push(sma);
        }
    }

    let series = smas
        .iter()
        .map(|sma| (sma.id(), sma.compute(points)))
        .collect();

    Ok(align(points, series))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: 1_700_000_000 + i as i64 * 86_400,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000,
            })
            .collect()
    }

    #[test]
    fn test_align_short_and_long_periods() {
        let points = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let aligned = align_sma(&points, &[3, 10]).unwrap();

        assert_eq!(aligned.points.len(), 5);
        assert_eq!(aligned.indicators, vec![IndicatorId::sma(3), IndicatorId::sma(10)]);

        let sma3: Vec<Option<f64>> = aligned
            .points
            .iter()
            .map(|p| p.value(&IndicatorId::sma(3)))
            .collect();
        assert_eq!(sma3, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);

        for p in &aligned.points {
            assert!(p.values.contains_key(&IndicatorId::sma(10)));
            assert_eq!(p.value(&IndicatorId::sma(10)), None);
        }
    }

    #[test]
    fn test_align_keeps_price_fields() {
        let points = series(&[10.0, 11.0]);
        let aligned = align_sma(&points, &[1]).unwrap();
        assert_eq!(aligned.points[1].point, points[1]);
    }

    #[test]
    fn test_align_duplicate_periods_collapse() {
        let points = series(&[1.0, 2.0, 3.0]);
        let aligned = align_sma(&points, &[2, 2, 1, 2]).unwrap();

        assert_eq!(aligned.indicators, vec![IndicatorId::sma(2), IndicatorId::sma(1)]);
        assert!(aligned.points.iter().all(|p| p.values.len() == 2));
    }

    #[test]
    fn test_align_period_order_does_not_change_values() {
        let points = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0]);
        let a = align_sma(&points, &[2, 4]).unwrap();
        let b = align_sma(&points, &[4, 2]).unwrap();

        assert_eq!(a.points, b.points);
        assert_ne!(a.indicators, b.indicators);
    }

    #[test]
    fn test_align_pads_short_series() {
        let points = series(&[1.0, 2.0, 3.0]);
        let aligned = align(&points, vec![(IndicatorId::sma(7), vec![Some(1.0)])]);

        assert_eq!(aligned.points.len(), 3);
        assert_eq!(aligned.points[0].value(&IndicatorId::sma(7)), Some(1.0));
        assert_eq!(aligned.points[2].value(&IndicatorId::sma(7)), None);
    }

    #[test]
    fn test_align_empty_series() {
        let aligned = align_sma(&[], &[25, 50]).unwrap();
        assert!(aligned.points.is_empty());
        assert_eq!(aligned.indicators.len(), 2);
    }

    #[test]
    fn test_align_rejects_zero_period() {
        let points = series(&[1.0]);
        assert_eq!(align_sma(&points, &[5, 0]), Err(IndicatorError::InvalidPeriod(0)));
    }
}
