//! Indicator data model shared by the computation core and the API layer.

use crate::types::PricePoint;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Per-timestamp indicator values, positionally aligned to a price series.
/// `None` marks positions without enough history.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Retracement ratios paired positionally with [`FibonacciLevels`].
pub const FIB_RATIOS: [f64; 7] = [1.0, 0.786, 0.618, 0.5, 0.382, 0.236, 0.0];

/// Kind of overlay indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
}

impl IndicatorKind {
    fn prefix(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
        }
    }
}

/// Identifies one computed series: indicator kind plus window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndicatorId {
    pub kind: IndicatorKind,
    pub period: usize,
}

impl IndicatorId {
    pub fn sma(period: usize) -> Self {
        Self {
            kind: IndicatorKind::Sma,
            period,
        }
    }

    /// Field name used for this series in enriched records, e.g. `sma25`.
    pub fn key(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.period)
    }

    /// Legend label, e.g. `SMA25`.
    pub fn label(&self) -> String {
        format!("{}{}", self.kind.prefix().to_uppercase(), self.period)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for IndicatorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

/// A price point augmented with one value per requested indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPoint {
    pub point: PricePoint,
    pub values: BTreeMap<IndicatorId, Option<f64>>,
}

impl EnrichedPoint {
    /// Value of a series at this point, `None` if absent or not requested.
    pub fn value(&self, id: &IndicatorId) -> Option<f64> {
        self.values.get(id).copied().flatten()
    }
}

impl Serialize for EnrichedPoint {
    // Flat record: price fields followed by one field per indicator.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6 + self.values.len()))?;
        map.serialize_entry("timestamp", &self.point.timestamp)?;
        map.serialize_entry("open", &self.point.open)?;
        map.serialize_entry("high", &self.point.high)?;
        map.serialize_entry("low", &self.point.low)?;
        map.serialize_entry("close", &self.point.close)?;
        map.serialize_entry("volume", &self.point.volume)?;
        for (id, value) in &self.values {
            map.serialize_entry(&id.key(), value)?;
        }
        map.end()
    }
}

/// Output of the series aligner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    /// Requested indicators, deduplicated, in request order.
    pub indicators: Vec<IndicatorId>,
    pub points: Vec<EnrichedPoint>,
}

/// Seven retracement price levels, from `high` down to `low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibonacciLevels(pub [f64; 7]);

impl FibonacciLevels {
    pub fn levels(&self) -> &[f64; 7] {
        &self.0
    }

    /// Levels paired with their ratios and display labels.
    pub fn labeled(&self) -> Vec<FibonacciLevel> {
        self.0
            .iter()
            .zip(FIB_RATIOS.iter())
            .map(|(&price, &ratio)| FibonacciLevel {
                ratio,
                price,
                label: fibonacci_label(ratio),
            })
            .collect()
    }
}

/// Display label for a retracement ratio, e.g. `61.8%`.
pub fn fibonacci_label(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// A single horizontal reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
    pub label: String,
}

/// Legend entry for one moving-average line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmaLine {
    pub key: String,
    pub label: String,
    pub period: usize,
}

impl From<IndicatorId> for SmaLine {
    fn from(id: IndicatorId) -> Self {
        Self {
            key: id.key(),
            label: id.label(),
            period: id.period,
        }
    }
}

/// Fibonacci overlay for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciOverlay {
    pub high: f64,
    pub low: f64,
    pub levels: Vec<FibonacciLevel>,
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalysis {
    pub points: Vec<EnrichedPoint>,
    pub sma: Vec<SmaLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fibonacci: Option<FibonacciOverlay>,
}
