use serde::{Deserialize, Serialize};

/// Chart time range, as understood by the upstream quote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    #[default]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl ChartRange {
    /// Get the range from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(ChartRange::OneDay),
            "5d" => Some(ChartRange::FiveDays),
            "1mo" => Some(ChartRange::OneMonth),
            "3mo" => Some(ChartRange::ThreeMonths),
            "6mo" => Some(ChartRange::SixMonths),
            "1y" => Some(ChartRange::OneYear),
            "2y" => Some(ChartRange::TwoYears),
            "5y" => Some(ChartRange::FiveYears),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1d",
            ChartRange::FiveDays => "5d",
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
        }
    }

    /// Candle interval used when the caller does not ask for one.
    /// Intraday bars for the one-day view, daily bars otherwise.
    pub fn default_interval(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "5m",
            _ => "1d",
        }
    }
}

/// One OHLCV observation. `timestamp` is in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}
