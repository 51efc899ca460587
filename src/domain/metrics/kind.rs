//! Metric kinds and the fixed set of display strategies attached to them.

use super::DayMetrics;
use crate::shared::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which metric the calendar is coloured and labelled by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[default]
    Volatility,
    Volume,
    Performance,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [Self::Volatility, Self::Volume, Self::Performance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volatility => "volatility",
            Self::Volume => "volume",
            Self::Performance => "performance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Volatility => "Volatility",
            Self::Volume => "Volume",
            Self::Performance => "Performance",
        }
    }

    /// Raw value of this metric for a day.
    pub fn value(&self, m: &DayMetrics) -> f64 {
        match self {
            Self::Volatility => m.volatility,
            Self::Volume => m.volume,
            Self::Performance => m.performance,
        }
    }

    /// Short label shown inside a calendar cell.
    pub fn cell_label(&self, m: &DayMetrics) -> String {
        match self {
            Self::Volatility => fmt::percent(m.volatility, 1),
            Self::Volume => fmt::fixed(m.volume, 0),
            Self::Performance => fmt::percent(m.performance, 1),
        }
    }

    /// Text tone of the cell label.
    pub fn tone(&self, m: &DayMetrics) -> Tone {
        match self {
            Self::Volatility => Tone::Warning,
            Self::Volume => Tone::Info,
            Self::Performance => match Direction::from_performance(m.performance) {
                Direction::Up => Tone::Positive,
                Direction::Down => Tone::Negative,
                Direction::Flat => Tone::Neutral,
            },
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volatility" => Ok(Self::Volatility),
            "volume" => Ok(Self::Volume),
            "performance" => Ok(Self::Performance),
            other => Err(format!("Unknown metric: {}", other)),
        }
    }
}

/// Colour band of a day's volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityBand {
    Low,
    Medium,
    High,
}

impl VolatilityBand {
    /// `< 1` low, `< 3` medium, anything else high.
    pub fn from_volatility(v: f64) -> Self {
        if v < 1.0 {
            Self::Low
        } else if v < 3.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// RGB swatch used by the raster export.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Low => [187, 247, 208],
            Self::Medium => [253, 224, 71],
            Self::High => [252, 165, 165],
        }
    }
}

/// Sign of a day's performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// NaN compares false both ways, so an undefined performance is flat.
    pub fn from_performance(p: f64) -> Self {
        if p > 0.0 {
            Self::Up
        } else if p < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "→",
        }
    }
}

/// Semantic text tone; the renderer maps it to a theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Warning,
    Info,
    Positive,
    Negative,
    Neutral,
}

/// Log-scaled volume bar width in percent: `min(100, log10(volume + 1) * 20)`.
pub fn volume_bar_width(volume: f64) -> f64 {
    if !volume.is_finite() || volume <= 0.0 {
        return 0.0;
    }
    ((volume + 1.0).log10() * 20.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::derive;
    use crate::domain::metrics::tests::candle;

    #[test]
    fn test_metric_kind_parse_and_serde() {
        assert_eq!("Volume".parse::<MetricKind>().unwrap(), MetricKind::Volume);
        assert!("price".parse::<MetricKind>().is_err());
        let json = serde_json::to_string(&MetricKind::Performance).unwrap();
        assert_eq!(json, "\"performance\"");
        assert_eq!(MetricKind::default(), MetricKind::Volatility);
    }

    #[test]
    fn test_volatility_bands() {
        assert_eq!(VolatilityBand::from_volatility(0.5), VolatilityBand::Low);
        assert_eq!(VolatilityBand::from_volatility(1.0), VolatilityBand::Medium);
        assert_eq!(VolatilityBand::from_volatility(2.99), VolatilityBand::Medium);
        assert_eq!(VolatilityBand::from_volatility(3.0), VolatilityBand::High);
    }

    #[test]
    fn test_direction_and_arrow() {
        assert_eq!(Direction::from_performance(0.1).arrow(), "▲");
        assert_eq!(Direction::from_performance(-0.1).arrow(), "▼");
        assert_eq!(Direction::from_performance(0.0), Direction::Flat);
        assert_eq!(Direction::from_performance(f64::NAN), Direction::Flat);
    }

    #[test]
    fn test_volume_bar_width() {
        assert_eq!(volume_bar_width(0.0), 0.0);
        assert!((volume_bar_width(9.0) - 20.0).abs() < 1e-9);
        assert!((volume_bar_width(99.0) - 40.0).abs() < 1e-9);
        assert_eq!(volume_bar_width(1e12), 100.0);
    }

    #[test]
    fn test_cell_labels_and_tones() {
        let m = derive(&candle(5, 100.0, 110.0, 95.0, 105.0, 50.4));
        assert_eq!(MetricKind::Volatility.cell_label(&m), "15.0%");
        assert_eq!(MetricKind::Volume.cell_label(&m), "50");
        assert_eq!(MetricKind::Performance.cell_label(&m), "5.0%");
        assert_eq!(MetricKind::Performance.tone(&m), Tone::Positive);
        assert_eq!(MetricKind::Volume.tone(&m), Tone::Info);
        assert_eq!(MetricKind::Volatility.value(&m), m.volatility);
    }
}
