//! Metrics state container: the date-keyed map owned by the calendar view-model.

use super::DayMetrics;
use crate::domain::kline::RawCandle;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Date-key → `DayMetrics`, with no duplicate keys.
///
/// Built in one go from a batch of candles and replaced wholesale on the
/// next fetch. Iteration is in ascending date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsMap {
    days: BTreeMap<NaiveDate, DayMetrics>,
}

impl MetricsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive one entry per candle. When two candles fall on the same
    /// calendar day the later one in `candles` wins.
    pub fn from_candles<'a>(candles: impl IntoIterator<Item = &'a RawCandle>) -> Self {
        let mut days = BTreeMap::new();
        for candle in candles {
            let metrics = DayMetrics::derive(candle);
            if days.insert(metrics.date, metrics).is_some() {
                tracing::debug!(date = %metrics.date, "Duplicate day key, keeping later candle");
            }
        }
        Self { days }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayMetrics> {
        self.days.get(&date)
    }

    /// Lookup by `yyyy-mm-dd` key.
    pub fn get_key(&self, key: &str) -> Option<&DayMetrics> {
        let date = NaiveDate::parse_from_str(key, super::DATE_KEY_FORMAT).ok()?;
        self.get(date)
    }

    /// All days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &DayMetrics> {
        self.days.values()
    }

    /// Days within `[start, end]`, ascending.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &DayMetrics> {
        self.days.range(start..=end).map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<DayMetrics> for MetricsMap {
    /// Collect already-derived metrics; later items win on duplicate dates.
    fn from_iter<I: IntoIterator<Item = DayMetrics>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().map(|m| (m.date, m)).collect(),
        }
    }
}
