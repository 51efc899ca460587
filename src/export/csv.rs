//! CSV export of the metrics map.

use crate::domain::metrics::{DayMetrics, MetricsMap};
use crate::error::ExportError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

pub const CSV_HEADER: &str = "Date,Open,Close,High,Low,Volume,Volatility,Performance";

/// Undefined values are written as empty fields.
fn field(v: f64) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        String::new()
    }
}

fn record(m: &DayMetrics) -> [String; 8] {
    [
        m.key(),
        field(m.open),
        field(m.close),
        field(m.high),
        field(m.low),
        field(m.volume),
        field(m.volatility),
        field(m.performance),
    ]
}

/// Write a header plus one row per day, in date order. Fields are never quoted.
pub fn write_metrics_csv<W: Write>(out: W, metrics: &MetricsMap) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(CSV_HEADER.split(','))?;
    for m in metrics.iter() {
        wtr.write_record(&record(m))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn metrics_csv(metrics: &MetricsMap) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_metrics_csv(&mut buf, metrics)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
