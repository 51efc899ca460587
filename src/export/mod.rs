//! Export adapters: the metrics map as CSV or a PDF table, the calendar
//! grid as a raster image.
//!
//! All adapters produce bytes; writing them somewhere is the caller's job
//! (see [`save`]).

pub mod csv;
pub mod image;
pub mod pdf;

pub use self::csv::{metrics_csv, write_metrics_csv, CSV_HEADER};
pub use self::image::{render_grid, Palette, RgbImage};
pub use self::pdf::metrics_pdf;

use crate::domain::calendar::{CalendarViewModel, DateRange};
use crate::domain::theme::Theme;
use crate::error::ExportError;
use crate::shared::Symbol;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Image,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "ppm",
        }
    }

    /// Suggested file name, e.g. `BTCUSDT_2024-04-28_2024-06-01.csv`.
    pub fn file_name(&self, symbol: &Symbol, range: &DateRange) -> String {
        format!(
            "{}_{}_{}.{}",
            symbol,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
            self.extension()
        )
    }
}

/// Encode the current calendar view in `format`.
pub fn export(
    format: ExportFormat,
    vm: &CalendarViewModel,
    theme: Theme,
    today: NaiveDate,
) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => metrics_csv(vm.metrics())?.into_bytes(),
        ExportFormat::Pdf => metrics_pdf(&vm.title(), vm.metrics())?,
        ExportFormat::Image => {
            render_grid(&vm.cells(today), &Palette::for_theme(theme))?.to_ppm()
        }
    };
    tracing::debug!(format = format.extension(), bytes = bytes.len(), "export encoded");
    Ok(bytes)
}

/// Encode and write into `dir` under the suggested file name.
pub fn save(
    format: ExportFormat,
    vm: &CalendarViewModel,
    theme: Theme,
    today: NaiveDate,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = export(format, vm, theme, today)?;
    let path = dir.join(format.file_name(vm.symbol(), &vm.range()));
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}
