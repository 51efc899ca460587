//! Raster snapshot of the calendar grid, encoded as binary PPM (P6).

use crate::domain::calendar::CalendarCell;
use crate::domain::metrics::{Direction, VolatilityBand};
use crate::domain::theme::Theme;
use crate::error::ExportError;

const CELL: usize = 48;
const GAP: usize = 2;
const BAR_HEIGHT: usize = 4;
const STRIP_HEIGHT: usize = 3;

type Rgb = [u8; 3];

/// Colours used by [`render_grid`], one set per theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub no_data: Rgb,
    pub low: Rgb,
    pub medium: Rgb,
    pub high: Rgb,
    pub up: Rgb,
    pub down: Rgb,
    pub flat: Rgb,
    pub volume: Rgb,
    pub outline: Rgb,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let base = Palette {
            background: [255, 255, 255],
            no_data: [229, 231, 235],
            low: VolatilityBand::Low.rgb(),
            medium: VolatilityBand::Medium.rgb(),
            high: VolatilityBand::High.rgb(),
            up: [22, 163, 74],
            down: [220, 38, 38],
            flat: [156, 163, 175],
            volume: [59, 130, 246],
            outline: [79, 70, 229],
        };
        match theme {
            Theme::Default => base,
            Theme::HighContrast => Palette {
                background: [0, 0, 0],
                no_data: [64, 64, 64],
                low: [0, 200, 0],
                medium: [255, 215, 0],
                high: [255, 0, 0],
                outline: [255, 255, 255],
                ..base
            },
            // Okabe-Ito hues, distinguishable without red/green.
            Theme::Colorblind => Palette {
                low: [86, 180, 233],
                medium: [240, 228, 66],
                high: [213, 94, 0],
                up: [0, 114, 178],
                down: [230, 159, 0],
                ..base
            },
        }
    }

    fn band(&self, band: VolatilityBand) -> Rgb {
        match band {
            VolatilityBand::Low => self.low,
            VolatilityBand::Medium => self.medium,
            VolatilityBand::High => self.high,
        }
    }

    fn direction(&self, direction: Direction) -> Rgb {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Flat => self.flat,
        }
    }
}

/// Packed 8-bit RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        let pixels = fill.iter().copied().cycle().take(width * height * 3).collect();
        Self { width, height, pixels }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Fill a rectangle, clipped to the image bounds.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let i = (row * self.width + col) * 3;
                self.pixels[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    fn outline_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h.saturating_sub(1), w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w.saturating_sub(1), y, 1, h, color);
    }

    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }
}

fn dim(c: Rgb) -> Rgb {
    c.map(|v| ((v as u16 + 255) / 2) as u8)
}

/// Rasterise the cells as a grid of at most seven columns.
///
/// Each cell is filled with its volatility band, carries a performance strip
/// along the top and a log-scaled volume bar along the bottom. Padding days
/// outside the anchor month are faded; the selected day is outlined.
pub fn render_grid(cells: &[CalendarCell], palette: &Palette) -> Result<RgbImage, ExportError> {
    if cells.is_empty() {
        return Err(ExportError::Empty);
    }
    let cols = cells.len().min(7);
    let rows = cells.len().div_ceil(cols);
    let width = GAP + cols * (CELL + GAP);
    let height = GAP + rows * (CELL + GAP);
    let mut img = RgbImage::new(width, height, palette.background);

    for (i, cell) in cells.iter().enumerate() {
        let x = GAP + (i % cols) * (CELL + GAP);
        let y = GAP + (i / cols) * (CELL + GAP);
        let fade = |c: Rgb| if cell.in_anchor_month { c } else { dim(c) };

        let fill = cell.band().map(|b| palette.band(b)).unwrap_or(palette.no_data);
        img.fill_rect(x, y, CELL, CELL, fade(fill));

        if let Some(direction) = cell.direction() {
            img.fill_rect(x, y, CELL, STRIP_HEIGHT, fade(palette.direction(direction)));
        }
        if let Some(pct) = cell.volume_bar_width() {
            let w = ((CELL as f64) * pct / 100.0).round() as usize;
            img.fill_rect(x, y + CELL - BAR_HEIGHT, w, BAR_HEIGHT, fade(palette.volume));
        }
        if cell.is_selected {
            img.outline_rect(x, y, CELL, CELL, palette.outline);
        }
    }

    tracing::debug!(width, height, cells = cells.len(), "calendar grid rasterised");
    Ok(img)
}
