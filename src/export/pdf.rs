//! PDF export: the metrics table as a plain single-font PDF 1.4 document.
//!
//! Courier keeps the padded columns aligned; long tables spill onto
//! additional landscape pages.

use crate::domain::metrics::{DayMetrics, MetricsMap};
use crate::error::ExportError;
use crate::shared::fmt;

const PAGE_WIDTH: u32 = 842;
const PAGE_HEIGHT: u32 = 595;
const MARGIN: u32 = 40;
const FONT_SIZE: u32 = 9;
const LEADING: u32 = 12;
const TITLE_SIZE: u32 = 13;

const COLUMNS: [(&str, usize); 8] = [
    ("Date", 12),
    ("Open", 14),
    ("Close", 14),
    ("High", 14),
    ("Low", 14),
    ("Volume", 18),
    ("Volatility", 12),
    ("Performance", 12),
];

fn rows_per_page() -> usize {
    ((PAGE_HEIGHT - 2 * MARGIN - 2 * LEADING) / LEADING) as usize - 1
}

fn pad_row(cells: [String; 8]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" ")
}

fn header_row() -> String {
    pad_row(COLUMNS.map(|(name, _)| name.to_string()))
}

fn data_row(m: &DayMetrics) -> String {
    pad_row([
        m.key(),
        fmt::fixed(m.open, 2),
        fmt::fixed(m.close, 2),
        fmt::fixed(m.high, 2),
        fmt::fixed(m.low, 2),
        fmt::grouped(m.volume, 2),
        fmt::percent(m.volatility, 2),
        fmt::percent(m.performance, 2),
    ])
}

/// Escape a string for a PDF literal; non-ASCII is replaced.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn page_content(title: &str, lines: &[String], page: usize, pages: usize) -> String {
    let top = PAGE_HEIGHT - MARGIN;
    let mut s = String::new();
    s.push_str(&format!(
        "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
        TITLE_SIZE,
        MARGIN,
        top,
        escape(&format!("{}  (page {}/{})", title, page, pages))
    ));
    s.push_str(&format!(
        "BT /F1 {} Tf {} TL {} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        top - 2 * LEADING
    ));
    s.push_str(&format!("({}) Tj T*\n", escape(&header_row())));
    for line in lines {
        s.push_str(&format!("({}) Tj T*\n", escape(line)));
    }
    s.push_str("ET\n");
    s
}

/// Appends numbered objects and remembers their byte offsets for the xref table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n");
        Self { buf, offsets: Vec::new() }
    }

    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn stream(&mut self, content: &str) {
        self.object(&format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.buf.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, xref_at
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Render `metrics` as a titled table, one row per day.
pub fn metrics_pdf(title: &str, metrics: &MetricsMap) -> Result<Vec<u8>, ExportError> {
    let per_page = rows_per_page();
    if per_page == 0 {
        return Err(ExportError::Layout("page too small for a single row".into()));
    }

    let rows: Vec<String> = metrics.iter().map(data_row).collect();
    let chunks: Vec<&[String]> = if rows.is_empty() {
        vec![&[]]
    } else {
        rows.chunks(per_page).collect()
    };
    let pages = chunks.len();

    // 1: catalog, 2: page tree, 3: font, then (page, content) pairs.
    let kids = (0..pages)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    let mut pdf = PdfWriter::new();
    pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(&format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages));
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>");
    for (i, chunk) in chunks.iter().enumerate() {
        pdf.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            5 + 2 * i
        ));
        pdf.stream(&page_content(title, chunk, i + 1, pages));
    }

    tracing::debug!(rows = rows.len(), pages, "pdf table rendered");
    Ok(pdf.finish())
}
