//! FILENAME: core/persistence/src/pdf_writer.rs
//! Document renderer: a plain A4 text report.
//!
//! Layout is computed first as a flat list of styled lines, then laid onto
//! pages top to bottom. Grand-total tables are not part of the document.

use crate::render::ReportRenderer;
use crate::PersistenceError;
use engine::ReportBook;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::io::BufWriter;

pub const DOCUMENT_TITLE: &str = "Sales Summary Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LAYER_NAME: &str = "Layer 1";

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
}

impl LineStyle {
    fn font_size(&self) -> f32 {
        match self {
            LineStyle::Title => 16.0,
            LineStyle::Heading => 12.0,
            LineStyle::Body => 10.0,
        }
    }

    /// Vertical space the line takes, in millimetres.
    fn advance(&self) -> f32 {
        match self {
            LineStyle::Title => 12.0,
            LineStyle::Heading => 9.0,
            LineStyle::Body => 6.0,
        }
    }

    fn is_bold(&self) -> bool {
        !matches!(self, LineStyle::Body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub style: LineStyle,
    pub text: String,
}

impl DocumentLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        DocumentLine {
            style,
            text: text.into(),
        }
    }
}

/// The document as a sequence of lines: the title, then for every breakdown
/// a heading followed by one line per row (cells joined by ", "), with long
/// rows wrapped at `wrap_width` characters.
pub fn document_lines(book: &ReportBook, wrap_width: usize) -> Vec<DocumentLine> {
    let mut lines = vec![DocumentLine::new(LineStyle::Title, DOCUMENT_TITLE)];

    for table in book.breakdowns() {
        lines.push(DocumentLine::new(LineStyle::Heading, table.title.as_str()));
        for row in table.display_rows() {
            for part in wrap_text(&row.join(", "), wrap_width) {
                lines.push(DocumentLine::new(LineStyle::Body, part));
            }
        }
    }

    lines
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits lines into pages so that no page runs past the bottom margin.
fn paginate(lines: Vec<DocumentLine>, usable_height: f32) -> Vec<Vec<DocumentLine>> {
    let mut pages: Vec<Vec<DocumentLine>> = vec![Vec::new()];
    let mut used = 0.0;

    for line in lines {
        let advance = line.style.advance();
        let page_has_lines = pages.last().map(|p| !p.is_empty()).unwrap_or(false);
        if page_has_lines && used + advance > usable_height {
            pages.push(Vec::new());
            used = 0.0;
        }
        used += advance;
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }

    pages
}

// ============================================================================
// RENDERER
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer {
    pub wrap_width: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        PdfRenderer { wrap_width: 95 }
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, book: &ReportBook) -> Result<Vec<u8>, PersistenceError> {
        let pages = paginate(
            document_lines(book, self.wrap_width),
            PAGE_HEIGHT_MM - 2.0 * MARGIN_MM,
        );

        let (doc, first_page, first_layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

        let page_count = pages.len();
        for (index, page_lines) in pages.into_iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
            };
            let layer = doc.get_page(page).get_layer(layer);

            let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
            for line in page_lines {
                y -= line.style.advance();
                let font: &IndirectFontRef = if line.style.is_bold() { &bold } else { &regular };
                layer.use_text(line.text, line.style.font_size(), Mm(MARGIN_MM), Mm(y), font);
            }
        }

        log::debug!(target: "RENDER", "document with {} page(s)", page_count);
        save_to_vec(doc)
    }
}

fn save_to_vec(doc: PdfDocumentReference) -> Result<Vec<u8>, PersistenceError> {
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(pdf_error)?;
    writer
        .into_inner()
        .map_err(|e| PersistenceError::Io(e.into_error()))
}

fn pdf_error(err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Pdf(err.to_string())
}
