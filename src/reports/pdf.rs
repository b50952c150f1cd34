use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::Report;
use crate::utils::error::AppError;

pub const CONTENT_TYPE: &str = "application/pdf";

// A4 portrait
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 5.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 8.0;
const MAX_LINE_CHARS: usize = 120;

/// Renders the report as a plain table: title, header line, one line per row.
pub fn to_pdf(report: &impl Report) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new(
        report.title(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
    };

    cursor
        .layer
        .use_text(report.title(), TITLE_SIZE, Mm(MARGIN), Mm(cursor.y), &bold);
    cursor.y -= LINE_HEIGHT * 2.0;

    let header = line(report.headers().iter().copied());
    cursor.write(&header, &bold);

    let rows = report.rows();
    if rows.is_empty() {
        cursor.write("No records.", &font);
    }

    for row in &rows {
        if cursor.y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            cursor = Cursor {
                layer: doc.get_page(page).get_layer(layer),
                y: PAGE_HEIGHT - MARGIN,
            };
            cursor.write(&header, &bold);
        }
        cursor.write(&line(row.iter().map(String::as_str)), &font);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    fn write(&mut self, text: &str, font: &IndirectFontRef) {
        self.layer
            .use_text(text, BODY_SIZE, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }
}

fn line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let joined = cells.collect::<Vec<_>>().join(" | ");
    if joined.chars().count() <= MAX_LINE_CHARS {
        return joined;
    }
    let mut cut: String = joined.chars().take(MAX_LINE_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

fn pdf_error(err: printpdf::Error) -> AppError {
    AppError::InternalServerError(format!("PDF export failed: {:?}", err))
}
