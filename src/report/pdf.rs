//! printpdf renderer for a [`ReportPlan`].
//!
//! The plan already fixed the page count, so headers and footers are
//! stamped in the same pass as the body. Builtin Helvetica keeps the
//! documents font-embedding-free and small.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::*;

use super::layout::{
    ReportPlan, CONTENT_BOTTOM_MM, LINE_HEIGHT_MM, MARGIN_LEFT_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
    TITLE_HEIGHT_MM,
};
use super::ReportError;
use crate::config;

const MARGIN_RIGHT_MM: f32 = 20.0;

const HEADER_CLINIC_Y_MM: f32 = 285.0;
const HEADER_TITLE_Y_MM: f32 = 279.0;
const HEADER_RULE_Y_MM: f32 = 275.0;
const FOOTER_Y_MM: f32 = 14.0;

fn font_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(format!("font error: {e}"))
}

/// Render the plan to PDF bytes.
pub fn render_report(plan: &ReportPlan) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&plan.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(font_error)?;

    let total_pages = plan.page_count();

    for (index, planned) in plan.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        draw_header(&layer, &plan.title, &font, &bold);
        draw_footer(&layer, index + 1, total_pages, &font);

        for block in &planned.blocks {
            let mut y = Mm(block.y_mm);
            layer.use_text(&block.title, 11.0, Mm(MARGIN_LEFT_MM), y, &bold);
            y -= Mm(TITLE_HEIGHT_MM);
            for line in &block.lines {
                layer.use_text(line, 9.0, Mm(MARGIN_LEFT_MM + 2.0), y, &font);
                y -= Mm(LINE_HEIGHT_MM);
            }
            draw_block_border(&layer, block.y_mm, block.height_mm());
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner().map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

fn draw_header(layer: &PdfLayerReference, title: &str, font: &IndirectFontRef, bold: &IndirectFontRef) {
    layer.use_text(config::CLINIC_NAME, 13.0, Mm(MARGIN_LEFT_MM), Mm(HEADER_CLINIC_Y_MM), bold);
    layer.use_text(title, 10.0, Mm(MARGIN_LEFT_MM), Mm(HEADER_TITLE_Y_MM), font);
    draw_rule(layer, HEADER_RULE_Y_MM);
}

fn draw_footer(layer: &PdfLayerReference, page: usize, total: usize, font: &IndirectFontRef) {
    draw_rule(layer, CONTENT_BOTTOM_MM - 5.0);
    let contact = format!("{} • Tel: {}", config::CLINIC_ADDRESS, config::CLINIC_PHONE);
    layer.use_text(&contact, 8.0, Mm(MARGIN_LEFT_MM), Mm(FOOTER_Y_MM), font);
    layer.use_text(
        &format!("Page {page} of {total}"),
        8.0,
        Mm(PAGE_WIDTH_MM - MARGIN_RIGHT_MM - 22.0),
        Mm(FOOTER_Y_MM),
        font,
    );
}

fn draw_rule(layer: &PdfLayerReference, y_mm: f32) {
    layer.set_outline_thickness(0.4);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.55, 0.55, 0.55, None)));
    let rule = Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT_MM), Mm(y_mm)), false),
            (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_RIGHT_MM), Mm(y_mm)), false),
        ],
        is_closed: false,
    };
    layer.add_line(rule);
}

/// Light border around a section block, padded past the text edges.
fn draw_block_border(layer: &PdfLayerReference, top_mm: f32, height_mm: f32) {
    let left = MARGIN_LEFT_MM - 2.0;
    let right = PAGE_WIDTH_MM - MARGIN_RIGHT_MM + 2.0;
    let top = top_mm + 4.5;
    let bottom = top_mm - height_mm + 1.5;

    layer.set_outline_thickness(0.3);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.75, 0.75, 0.75, None)));
    let border = Line {
        points: vec![
            (Point::new(Mm(left), Mm(top)), false),
            (Point::new(Mm(right), Mm(top)), false),
            (Point::new(Mm(right), Mm(bottom)), false),
            (Point::new(Mm(left), Mm(bottom)), false),
        ],
        is_closed: true,
    };
    layer.add_line(border);
}

/// Write PDF bytes under the given exports directory, creating it if
/// needed. Callers normally pass [`config::exports_dir`].
pub fn export_pdf_to_file(
    pdf_bytes: &[u8],
    filename: &str,
    exports_dir: &Path,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(exports_dir)?;

    let path = exports_dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    Ok(path)
}
