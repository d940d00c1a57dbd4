//! Measurement-first page flow.
//!
//! Sections are wrapped and measured against the page geometry before
//! anything is drawn. A section that would overflow the current page
//! starts a new one; a section taller than a whole page splits
//! line-wise, keeping its title with the first line. The resulting
//! [`ReportPlan`] already knows the final page count, so the renderer
//! stamps headers and footers in a single pass.

use super::project::Section;

// A4 geometry, in millimeters. Content flows between the header rule
// and the footer band.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_LEFT_MM: f32 = 20.0;
pub const CONTENT_TOP_MM: f32 = 268.0;
pub const CONTENT_BOTTOM_MM: f32 = 25.0;

pub const TITLE_HEIGHT_MM: f32 = 7.5;
pub const LINE_HEIGHT_MM: f32 = 4.5;
pub const SECTION_GAP_MM: f32 = 5.0;

/// Character budget per wrapped line at the body font size.
pub const WRAP_COLUMNS: usize = 88;

/// One section placed on a page: a bold title line followed by wrapped
/// body lines. Continuation chunks of a split section get a
/// "(continued)" title.
#[derive(Debug, Clone)]
pub struct PlacedBlock {
    /// Baseline of the title line, from the page bottom.
    pub y_mm: f32,
    pub title: String,
    pub lines: Vec<String>,
}

impl PlacedBlock {
    pub fn height_mm(&self) -> f32 {
        block_height(self.lines.len())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlannedPage {
    pub blocks: Vec<PlacedBlock>,
}

#[derive(Debug, Clone)]
pub struct ReportPlan {
    pub title: String,
    pub pages: Vec<PlannedPage>,
}

impl ReportPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn block_height(line_count: usize) -> f32 {
    TITLE_HEIGHT_MM + line_count as f32 * LINE_HEIGHT_MM
}

fn page_capacity() -> f32 {
    CONTENT_TOP_MM - CONTENT_BOTTOM_MM
}

/// Word-wrap at a character budget (chars, not bytes, so accented
/// names don't wrap early). Words longer than the budget get a line of
/// their own rather than being broken mid-word.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars + word_chars + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn section_lines(section: &Section) -> Vec<String> {
    section
        .fields
        .iter()
        .flat_map(|field| wrap_text(&format!("{}: {}", field.label, field.value), WRAP_COLUMNS))
        .collect()
}

struct Flow {
    pages: Vec<PlannedPage>,
    y_mm: f32,
}

impl Flow {
    fn new() -> Self {
        Self { pages: vec![PlannedPage::default()], y_mm: CONTENT_TOP_MM }
    }

    fn remaining(&self) -> f32 {
        self.y_mm - CONTENT_BOTTOM_MM
    }

    fn new_page(&mut self) {
        self.pages.push(PlannedPage::default());
        self.y_mm = CONTENT_TOP_MM;
    }

    fn place(&mut self, title: String, lines: Vec<String>) {
        let height = block_height(lines.len());
        let block = PlacedBlock { y_mm: self.y_mm, title, lines };
        self.y_mm -= height + SECTION_GAP_MM;
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(block);
        }
    }

    /// Lines that still fit above the footer, after the title.
    fn lines_that_fit(&self) -> usize {
        ((self.remaining() - TITLE_HEIGHT_MM) / LINE_HEIGHT_MM).floor() as usize
    }

    fn add_section(&mut self, title: &str, lines: Vec<String>) {
        let height = block_height(lines.len());

        if height <= self.remaining() {
            self.place(title.to_string(), lines);
            return;
        }

        // Whole section fits on a fresh page: start one instead of
        // splitting.
        if height <= page_capacity() {
            self.new_page();
            self.place(title.to_string(), lines);
            return;
        }

        // Taller than any page: split line-wise, title stays with the
        // first chunk, continuations are labelled.
        let mut remaining_lines = lines;
        let mut chunk_title = title.to_string();
        let mut first = true;
        while !remaining_lines.is_empty() {
            if !first || self.lines_that_fit() < 1 {
                self.new_page();
            }
            let take = self.lines_that_fit().min(remaining_lines.len()).max(1);
            let chunk: Vec<String> = remaining_lines.drain(..take).collect();
            self.place(chunk_title.clone(), chunk);
            chunk_title = format!("{title} (continued)");
            first = false;
        }
    }
}

/// Lay out the sections into pages. Empty sections are skipped; an
/// empty report still yields one (blank) page so the header and footer
/// have somewhere to live.
pub fn plan_report(title: &str, sections: &[Section]) -> ReportPlan {
    let mut flow = Flow::new();
    for section in sections {
        if section.fields.is_empty() {
            continue;
        }
        flow.add_section(&section.title, section_lines(section));
    }
    ReportPlan { title: title.to_string(), pages: flow.pages }
}
