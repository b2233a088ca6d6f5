//! PDF output.
//!
//! Layout is computed first into plain [`PageLayout`] values (positions in
//! millimetres from the bottom-left corner), then drawn with `printpdf`
//! using the built-in Helvetica faces. Character widths are estimated from
//! an average glyph width, which is close enough for a resume body.

use crate::domain::{wrap_text, Block, ExportError, RenderedResume};
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const MM_PER_PT: f32 = 0.352_778;
/// Average Helvetica glyph width in em.
const AVG_GLYPH_EM: f32 = 0.5;
const BULLET_INDENT_MM: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub page: PageSize,
    pub orientation: Orientation,
    pub margin_mm: f32,
    pub font_size_pt: f32,
    pub line_height: f32,
    /// Never leave a heading or entry title as the last line of a page.
    pub keep_headings_with_content: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 10.0,
            font_size_pt: 10.0,
            line_height: 1.35,
            keep_headings_with_content: true,
        }
    }
}

impl ExportOptions {
    /// Page width and height in millimetres, after orientation.
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = match self.page {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        };
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Regular,
    Bold,
    Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<PlacedText>,
}

/// Writes a rendered resume to a file.
pub trait PdfRenderer {
    fn render(&self, resume: &RenderedResume, options: &ExportOptions, path: &Path) -> Result<(), ExportError>;
}

struct Line {
    text: String,
    indent_mm: f32,
    size_pt: f32,
    style: TextStyle,
}

struct Group {
    lines: Vec<Line>,
    gap_before_mm: f32,
    keep_with_next: bool,
}

impl Group {
    fn height(&self, line_height: f32) -> f32 {
        self.lines
            .iter()
            .map(|l| l.size_pt * line_height * MM_PER_PT)
            .sum()
    }

    fn first_line_height(&self, line_height: f32) -> f32 {
        self.lines
            .first()
            .map(|l| l.size_pt * line_height * MM_PER_PT)
            .unwrap_or(0.0)
    }
}

fn wrapped(text: &str, size_pt: f32, width_mm: f32, indent_mm: f32, style: TextStyle) -> Vec<Line> {
    let chars = ((width_mm - indent_mm) / (size_pt * AVG_GLYPH_EM * MM_PER_PT)).floor().max(1.0) as usize;
    wrap_text(&pdf_safe(text), chars)
        .into_iter()
        .map(|text| Line {
            text,
            indent_mm,
            size_pt,
            style,
        })
        .collect()
}

/// Replaces characters the built-in fonts cannot show.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '·' | '•' => '-',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            c => c,
        })
        .collect()
}

fn build_groups(resume: &RenderedResume, options: &ExportOptions, width_mm: f32) -> Vec<Group> {
    let base = options.font_size_pt;
    let line_mm = base * options.line_height * MM_PER_PT;
    let mut groups = Vec::new();
    let mut pending_gap = 0.0;

    for block in &resume.blocks {
        let (lines, keep_with_next) = match block {
            Block::Spacer => {
                pending_gap += line_mm / 2.0;
                continue;
            }
            Block::Title(t) => (wrapped(t, base * 2.0, width_mm, 0.0, TextStyle::Accent), false),
            Block::Subtitle(t) => (wrapped(t, base, width_mm, 0.0, TextStyle::Regular), false),
            Block::Heading(t) => (
                wrapped(t, base * 1.3, width_mm, 0.0, TextStyle::Accent),
                options.keep_headings_with_content,
            ),
            Block::Entry { title, meta } => {
                let mut lines = wrapped(title, base, width_mm, 0.0, TextStyle::Bold);
                if let Some(meta) = meta {
                    lines.extend(wrapped(meta, base * 0.9, width_mm, 0.0, TextStyle::Regular));
                }
                (lines, options.keep_headings_with_content)
            }
            Block::Line(t) => (wrapped(t, base, width_mm, 0.0, TextStyle::Regular), false),
            Block::Bullet(t) => {
                let mut lines = wrapped(t, base, width_mm, BULLET_INDENT_MM, TextStyle::Regular);
                if let Some(first) = lines.first_mut() {
                    first.text = format!("- {}", first.text);
                    first.indent_mm -= BULLET_INDENT_MM / 2.0;
                }
                (lines, false)
            }
        };
        if lines.is_empty() {
            continue;
        }
        groups.push(Group {
            lines,
            gap_before_mm: std::mem::take(&mut pending_gap),
            keep_with_next,
        });
    }
    groups
}

/// Places a rendered resume onto pages.
///
/// A group of lines produced by one block is never split across pages
/// unless it is taller than a whole page. Groups flagged keep-with-next
/// move to the next page together with the first line of what follows.
pub fn layout_pages(resume: &RenderedResume, options: &ExportOptions) -> Vec<PageLayout> {
    let (width, height) = options.page_dimensions();
    let margin = options.margin_mm;
    let usable_width = (width - 2.0 * margin).max(10.0);
    let top = height - margin;
    let bottom = margin;
    let groups = build_groups(resume, options, usable_width);

    let mut pages = vec![PageLayout::default()];
    let mut cursor = top;

    for (i, group) in groups.iter().enumerate() {
        let at_top = cursor >= top;
        let gap = if at_top { 0.0 } else { group.gap_before_mm };
        let mut needed = gap + group.height(options.line_height);
        if group.keep_with_next {
            if let Some(next) = groups.get(i + 1) {
                needed += next.gap_before_mm + next.first_line_height(options.line_height);
            }
        }

        if !at_top && cursor - needed < bottom {
            pages.push(PageLayout::default());
            cursor = top;
        } else {
            cursor -= gap;
        }

        for line in &group.lines {
            let advance = line.size_pt * options.line_height * MM_PER_PT;
            if cursor - advance < bottom && cursor < top {
                // Oversized group: spill onto a fresh page.
                pages.push(PageLayout::default());
                cursor = top;
            }
            cursor -= advance;
            if let Some(page) = pages.last_mut() {
                page.items.push(PlacedText {
                    text: line.text.clone(),
                    x_mm: margin + line.indent_mm,
                    y_mm: cursor,
                    size_pt: line.size_pt,
                    style: line.style,
                });
            }
        }
    }
    pages
}

fn render_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Render(e.to_string())
}

/// Draws pages with `printpdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintPdfRenderer;

impl PdfRenderer for PrintPdfRenderer {
    fn render(&self, resume: &RenderedResume, options: &ExportOptions, path: &Path) -> Result<(), ExportError> {
        let (width, height) = options.page_dimensions();
        let pages = layout_pages(resume, options);

        let (doc, first_page, first_layer) =
            PdfDocument::new(format!("Resume ({})", resume.template), Mm(width), Mm(height), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;

        let (r, g, b) = resume.accent;
        let accent = Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        ));
        let black = Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None));

        for (i, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(width), Mm(height), "Layer 1")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for item in &page.items {
                let (font, color) = match item.style {
                    TextStyle::Regular => (&regular, &black),
                    TextStyle::Bold => (&bold, &black),
                    TextStyle::Accent => (&bold, &accent),
                };
                layer.set_fill_color(color.clone());
                layer.use_text(item.text.clone(), item.size_pt, Mm(item.x_mm), Mm(item.y_mm), font);
            }
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file)).map_err(render_err)?;
        tracing::info!(path = %path.display(), pages = pages.len(), "wrote PDF");
        Ok(())
    }
}
