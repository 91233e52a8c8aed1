use std::fmt;

use super::LaidOutDocument;
use super::canvas::{Canvas, PlacedLine};
use super::layout::{measure_text_width, wrap_text};
use super::style::StyleContext;
use crate::config::PageSize;
use crate::model::Block;
use crate::registry::ResourceRegistry;

pub const MARGIN: f32 = 20.0;
pub const LINE_HEIGHT: f32 = 7.0;
pub const IMAGE_WIDTH: f32 = 100.0;
pub const IMAGE_HEIGHT: f32 = 60.0;
pub const PLACEHOLDER_HEIGHT: f32 = 40.0;

const BULLET_PREFIX: &str = "\u{2022} ";
const BULLET_INDENT: f32 = 5.0;

/// Page size and the two bottom limits, all in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// A block starting below this line goes to a new page.
    pub break_threshold: f32,
    /// An image and its caption must end above this line.
    pub bottom_bound: f32,
}

impl PageGeometry {
    /// The limits keep their A4 distance from the page bottom (270 / 280 on A4).
    pub fn for_size(size: PageSize) -> Self {
        let (width, height) = size.dimensions_mm();
        Self {
            width,
            height,
            margin: MARGIN,
            break_threshold: height - 27.0,
            bottom_bound: height - 17.0,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

/// Write position: page index and baseline offset from the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
}

/// Cursor movement caused by one input line.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorStep {
    /// 1-based input line number.
    pub line: usize,
    pub y_before: f32,
    pub page: usize,
    pub y_after: f32,
}

/// Something that degraded the output without stopping the render.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    ImageMissing {
        line: usize,
        resource_id: String,
    },
    ImageSkipped {
        line: usize,
        resource_id: String,
        reason: String,
    },
    Overflow {
        line: usize,
        page: usize,
        bottom: f32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ImageMissing { line, resource_id } => {
                write!(f, "line {line}: image '{resource_id}' is not registered")
            }
            Diagnostic::ImageSkipped {
                line,
                resource_id,
                reason,
            } => write!(f, "line {line}: image '{resource_id}' skipped: {reason}"),
            Diagnostic::Overflow { line, page, bottom } => write!(
                f,
                "line {line}: content runs past the bottom of page {} (y = {bottom:.1} mm)",
                page + 1
            ),
        }
    }
}

/// Single-pass flow layout. Owns the cursor for the duration of one render.
pub(super) struct Paginator<'a> {
    geometry: PageGeometry,
    registry: &'a ResourceRegistry,
    canvas: Canvas,
    cursor: Cursor,
    trace: Vec<CursorStep>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Paginator<'a> {
    pub(super) fn new(geometry: PageGeometry, registry: &'a ResourceRegistry) -> Self {
        Self {
            geometry,
            registry,
            canvas: Canvas::new(),
            cursor: Cursor {
                page: 0,
                y: geometry.margin,
            },
            trace: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn run(mut self, title: &str, url: &str, blocks: &[Block]) -> LaidOutDocument {
        self.preamble(title, url);
        let preamble_end = self.cursor.y;

        let body = StyleContext::body();
        for (idx, block) in blocks.iter().enumerate() {
            let line = idx + 1;
            let y_before = self.cursor.y;
            if self.cursor.y > self.geometry.break_threshold {
                self.break_page(line);
            }
            self.place(line, block);
            // Handlers may leave any style behind; the next block always starts from body text.
            self.canvas.set_style(body);

            if self.cursor.y > self.geometry.height {
                log::warn!(
                    "Line {line} runs past the bottom of page {} (y = {:.1} mm)",
                    self.cursor.page + 1,
                    self.cursor.y
                );
                self.diagnostics.push(Diagnostic::Overflow {
                    line,
                    page: self.cursor.page,
                    bottom: self.cursor.y,
                });
            }

            self.trace.push(CursorStep {
                line,
                y_before,
                page: self.cursor.page,
                y_after: self.cursor.y,
            });
        }

        let (pages, fonts, images) = self.canvas.into_parts();
        LaidOutDocument {
            title: title.to_string(),
            url: url.to_string(),
            geometry: self.geometry,
            pages,
            trace: self.trace,
            preamble_end,
            diagnostics: self.diagnostics,
            fonts,
            images,
        }
    }

    fn preamble(&mut self, title: &str, url: &str) {
        let margin = self.geometry.margin;
        self.canvas.set_style(StyleContext::title());
        self.canvas.text(margin, self.cursor.y, title);
        self.cursor.y += 10.0;

        self.canvas.set_style(StyleContext::source_line());
        self.canvas
            .text(margin, self.cursor.y, &format!("Source: {url}"));
        self.cursor.y += 20.0;

        self.canvas.set_style(StyleContext::body());
    }

    fn break_page(&mut self, line: usize) {
        self.canvas.add_page();
        self.cursor.page += 1;
        self.cursor.y = self.geometry.margin;
        log::debug!(
            "Page break before line {line}: now on page {}",
            self.canvas.page_count()
        );
    }

    fn place(&mut self, line: usize, block: &Block) {
        let margin = self.geometry.margin;
        match block {
            Block::Heading1(text) => {
                self.canvas.set_style(StyleContext::heading1());
                self.canvas.text(margin, self.cursor.y, text);
                self.cursor.y += 10.0;
            }
            Block::Heading2(text) => {
                self.cursor.y += 5.0;
                self.canvas.set_style(StyleContext::heading2());
                self.canvas.text(margin, self.cursor.y, text);
                self.cursor.y += 8.0;
            }
            Block::BulletItem(text) => {
                let bulleted = format!("{BULLET_PREFIX}{text}");
                self.flow_text(&bulleted, margin + BULLET_INDENT);
            }
            Block::Paragraph(text) => self.flow_text(text, margin),
            Block::Blank => self.cursor.y += LINE_HEIGHT / 2.0,
            Block::ImageRef { alt, id } => self.image(line, alt, id),
            Block::Placeholder(caption) => self.placeholder(caption),
        }
    }

    /// Wrap to the usable width and advance one line height per wrapped line.
    fn flow_text(&mut self, text: &str, x: f32) {
        let style = self.canvas.style();
        let lines: Vec<PlacedLine> = wrap_text(text, &style, self.geometry.usable_width())
            .into_iter()
            .map(|text| PlacedLine { x, text })
            .collect();
        let count = lines.len();
        self.canvas.text_block(self.cursor.y, lines);
        self.cursor.y += LINE_HEIGHT * count as f32;
    }

    fn image(&mut self, line: usize, alt: &str, id: &str) {
        let margin = self.geometry.margin;
        let registry = self.registry;
        let Some(resource) = registry.lookup(id) else {
            log::debug!("Line {line}: image '{id}' not in registry, drawing fallback text");
            self.diagnostics.push(Diagnostic::ImageMissing {
                line,
                resource_id: id.to_string(),
            });
            self.canvas.set_style(StyleContext::missing_image());
            self.canvas
                .text(margin, self.cursor.y, &format!("[Image missing: {alt}]"));
            self.cursor.y += 10.0;
            return;
        };

        // Image and caption travel together.
        if self.cursor.y + IMAGE_HEIGHT + 10.0 > self.geometry.bottom_bound {
            self.break_page(line);
        }

        let x = margin + (self.geometry.usable_width() - IMAGE_WIDTH) / 2.0;
        let placed = self.canvas.image(
            id,
            &resource.data,
            x,
            self.cursor.y,
            IMAGE_WIDTH,
            IMAGE_HEIGHT,
        );
        self.cursor.y += IMAGE_HEIGHT + 5.0;

        match placed {
            Ok(()) => {
                let style = StyleContext::caption();
                self.canvas.set_style(style);
                let caption = format!("Figure: {alt}");
                let caption_x = (self.geometry.width - measure_text_width(&caption, &style)) / 2.0;
                self.canvas.text(caption_x, self.cursor.y, &caption);
                self.cursor.y += 10.0;
            }
            Err(e) => {
                // The reserved image space stays empty and no caption is drawn.
                log::warn!("Line {line}: failed to add image '{id}' to PDF: {e}");
                self.diagnostics.push(Diagnostic::ImageSkipped {
                    line,
                    resource_id: id.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn placeholder(&mut self, caption: &str) {
        let margin = self.geometry.margin;
        let usable = self.geometry.usable_width();
        self.cursor.y += 5.0;
        self.canvas
            .rect(margin, self.cursor.y, usable, PLACEHOLDER_HEIGHT, 240, 200);

        let style = StyleContext::placeholder();
        self.canvas.set_style(style);
        let lines: Vec<PlacedLine> = wrap_text(caption, &style, usable - 10.0)
            .into_iter()
            .map(|text| PlacedLine {
                x: margin + (usable - measure_text_width(&text, &style)) / 2.0,
                text,
            })
            .collect();
        self.canvas.text_block(self.cursor.y + 20.0, lines);
        self.cursor.y += 50.0;
    }
}
