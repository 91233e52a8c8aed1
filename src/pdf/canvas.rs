use std::collections::{BTreeSet, HashMap};

use super::embed::{DecodedImage, decode};
use super::layout::{LINE_HEIGHT_FACTOR, PT_PER_MM};
use super::style::StyleContext;
use crate::error::Error;
use crate::fonts::BuiltinFont;

/// One text line of a block, already positioned horizontally (mm).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub text: String,
}

/// A draw primitive in page coordinates: millimetres, `y` measured down from
/// the top edge. Text `y` is the baseline; image and rect `y` is the top edge.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: StyleContext,
    },
    /// Consecutive lines sharing a style; line `n` sits `n * leading` below `y`.
    TextBlock {
        y: f32,
        leading: f32,
        lines: Vec<PlacedLine>,
        style: StyleContext,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: usize,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_gray: u8,
        stroke_gray: u8,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text string on the page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::Text { text, .. } => out.push(text.as_str()),
                DrawOp::TextBlock { lines, .. } => {
                    out.extend(lines.iter().map(|l| l.text.as_str()))
                }
                _ => {}
            }
        }
        out
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

/// Append-only page list plus the active style. Pages are never revisited
/// once a newer one is started.
pub(super) struct Canvas {
    pages: Vec<Page>,
    style: StyleContext,
    fonts: BTreeSet<BuiltinFont>,
    images: Vec<DecodedImage>,
    image_index: HashMap<String, usize>,
}

impl Canvas {
    pub(super) fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            style: StyleContext::body(),
            fonts: BTreeSet::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
        }
    }

    pub(super) fn style(&self) -> StyleContext {
        self.style
    }

    pub(super) fn set_style(&mut self, style: StyleContext) {
        self.style = style;
    }

    pub(super) fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    pub(super) fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub(super) fn text(&mut self, x: f32, y: f32, text: &str) {
        self.fonts.insert(self.style.font());
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style: self.style,
        });
    }

    /// Emit wrapped lines with the backend's own leading.
    pub(super) fn text_block(&mut self, y: f32, lines: Vec<PlacedLine>) {
        self.fonts.insert(self.style.font());
        let leading = self.style.size * LINE_HEIGHT_FACTOR / PT_PER_MM;
        self.push(DrawOp::TextBlock {
            y,
            leading,
            lines,
            style: self.style,
        });
    }

    pub(super) fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_gray: u8,
        stroke_gray: u8,
    ) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill_gray,
            stroke_gray,
        });
    }

    /// Place an image, decoding it on first use. On failure nothing is drawn.
    pub(super) fn image(
        &mut self,
        key: &str,
        data: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error> {
        let image = match self.image_index.get(key) {
            Some(&idx) => idx,
            None => {
                let decoded = decode(data)?;
                self.images.push(decoded);
                let idx = self.images.len() - 1;
                self.image_index.insert(key.to_string(), idx);
                idx
            }
        };
        self.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            image,
        });
        Ok(())
    }

    pub(super) fn into_parts(self) -> (Vec<Page>, BTreeSet<BuiltinFont>, Vec<DecodedImage>) {
        (self.pages, self.fonts, self.images)
    }
}
