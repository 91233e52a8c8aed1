mod canvas;
mod embed;
mod layout;
mod paginator;
mod style;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::RenderConfig;
use crate::error::Error;
use crate::fonts::{BuiltinFont, register_font, to_winansi_bytes};
use crate::model::Guide;
use crate::registry::ResourceRegistry;

pub use canvas::{DrawOp, Page, PlacedLine};
pub use layout::{measure_text_width, wrap_text};
pub use paginator::{
    Cursor, CursorStep, Diagnostic, IMAGE_HEIGHT, IMAGE_WIDTH, LINE_HEIGHT, MARGIN, PageGeometry,
    PLACEHOLDER_HEIGHT,
};
pub use style::{FontFamily, FontWeight, StyleContext};

use embed::{DecodedImage, write_xobject};
use layout::PT_PER_MM;
use paginator::Paginator;

/// Result of the flow layout: every page with its draw primitives, plus the
/// cursor trace and anything that was degraded on the way.
pub struct LaidOutDocument {
    pub title: String,
    pub url: String,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub trace: Vec<CursorStep>,
    /// Cursor `y` once the title block is written.
    pub preamble_end: f32,
    pub diagnostics: Vec<Diagnostic>,
    fonts: BTreeSet<BuiltinFont>,
    images: Vec<DecodedImage>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

pub fn layout(
    guide: &Guide,
    registry: &ResourceRegistry,
    config: &RenderConfig,
) -> LaidOutDocument {
    let blocks = crate::markdown::classify_document(&guide.content);
    let title = config.title.as_deref().unwrap_or(&guide.title);
    let geometry = PageGeometry::for_size(config.page_size);
    Paginator::new(geometry, registry).run(title, &guide.url, &blocks)
}

fn gray(level: u8) -> f32 {
    level as f32 / 255.0
}

/// Tracks font and fill state across a content stream so unchanged state is not re-emitted.
struct PageWriter<'a> {
    content: Content,
    page_height_pt: f32,
    font_names: &'a BTreeMap<BuiltinFont, String>,
    image_names: &'a [String],
    cur_font: Option<(BuiltinFont, f32)>,
    cur_gray: u8,
}

impl<'a> PageWriter<'a> {
    fn set_text_style(&mut self, style: &StyleContext) {
        let font = style.font();
        if self.cur_font != Some((font, style.size)) {
            if let Some(name) = self.font_names.get(&font) {
                self.content.set_font(Name(name.as_bytes()), style.size);
            }
            self.cur_font = Some((font, style.size));
        }
        if self.cur_gray != style.gray {
            self.content.set_fill_gray(gray(style.gray));
            self.cur_gray = style.gray;
        }
    }

    fn x(&self, x_mm: f32) -> f32 {
        x_mm * PT_PER_MM
    }

    fn y(&self, y_mm: f32) -> f32 {
        self.page_height_pt - y_mm * PT_PER_MM
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Text { x, y, text, style } => {
                self.set_text_style(style);
                let (px, py) = (self.x(*x), self.y(*y));
                self.content
                    .begin_text()
                    .next_line(px, py)
                    .show(Str(&to_winansi_bytes(text)))
                    .end_text();
            }
            DrawOp::TextBlock {
                y,
                leading,
                lines,
                style,
            } => {
                self.set_text_style(style);
                self.content.begin_text();
                let mut td_x = 0.0_f32;
                let mut td_y = 0.0_f32;
                for (i, line) in lines.iter().enumerate() {
                    let lx = self.x(line.x);
                    let ly = self.y(*y + *leading * i as f32);
                    self.content.next_line(lx - td_x, ly - td_y);
                    td_x = lx;
                    td_y = ly;
                    self.content.show(Str(&to_winansi_bytes(&line.text)));
                }
                self.content.end_text();
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                let Some(name) = self.image_names.get(*image) else {
                    return;
                };
                let (w, h) = (width * PT_PER_MM, height * PT_PER_MM);
                let (px, py) = (self.x(*x), self.y(*y + *height));
                self.content.save_state();
                self.content.transform([w, 0.0, 0.0, h, px, py]);
                self.content.x_object(Name(name.as_bytes()));
                self.content.restore_state();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill_gray,
                stroke_gray,
            } => {
                let (px, py) = (self.x(*x), self.y(*y + *height));
                self.content.save_state();
                self.content.set_fill_gray(gray(*fill_gray));
                self.content.set_stroke_gray(gray(*stroke_gray));
                self.content.set_line_width(0.2 * PT_PER_MM);
                self.content.rect(px, py, width * PT_PER_MM, height * PT_PER_MM);
                self.content.fill_nonzero_and_stroke();
                self.content.restore_state();
            }
        }
    }
}

fn creation_date(timestamp: &str) -> Option<Date> {
    let dt = chrono::DateTime::parse_from_rfc3339(timestamp).ok()?;
    let offset_min = dt.offset().local_minus_utc() / 60;
    Some(
        Date::new(u16::try_from(dt.year()).ok()?)
            .month(dt.month() as u8)
            .day(dt.day() as u8)
            .hour(dt.hour() as u8)
            .minute(dt.minute() as u8)
            .second(dt.second() as u8)
            .utc_offset_hour((offset_min / 60) as i8)
            .utc_offset_minute((offset_min % 60).unsigned_abs() as u8),
    )
}

/// Serialize a laid-out document. Identical input gives identical bytes.
/// `timestamp` becomes the creation date when it is RFC 3339.
pub fn write_pdf(
    doc: &LaidOutDocument,
    timestamp: &str,
    config: &RenderConfig,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    if doc.pages.is_empty() {
        return Err(Error::Pdf("document has no pages".into()));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Fonts: one dictionary per built-in face actually drawn with
    let mut font_names: BTreeMap<BuiltinFont, String> = BTreeMap::new();
    let mut font_pairs: Vec<(String, Ref)> = Vec::new();
    for (i, &font) in doc.fonts.iter().enumerate() {
        let entry = register_font(&mut pdf, font, format!("F{}", i + 1), &mut alloc);
        font_names.insert(entry.font, entry.pdf_name.clone());
        font_pairs.push((entry.pdf_name, entry.font_ref));
    }

    // Images: each decoded payload once, shared by every page that shows it
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    for img in &doc.images {
        let xobj_ref = write_xobject(&mut pdf, img, &mut alloc);
        image_xobjects.push((format!("Im{}", image_xobjects.len() + 1), xobj_ref));
    }
    let image_names: Vec<String> = image_xobjects.iter().map(|(n, _)| n.clone()).collect();

    let t_resources = t0.elapsed();

    let page_width_pt = doc.geometry.width * PT_PER_MM;
    let page_height_pt = doc.geometry.height * PT_PER_MM;

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages.iter().enumerate() {
        let mut writer = PageWriter {
            content: Content::new(),
            page_height_pt,
            font_names: &font_names,
            image_names: &image_names,
            cur_font: None,
            cur_gray: 0,
        };
        for op in &page.ops {
            writer.draw(op);
        }
        let raw = writer.content.finish();
        if config.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        } else {
            pdf.stream(content_ids[i], raw.as_slice());
        }
    }

    let t_content = t0.elapsed();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_width_pt, page_height_pt))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    {
        let subject = format!("Source: {}", doc.url);
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(&doc.title))
            .subject(TextStr(&subject))
            .creator(TextStr("guide-pdf"));
        if let Some(date) = creation_date(timestamp) {
            info.creation_date(date);
        }
    }

    let bytes = pdf.finish();

    log::info!(
        "PDF assembly: resources={:.1}ms, content={:.1}ms, total={:.1}ms ({} pages, {} fonts, {} images, {} bytes)",
        t_resources.as_secs_f64() * 1000.0,
        (t_content - t_resources).as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
        n,
        font_pairs.len(),
        image_xobjects.len(),
        bytes.len(),
    );

    Ok(bytes)
}
