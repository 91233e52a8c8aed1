mod config;
mod error;
mod fonts;
pub mod markdown;
mod model;
mod pdf;
mod registry;

pub use config::{PageSize, RenderConfig};
pub use error::{Error, Result};
pub use fonts::BuiltinFont;
pub use model::{Block, DEFAULT_TITLE, Guide, Screenshot};
pub use pdf::{
    Cursor, CursorStep, Diagnostic, DrawOp, FontFamily, FontWeight, IMAGE_HEIGHT, IMAGE_WIDTH,
    LINE_HEIGHT, LaidOutDocument, MARGIN, PLACEHOLDER_HEIGHT, Page, PageGeometry, PlacedLine,
    StyleContext, measure_text_width, wrap_text,
};
pub use registry::{Resource, ResourceRegistry, decode_payload, load_manifest};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// A finished artifact and what was degraded while producing it.
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lay out the guide without serializing it.
pub fn layout_guide(
    guide: &Guide,
    registry: &ResourceRegistry,
    config: &RenderConfig,
) -> LaidOutDocument {
    pdf::layout(guide, registry, config)
}

pub fn render_guide(
    guide: &Guide,
    registry: &ResourceRegistry,
    config: &RenderConfig,
) -> Result<RenderOutput> {
    let t0 = Instant::now();

    let doc = pdf::layout(guide, registry, config);
    let t_layout = t0.elapsed();

    let bytes = pdf::write_pdf(&doc, &guide.timestamp, config)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, assembly={:.1}ms, total={:.1}ms ({} pages, {} diagnostics, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.page_count(),
        doc.diagnostics.len(),
        bytes.len(),
    );

    Ok(RenderOutput {
        bytes,
        page_count: doc.page_count(),
        diagnostics: doc.diagnostics,
    })
}

/// Render bare markdown with the default title and no timestamp.
pub fn render_markdown(
    markdown: &str,
    url: &str,
    registry: &ResourceRegistry,
    config: &RenderConfig,
) -> Result<RenderOutput> {
    render_guide(&Guide::new(markdown, url), registry, config)
}

pub fn suggested_filename(timestamp_millis: i64) -> String {
    format!("User_Guide_{timestamp_millis}.pdf")
}

/// Render and write `User_Guide_<millis>.pdf` into `dir`. The guide's own
/// timestamp names the file when it parses; the current time otherwise.
pub fn export_guide(
    guide: &Guide,
    registry: &ResourceRegistry,
    config: &RenderConfig,
    dir: &Path,
) -> Result<PathBuf> {
    let output = render_guide(guide, registry, config)?;
    let millis = guide
        .timestamp_millis()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let path = dir.join(suggested_filename(millis));
    std::fs::write(&path, &output.bytes).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    log::info!("Wrote {} ({} pages)", path.display(), output.page_count);
    Ok(path)
}
