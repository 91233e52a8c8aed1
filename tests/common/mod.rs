#![allow(dead_code)]

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use guide_pdf::{Guide, LaidOutDocument, RenderConfig, ResourceRegistry, layout_guide};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf
}

pub fn gray_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_pixel(width, height, Luma([90]));
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("encode gray jpeg");
    buf
}

pub fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([220, 30, 30, alpha]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// `data:` URI the way the browser capture stage hands screenshots over.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub fn registry_with_jpeg(ids: &[&str]) -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    for id in ids {
        registry.insert(id, &format!("{id} screen"), jpeg_bytes(32, 24));
    }
    registry
}

pub fn lay_out(lines: &[&str], registry: &ResourceRegistry) -> LaidOutDocument {
    init_logger();
    let guide = Guide::new(lines.join("\n"), "https://app.example.com");
    layout_guide(&guide, registry, &RenderConfig::default())
}

/// `count` one-line paragraphs; each advances the cursor by exactly one line height.
pub fn filler(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Filler line {i}.")).collect()
}

pub fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}
