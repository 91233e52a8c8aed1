mod common;

use guide_pdf::{
    Guide, PageSize, RenderConfig, ResourceRegistry, Screenshot, export_guide, render_guide,
    render_markdown, suggested_filename,
};

fn uncompressed() -> RenderConfig {
    RenderConfig {
        compress: false,
        ..RenderConfig::default()
    }
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

#[test]
fn renders_a_pdf_document() {
    common::init_logger();
    let out = render_markdown(
        "# Intro\n\nWelcome.",
        "https://app.example.com",
        &ResourceRegistry::new(),
        &RenderConfig::default(),
    )
    .expect("render");

    assert!(out.bytes.starts_with(b"%PDF-"));
    assert_eq!(out.page_count, 1);
    assert!(out.diagnostics.is_empty());
    assert!(common::contains(&out.bytes, "/FlateDecode"));
}

#[test]
fn text_lands_in_uncompressed_content_streams() {
    common::init_logger();
    let out = render_markdown(
        "![Shot](missing_id)\n- item",
        "https://app.example.com",
        &ResourceRegistry::new(),
        &uncompressed(),
    )
    .expect("render");

    assert!(common::contains(&out.bytes, "Image missing: Shot"));
    assert!(common::contains(&out.bytes, "Source: https://app.example.com"));
    assert!(common::contains(&out.bytes, "/Helvetica-Bold"));
    assert!(common::contains(&out.bytes, "/Courier"));
    assert!(common::contains(&out.bytes, "/WinAnsiEncoding"));
    assert_eq!(out.diagnostics.len(), 1);
}

#[test]
fn identical_input_gives_identical_bytes() {
    let registry = common::registry_with_jpeg(&["home"]);
    let mut guide = Guide::new(
        "# Guide\n![Home](home)\n[SCREENSHOT: menu]\nDone.",
        "https://app.example.com",
    );
    guide.timestamp = "2024-03-05T10:20:30Z".into();
    let config = RenderConfig::default();

    let first = render_guide(&guide, &registry, &config).expect("first render");
    let second = render_guide(&guide, &registry, &config).expect("second render");
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn repeated_image_is_embedded_once() {
    let registry = common::registry_with_jpeg(&["home"]);
    let out = render_markdown(
        "![A](home)\n![B](home)\n![C](home)\n![D](home)",
        "",
        &registry,
        &uncompressed(),
    )
    .expect("render");

    assert_eq!(out.page_count, 2);
    assert_eq!(count(&out.bytes, "/Subtype /Image"), 1);
    assert!(common::contains(&out.bytes, "/DCTDecode"));
}

#[test]
fn jpeg_color_space_follows_frame_components() {
    let mut registry = ResourceRegistry::new();
    registry.insert("gray", "", common::gray_jpeg_bytes(12, 9));
    registry.insert("rgb", "", common::jpeg_bytes(12, 9));
    let out = render_markdown("![Gray](gray)\n![Rgb](rgb)", "", &registry, &uncompressed())
        .expect("render");

    assert!(out.diagnostics.is_empty());
    assert_eq!(count(&out.bytes, "/DeviceGray"), 1);
    assert_eq!(count(&out.bytes, "/DeviceRGB"), 1);
    assert!(common::contains(&out.bytes, "/Width 12"));
    assert!(common::contains(&out.bytes, "/Height 9"));
}

#[test]
fn truncated_or_unknown_payloads_are_skipped() {
    let jpeg = common::jpeg_bytes(12, 9);
    let mut png = common::png_bytes(4, 4, 255);
    png[12..16].copy_from_slice(b"XXXX");

    let mut registry = ResourceRegistry::new();
    registry.insert("cut", "", jpeg[..20].to_vec());
    registry.insert("nohdr", "", png);
    registry.insert("gif", "", b"GIF89a\x01\x00\x01\x00".to_vec());
    let out = render_markdown(
        "![Cut](cut)\n![NoHdr](nohdr)\n![Gif](gif)",
        "",
        &registry,
        &uncompressed(),
    )
    .expect("render");

    assert_eq!(out.diagnostics.len(), 3);
    assert!(
        out.diagnostics
            .iter()
            .all(|d| matches!(d, guide_pdf::Diagnostic::ImageSkipped { .. }))
    );
    assert_eq!(count(&out.bytes, "/Subtype /Image"), 0);
}

#[test]
fn png_with_alpha_gets_a_soft_mask() {
    let mut registry = ResourceRegistry::new();
    registry.insert("logo", "", common::png_bytes(8, 8, 128));
    registry.insert("opaque", "", common::png_bytes(8, 8, 255));
    let out = render_markdown("![Logo](logo)\n![Opaque](opaque)", "", &registry, &uncompressed())
        .expect("render");

    assert!(out.diagnostics.is_empty());
    assert_eq!(count(&out.bytes, "/Subtype /Image"), 3);
    assert_eq!(count(&out.bytes, "/SMask"), 1);
}

#[test]
fn document_info_carries_guide_metadata() {
    let mut guide = Guide::new("Body", "https://app.example.com/docs");
    guide.title = "Admin Handbook".into();
    guide.timestamp = "2024-03-05T10:20:30+02:00".into();
    let out = render_guide(&guide, &ResourceRegistry::new(), &uncompressed()).expect("render");

    assert!(common::contains(&out.bytes, "(Admin Handbook)"));
    assert!(common::contains(&out.bytes, "(Source: https://app.example.com/docs)"));
    assert!(common::contains(&out.bytes, "(guide-pdf)"));
    assert!(common::contains(&out.bytes, "D:20240305102030+02'00"));
}

#[test]
fn config_title_overrides_guide_title() {
    let guide = Guide::new("Body", "");
    let config = RenderConfig {
        title: Some("Custom Title".into()),
        ..uncompressed()
    };
    let out = render_guide(&guide, &ResourceRegistry::new(), &config).expect("render");
    assert!(common::contains(&out.bytes, "Custom Title"));
    assert!(!common::contains(&out.bytes, "User Guide"));
}

#[test]
fn letter_pages_use_letter_media_box() {
    let config = RenderConfig {
        page_size: PageSize::Letter,
        ..uncompressed()
    };
    let out = render_markdown("Body", "", &ResourceRegistry::new(), &config).expect("render");
    // 8.5 x 11 in; A4 would start with 595.
    assert!(common::contains(&out.bytes, "/MediaBox [0 0 61"));
    assert!(!common::contains(&out.bytes, "/MediaBox [0 0 595"));
}

#[test]
fn export_writes_timestamped_file() {
    common::init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    let mut guide = Guide::new("# Export\n![Home](home)", "https://app.example.com");
    guide.timestamp = "2024-01-01T00:00:00Z".into();
    guide.screenshots.push(Screenshot {
        id: "home".into(),
        description: "Home screen".into(),
        data: common::data_uri("image/jpeg", &common::jpeg_bytes(16, 16)),
    });
    let registry = ResourceRegistry::from_screenshots(&guide.screenshots);

    let path = export_guide(&guide, &registry, &RenderConfig::default(), dir.path())
        .expect("export");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("User_Guide_1704067200000.pdf")
    );
    let bytes = std::fs::read(&path).expect("read output");
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(suggested_filename(1704067200000), "User_Guide_1704067200000.pdf");
}

#[test]
fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does/not/exist");
    let guide = Guide::new("Body", "");
    let err = export_guide(&guide, &ResourceRegistry::new(), &RenderConfig::default(), &missing)
        .unwrap_err();
    assert!(matches!(err, guide_pdf::Error::Io(_)));
}
