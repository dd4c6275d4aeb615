//! End-to-end overlay tests: configuration, session cascade and layout
//! against in-memory page images.

use image::{Rgba, RgbaImage};
use overlay::{
    parse_page_config, Anchor, Background, ColorSource, EditorSession, LayoutConfig,
    OverlayRenderer, PageImage, PageType, Position, ResolvedBackground, Rgb, TextSpecification,
};
use pretty_assertions::assert_eq;
use text_wrap::{FixedAdvanceMeasurer, TextMeasurer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("overlay=debug,page_core=debug")
        .with_test_writer()
        .try_init();
}

fn renderer() -> OverlayRenderer<FixedAdvanceMeasurer> {
    OverlayRenderer::new(LayoutConfig::default(), FixedAdvanceMeasurer::default())
}

fn light_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([235, 230, 220, 255]))
}

#[test]
fn test_preview_layout_end_to_end() {
    init_tracing();
    let renderer = renderer();
    let pixels = light_page(1200, 1600);
    let page = PageImage::new(&pixels).with_original_width(4096);
    let spec = TextSpecification::new("The quick brown fox jumps over the lazy dog");

    let overlay = renderer.layout(&page, &spec, "single").unwrap();

    assert_eq!(overlay.scale_factor, 1200.0 / 4096.0);
    assert_eq!(overlay.font_size_px, 240.0 * 1200.0 / 4096.0);
    assert_eq!(
        overlay.lines.as_slice(),
        ["The quick brown fox", "jumps over the lazy", "dog"]
    );
    assert_eq!(overlay.bounds_px.left, 225.0);
    assert_eq!(overlay.bounds_px.width, 750.0);
    assert_eq!(overlay.bounds_px.bottom(), 1375.0);
    assert_eq!(overlay.anchor, Anchor::Bottom);
    assert_eq!(overlay.color, Rgb::BLACK);
    assert_eq!(overlay.color_source, ColorSource::Sampled);

    let measurer = FixedAdvanceMeasurer::default();
    for line in overlay.lines.iter() {
        let width = measurer.measure_text_width(line, &overlay.font_family, overlay.font_size_px);
        assert!(width <= overlay.bounds_px.width);
    }
}

#[test]
fn test_spread_pages_mirror_gutter() {
    let renderer = renderer();
    let pixels = light_page(2048, 1400);
    let page = PageImage::new(&pixels);
    let spec = TextSpecification::new("Side by side");

    let start = renderer.layout(&page, &spec, "spread-start").unwrap();
    let companion = renderer.layout(&page, &spec, "spread-companion").unwrap();

    assert_eq!(start.page_type, PageType::SpreadLeft);
    assert_eq!(companion.page_type, PageType::SpreadRight);
    assert_eq!(start.bounds_px.left, 225.0);
    assert_eq!(companion.bounds_px.left, 300.0);
    assert_eq!(start.bounds_px.width, companion.bounds_px.width);
}

#[test]
fn test_unknown_page_type_is_single() {
    let renderer = renderer();
    let pixels = light_page(1000, 1000);
    let page = PageImage::new(&pixels);
    let overlay = renderer
        .layout(&page, &TextSpecification::new("x"), "cover")
        .unwrap();
    assert_eq!(overlay.page_type, PageType::Single);
}

#[test]
fn test_config_json_changes_safe_zone() {
    let config = LayoutConfig::from_json(r#"{ "dpi": 100, "defaultPrintFontSize": 100 }"#).unwrap();
    let renderer = OverlayRenderer::new(config, FixedAdvanceMeasurer::default());
    let pixels = light_page(1000, 1000);
    let page = PageImage::new(&pixels).with_original_width(1000);

    let overlay = renderer
        .layout(&page, &TextSpecification::new("Hi"), "single")
        .unwrap();
    assert_eq!(overlay.safe_zone.left, 75);
    assert_eq!(overlay.bounds_px.width, 850.0);
    assert_eq!(overlay.font_size_px, 100.0);
}

#[test]
fn test_session_layout_uses_global_color() {
    init_tracing();
    let json = r#"{
        "globalDefaults": { "colorMode": "manual", "manualColor": [200, 10, 10] },
        "pages": [
            {
                "pageNumber": 1,
                "type": "single",
                "text": { "content": "Red text", "useGlobal": true }
            },
            {
                "pageNumber": 2,
                "type": "single",
                "text": { "content": "Own color", "color": [0, 0, 255] }
            }
        ]
    }"#;
    let session = parse_page_config(json).unwrap().to_session();
    let renderer = renderer();
    let pixels = RgbaImage::from_pixel(1200, 1600, Rgba([10, 10, 10, 255]));
    let page = PageImage::new(&pixels);

    let first = session.layout_page(1, &renderer, &page).unwrap();
    assert_eq!(first.color, Rgb::new(200, 10, 10));
    assert_eq!(first.color_source, ColorSource::Explicit);

    let second = session.layout_page(2, &renderer, &page).unwrap();
    assert_eq!(second.color, Rgb::new(0, 0, 255));
}

#[test]
fn test_session_auto_color_samples_page() {
    let mut session = EditorSession::new();
    session.set_page_text(
        4,
        "single",
        TextSpecification::new("Night").with_position(Position::Top),
    );
    let renderer = renderer();
    let pixels = RgbaImage::from_pixel(1200, 1600, Rgba([5, 5, 20, 255]));

    let overlay = session
        .layout_page(4, &renderer, &PageImage::new(&pixels))
        .unwrap();
    assert_eq!(overlay.color, Rgb::WHITE);
    assert_eq!(overlay.bounds_px.top, 225.0);
}

#[test]
fn test_drag_then_layout_is_manual() {
    let mut session = EditorSession::new();
    session.set_page_text(1, "single", TextSpecification::new("Moved"));
    session.move_overlay(1, 50.0, 25.0).unwrap();

    let renderer = renderer();
    let pixels = light_page(800, 600);
    let overlay = session
        .layout_page(1, &renderer, &PageImage::new(&pixels))
        .unwrap();

    assert_eq!(overlay.anchor, Anchor::Manual);
    assert_eq!(overlay.bounds_px.left, 400.0);
    assert_eq!(overlay.bounds_px.top, 150.0);
    assert_eq!(overlay.margins_percent, None);
}

#[test]
fn test_export_after_edits() {
    let mut session = EditorSession::new();
    session.set_page_text(1, "single", TextSpecification::new("One"));
    session.set_page_text(2, "single", TextSpecification::new("Two"));
    session.set_display_font_size(2, 35.0, 0.5).unwrap();
    session.resize_overlay(1, 40.0, 5.0, 6.0).unwrap();

    let export = session.export_text_settings(None);
    let json: serde_json::Value = serde_json::from_str(&export.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["globalDefaults"]["fontSize"], 240.0);
    assert_eq!(json["pages"][0]["text"]["widthPercent"], 40.0);
    assert_eq!(json["pages"][1]["text"]["fontSize"], 70.0);
    assert_eq!(json["_metadata"]["pagesWithOverrides"], 1);
    assert_eq!(json["_metadata"]["totalPages"], 2);
}

#[test]
fn test_background_resolves_defaults() {
    let renderer = renderer();
    let pixels = light_page(1200, 1600);
    let mut spec = TextSpecification::new("Boxed");
    spec.background = Some(Background {
        color: None,
        padding: Some(8.0),
    });

    let overlay = renderer
        .layout(&PageImage::new(&pixels), &spec, "single")
        .unwrap();
    let expected = ResolvedBackground {
        color: Rgb::WHITE,
        padding: 8.0,
    };
    assert_eq!(overlay.background, Some(expected));
}

#[test]
fn test_zero_font_size_in_config_uses_default() {
    let json = r#"{
        "pages": [
            { "pageNumber": 1, "type": "single", "text": { "content": "Tiny", "fontSize": 0 } }
        ]
    }"#;
    let session = parse_page_config(json).unwrap().to_session();
    let pixels = light_page(1024, 1024);
    let page = PageImage::new(&pixels);

    let overlay = session.layout_page(1, &renderer(), &page).unwrap();
    assert_eq!(overlay.print_font_size, 240.0);
    assert_eq!(overlay.font_size_px, 60.0);
    assert!(overlay.bounds_px.height > 0.0);
}
