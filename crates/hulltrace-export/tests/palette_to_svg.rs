//! Integration test: extract a palette from a synthetic image, trace it
//! through the full pipeline, and export to SVG.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{Rgba, RgbaImage};

use hulltrace_pipeline::{Color, PathSegment, PixelBuffer, TraceConfig, extract_palette};

const SKY: Rgba<u8> = Rgba([40, 120, 220, 255]);
const SUN: Rgba<u8> = Rgba([250, 200, 20, 255]);
const GROUND: Rgba<u8> = Rgba([30, 160, 60, 255]);

/// 64x48 scene: sky on top, ground in the bottom third, and a round sun
/// floating in the sky away from every image edge.
fn scene() -> RgbaImage {
    RgbaImage::from_fn(64, 48, |x, y| {
        let dx = f64::from(x) - 40.0;
        let dy = f64::from(y) - 14.0;
        if dx.hypot(dy) <= 8.0 {
            SUN
        } else if y >= 32 {
            GROUND
        } else {
            SKY
        }
    })
}

fn color(px: Rgba<u8>) -> Color {
    Color::new(px[0], px[1], px[2])
}

#[test]
fn scene_pipeline_to_svg() {
    let image = scene();
    let buffer = PixelBuffer::from_rgba_image(&image).unwrap();

    let palette = extract_palette(&buffer, 1, hulltrace_pipeline::palette::DEFAULT_MIN_ALPHA);
    assert_eq!(palette, vec![color(SKY), color(SUN), color(GROUND)]);

    let config = TraceConfig::default();
    let trace = hulltrace_pipeline::trace(&buffer, &palette, config.clone())
        .expect("trace should succeed");
    assert_eq!(trace.regions().len(), 3);

    for region in trace.regions() {
        let segments = region.path_segments();
        assert!(!segments.is_empty(), "region {} has no outline", region.color());
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        assert_eq!(segments[segments.len() - 1].end(), segments[0].start());
        assert_eq!(region.numeric_anomalies(), 0);
    }

    // The ground spans the full width along the bottom edge, so its outline
    // keeps straight frame lines.
    let ground = trace.region_by_color(color(GROUND)).unwrap();
    let bottom_lines = ground
        .path_segments()
        .iter()
        .filter(|s| matches!(s, PathSegment::Line { p0, p1 } if p0.y == 47.0 && p1.y == 47.0))
        .count();
    assert!(bottom_lines >= 1);

    // The sun never touches the frame: a closed free shape of curves only.
    // A single closed run may fit with as few as one or two cubics.
    let sun = trace.region_by_color(color(SUN)).unwrap();
    assert!(sun.path_segments().iter().all(|s| !s.is_line()));
    assert_eq!(sun.cubics().len(), sun.path_segments().len());

    let json = serde_json::to_string(&config).unwrap();
    let meta = hulltrace_export::SvgMetadata {
        title: Some("scene"),
        description: None,
        config_json: Some(&json),
    };
    let svg = hulltrace_export::to_svg(&trace, &meta);

    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"width="64""#));
    assert!(svg.contains(r#"height="48""#));
    assert_eq!(svg.matches("<path").count(), 3);
    assert!(svg.contains("rgb(250,200,20)"));
    assert!(svg.contains("</svg>"));
}

#[test]
fn empty_image_is_rejected() {
    let image = RgbaImage::new(0, 0);
    let err = PixelBuffer::from_rgba_image(&image).unwrap_err();
    assert!(err.is_invalid_input());
}
