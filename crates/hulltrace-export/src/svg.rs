//! SVG export serializer.
//!
//! Converts a [`Trace`] into an SVG string using the [`svg`] crate for
//! document construction and XML escaping. Each valid region becomes one
//! filled `<path>` whose data mixes `L` (line to) and `C` (cubic to)
//! commands and closes with `Z`.
//!
//! Path coordinates are written by [`format_number`] rather than the
//! `svg` crate's own `Data` formatter: 3 decimal places, shortest form.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and the trace
//! configuration as JSON inside `<metadata>`.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::fmt::Write;

use svg::Document;
use svg::node::element::{Circle, Description, Element, Path, Title};
use svg::node::{Node, Text};

use hulltrace_pipeline::{PathSegment, Point, Region, Trace};

/// Namespace of the `<hulltrace:config>` metadata element.
const METADATA_NAMESPACE: &str = "urn:hulltrace:1";

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped automatically by
/// the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized [`TraceConfig`](hulltrace_pipeline::TraceConfig) JSON,
    /// emitted inside `<metadata>` wrapped in a namespaced
    /// `<hulltrace:config>` element.
    pub config_json: Option<&'a str>,
}

/// Format a coordinate rounded to 3 decimal places in its shortest form.
///
/// Trailing zeros and the decimal point are dropped (`2.0` -> `"2"`) and
/// negative zero prints as `"0"`.
///
/// # Examples
///
/// ```
/// use hulltrace_export::svg::format_number;
///
/// assert_eq!(format_number(1.23456), "1.235");
/// assert_eq!(format_number(2.0), "2");
/// assert_eq!(format_number(-0.0001), "0");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return String::from("0");
    }
    rounded.to_string()
}

fn coords(p: Point) -> String {
    format!("{} {}", format_number(p.x), format_number(p.y))
}

/// Build the SVG path `d` attribute for a region's outline.
///
/// `M` moves to the first segment's start; each segment then appends
/// `L x y` or `C x1 y1, x2 y2, x y`; `Z` closes the path. Returns an
/// empty string when the region has no segments.
///
/// # Examples
///
/// ```
/// use hulltrace_pipeline::{PathSegment, Point};
/// use hulltrace_export::svg::segments_path_data;
///
/// let segments = [
///     PathSegment::Line { p0: Point::new(0.0, 0.0), p1: Point::new(2.0, 0.0) },
///     PathSegment::Line { p0: Point::new(2.0, 0.0), p1: Point::new(0.0, 2.0) },
///     PathSegment::Line { p0: Point::new(0.0, 2.0), p1: Point::new(0.0, 0.0) },
/// ];
/// assert_eq!(segments_path_data(&segments), "M 0 0 L 2 0 L 0 2 L 0 0 Z");
/// ```
#[must_use]
pub fn segments_path_data(segments: &[PathSegment]) -> String {
    let Some(first) = segments.first() else {
        return String::new();
    };

    let mut d = format!("M {}", coords(first.start()));
    for segment in segments {
        match *segment {
            PathSegment::Line { p1, .. } => {
                let _ = write!(d, " L {}", coords(p1));
            }
            PathSegment::Curve { c1, c2, p1, .. } => {
                let _ = write!(d, " C {}, {}, {}", coords(c1), coords(c2), coords(p1));
            }
        }
    }
    d.push_str(" Z");
    d
}

/// Build the SVG path `d` attribute for a region.
///
/// See [`segments_path_data`].
#[must_use]
pub fn path_data(region: &Region) -> String {
    segments_path_data(region.path_segments())
}

/// Build the filled `<path>` node for a region, or `None` if the region
/// is not valid or has no outline.
fn path_node(region: &Region) -> Option<Path> {
    if !region.is_valid() || region.path_segments().is_empty() {
        return None;
    }
    Some(
        Path::new()
            .set("fill", region.color().to_string())
            .set("d", path_data(region)),
    )
}

/// Serialize a single region as a `<path>` element.
///
/// Returns an empty string for invalid regions and regions with no
/// outline.
#[must_use]
pub fn path_element(region: &Region) -> String {
    path_node(region).map_or_else(String::new, |path| path.to_string())
}

fn marker(center: Point, radius: f64) -> Circle {
    Circle::new()
        .set("cx", format_number(center.x))
        .set("cy", format_number(center.y))
        .set("r", radius)
}

/// Debug markers for one region: an outlined circle at every hull vertex,
/// a filled circle at every cubic start, and half-size filled circles at
/// every control point.
fn debug_markers(region: &Region, radius: f64) -> Vec<Circle> {
    let hull = region.hull_points().points().iter().map(|&p| {
        marker(p, radius)
            .set("fill", "none")
            .set("stroke", "#000")
            .set("stroke-width", radius / 5.0)
    });
    let cubics = region.cubics().iter().flat_map(|c| {
        [
            marker(c.p0, radius),
            marker(c.c1, radius / 2.0),
            marker(c.c2, radius / 2.0),
        ]
        .map(|circle| circle.set("fill", "#000").set("stroke", "none"))
    });
    hull.chain(cubics).collect()
}

/// Serialize a trace into an SVG document string.
///
/// The document is sized to the traced image (`width`, `height`, no
/// `viewBox` scaling) and holds one `<path>` per valid region in palette
/// order. When the trace's config sets `debug_point_radius`, each
/// region's path is followed by its debug markers.
///
/// The output includes an XML declaration.
#[must_use]
pub fn to_svg(trace: &Trace, metadata: &SvgMetadata<'_>) -> String {
    let dimensions = trace.dimensions();
    let mut doc = Document::new()
        .set("width", dimensions.width)
        .set("height", dimensions.height)
        .set("version", "1.1");

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("hulltrace:config");
        config_el.assign("xmlns:hulltrace", METADATA_NAMESPACE);
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    let debug_radius = trace.config().debug_point_radius;
    for region in trace.regions() {
        let Some(path) = path_node(region) else {
            continue;
        };
        doc = doc.add(path);

        if let Some(radius) = debug_radius {
            for circle in debug_markers(region, radius) {
                doc = doc.add(circle);
            }
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
