//! hulltrace-export: Pure format serializers (sans-IO)
//!
//! Converts traced regions into output formats. Currently supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, path_data, path_element, to_svg};
