//! Rendering for Lexigraph concept maps.
//!
//! Two independent consumers of the same [`MapExport`](lexigraph_graph::MapExport):
//!
//! - [`dot`] + [`raster`]: a Graphviz DOT document, rasterized through the
//!   external `dot` binary and fitted onto a fixed-size PNG or JPEG
//! - [`html`]: a self-contained interactive page with an inline force
//!   layout, expandable majors, sliders and per-node popups

pub mod dot;
pub mod html;
pub mod raster;

pub use dot::{escape_for_dot, render_dot, DotOptions, LayoutEngine, MAX_LABEL_LEN};
pub use html::{escape_html, escape_json_for_script, render_html, HtmlOptions};
pub use raster::{
    fit_to_canvas, render_static, GraphvizOutput, GraphvizRasterizer, ImageFormat, RasterOptions,
    Rasterizer, RenderedImage, StaticOutcome,
};
