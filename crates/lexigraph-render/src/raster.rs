//! Rasterization of DOT documents.
//!
//! The graph description is handed to Graphviz twice, once for SVG and once
//! for PNG. The delivered bitmap comes from the PNG render, not from the
//! SVG; both renders share the same DOT input. The PNG is fitted onto a
//! fixed-size canvas and re-encoded in the requested format. Every failure
//! along the way is reported as [`StaticOutcome::Failed`].

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use lexigraph_core::{Error, Result};
use lexigraph_graph::MapExport;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

use crate::dot::{render_dot, DotOptions};

const JPEG_QUALITY: u8 = 90;

/// Encoded image format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(Error::parse(format!("unknown image format: {other}"))),
        }
    }
}

/// What Graphviz is asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphvizOutput {
    Svg,
    Png,
}

impl GraphvizOutput {
    fn flag(self) -> &'static str {
        match self {
            Self::Svg => "-Tsvg",
            Self::Png => "-Tpng",
        }
    }
}

/// Raster settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterOptions {
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Graphviz executable.
    #[serde(default = "default_graphviz_bin")]
    pub graphviz_bin: String,
}

fn default_width() -> u32 {
    1600
}

fn default_height() -> u32 {
    1200
}

fn default_graphviz_bin() -> String {
    "dot".to_string()
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            width: default_width(),
            height: default_height(),
            graphviz_bin: default_graphviz_bin(),
        }
    }
}

/// A rendered static map.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Encoded bitmap.
    pub bytes: Vec<u8>,
    /// Vector rendition.
    pub svg: String,
}

/// Result of a static render.
#[derive(Clone, Debug, PartialEq)]
pub enum StaticOutcome {
    Rendered { dot: String, image: RenderedImage },
    Failed { message: String },
}

impl StaticOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Turns a DOT document into bytes of the requested output.
pub trait Rasterizer {
    fn rasterize(&self, dot: &str, output: GraphvizOutput) -> Result<Vec<u8>>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn rasterize(&self, dot: &str, output: GraphvizOutput) -> Result<Vec<u8>> {
        (**self).rasterize(dot, output)
    }
}

/// Runs the Graphviz binary as a subprocess.
#[derive(Clone, Debug)]
pub struct GraphvizRasterizer {
    binary: String,
}

impl GraphvizRasterizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for GraphvizRasterizer {
    fn default() -> Self {
        Self::new(default_graphviz_bin())
    }
}

impl Rasterizer for GraphvizRasterizer {
    fn rasterize(&self, dot: &str, output: GraphvizOutput) -> Result<Vec<u8>> {
        log::debug!("running {} {}", self.binary, output.flag());
        let mut child = Command::new(&self.binary)
            .arg(output.flag())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::tool(&self.binary, e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(dot.as_bytes())
        {
            drop(stdin);
            // The tool may already have exited; reap it either way.
            let _ = child.kill();
            let stderr = child
                .wait_with_output()
                .map(|o| String::from_utf8_lossy(&o.stderr).trim().to_string())
                .unwrap_or_default();
            let message = if stderr.is_empty() {
                format!("writing graph: {e}")
            } else {
                format!("writing graph: {e}: {stderr}")
            };
            return Err(Error::tool(&self.binary, message));
        }

        let result = child
            .wait_with_output()
            .map_err(|e| Error::tool(&self.binary, e.to_string()))?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::tool(
                &self.binary,
                format!("{}: {}", result.status, stderr.trim()),
            ));
        }
        if result.stdout.is_empty() {
            return Err(Error::tool(&self.binary, "produced no output"));
        }
        Ok(result.stdout)
    }
}

/// Scales a bitmap to fit `width` x `height`, centers it on a white canvas
/// and encodes it.
pub fn fit_to_canvas(bitmap: &[u8], width: u32, height: u32, format: ImageFormat) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(Error::config(format!("raster size must be positive, got {width}x{height}")));
    }
    let source = image::load_from_memory(bitmap)
        .map_err(|e| Error::render(format!("undecodable bitmap: {e}")))?;
    let fitted = source.resize(width, height, FilterType::Lanczos3).to_rgba8();

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let x = (width - fitted.width()) / 2;
    let y = (height - fitted.height()) / 2;
    imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));

    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    let encoded = match format {
        ImageFormat::Png => DynamicImage::ImageRgba8(canvas).write_to(&mut cursor, ImageOutputFormat::Png),
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
            .write_to(&mut cursor, ImageOutputFormat::Jpeg(JPEG_QUALITY)),
    };
    encoded.map_err(|e| Error::render(format!("encoding {}: {e}", format.extension())))?;
    Ok(bytes)
}

/// Renders a map to DOT, SVG and a fitted bitmap.
pub fn render_static<R: Rasterizer + ?Sized>(
    map: &MapExport,
    dot_options: &DotOptions,
    raster: &RasterOptions,
    rasterizer: &R,
) -> StaticOutcome {
    let dot = render_dot(map, dot_options);
    match rasterize_all(&dot, raster, rasterizer) {
        Ok(image) => StaticOutcome::Rendered { dot, image },
        Err(e) => {
            log::warn!("static render of '{}' failed: {e}", map.title);
            StaticOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

fn rasterize_all<R: Rasterizer + ?Sized>(dot: &str, raster: &RasterOptions, rasterizer: &R) -> Result<RenderedImage> {
    let svg_bytes = rasterizer.rasterize(dot, GraphvizOutput::Svg)?;
    let svg = String::from_utf8(svg_bytes).map_err(|e| Error::render(format!("SVG is not UTF-8: {e}")))?;
    let png = rasterizer.rasterize(dot, GraphvizOutput::Png)?;
    let bytes = fit_to_canvas(&png, raster.width, raster.height, raster.format)?;
    Ok(RenderedImage {
        format: raster.format,
        width: raster.width,
        height: raster.height,
        bytes,
        svg,
    })
}
