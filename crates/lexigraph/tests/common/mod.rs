//! Fixtures shared by the integration tests.

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use lexigraph::core::{Corpus, Result};
use lexigraph::render::{GraphvizOutput, Rasterizer};
use std::cell::RefCell;
use std::io::Cursor;

/// A small biology outline: the root has four children, and "Cells" has
/// three children of its own.
pub const BIOLOGY_JSON: &str = r#"[
  {"id": "r", "name": "Biology", "note": "the study of cells, genetics, ecology and evolution"},
  {"id": "c", "name": "Cells", "parent_id": "r"},
  {"id": "g", "name": "Genetics", "parent_id": "r", "note": "inheritance of traits"},
  {"id": "e", "name": "Ecology", "parent_id": "r", "note": "organisms and habitats"},
  {"id": "v", "name": "Evolution", "parent_id": "r", "note": "natural selection"},
  {"id": "m", "name": "Mitochondria", "parent_id": "c", "note": "powerhouse inside cells"},
  {"id": "rb", "name": "Ribosomes", "parent_id": "c", "note": "protein factories inside cells"},
  {"id": "n", "name": "Nucleus", "parent_id": "c", "note": "stores dna for cells"}
]"#;

pub const BIOLOGY_VOCABULARY: [&str; 7] = [
    "cells",
    "genetics",
    "ecology",
    "evolution",
    "mitochondria",
    "ribosomes",
    "nucleus",
];

/// Flat notes with explicit causal phrasing.
pub const WEATHER_JSON: &str = r#"[
  {"id": "w1", "name": "Storm log", "note": "Heavy rain causes floods in the valley."},
  {"id": "w2", "name": "Aftermath", "note": "Floods lead to erosion along the river."},
  {"id": "w3", "name": "Planning", "note": "Levees prevent floods when rain is heavy."}
]"#;

pub fn biology() -> Corpus {
    Corpus::from_json(BIOLOGY_JSON).unwrap()
}

pub fn weather() -> Corpus {
    Corpus::from_json(WEATHER_JSON).unwrap()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([20, 60, 120, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Rasterizer that records the DOT it was given and returns fixed output.
#[derive(Default)]
pub struct RecordingRasterizer {
    pub calls: RefCell<Vec<(GraphvizOutput, String)>>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(&self, dot: &str, output: GraphvizOutput) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push((output, dot.to_string()));
        Ok(match output {
            GraphvizOutput::Svg => b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".to_vec(),
            GraphvizOutput::Png => png(640, 480),
        })
    }
}
