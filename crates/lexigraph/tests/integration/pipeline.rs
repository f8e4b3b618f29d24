//! Corpus in, artifacts out.

use lexigraph::core::Scope;
use lexigraph::graph::{validate_map, Level, MapRequest, RejectionReason, Relationship};
use lexigraph::render::{GraphvizOutput, ImageFormat, StaticOutcome};
use lexigraph::{MapService, ServiceConfig};

use crate::common::{biology, weather, RecordingRasterizer, BIOLOGY_VOCABULARY};

fn biology_request() -> MapRequest {
    MapRequest::explicit(BIOLOGY_VOCABULARY)
        .with_root("r")
        .with_scope(Scope::Children)
}

#[test]
fn test_biology_map_hierarchy() {
    let mut service = MapService::default();
    let summary = service.generate("bio", &biology(), &biology_request()).unwrap();
    assert_eq!(summary.title, "Biology");
    assert_eq!(summary.majors, 4);
    assert_eq!(summary.details, 3);
    assert!(!summary.truncated);

    let map = service.map("bio").unwrap();
    assert!(validate_map(map).is_empty());
    for detail in map.nodes_at(Level::Detail) {
        assert_eq!(detail.parent_major_id.as_deref(), Some("cells"));
    }
}

#[test]
fn test_weather_relationships() {
    let mut service = MapService::default();
    service
        .generate(
            "w",
            &weather(),
            &MapRequest::explicit(["rain", "floods", "erosion", "levees"]),
        )
        .unwrap();
    let map = service.map("w").unwrap();

    let causes = map
        .semantic_edges()
        .find(|e| e.pair_key() == ("floods".to_string(), "rain".to_string()))
        .unwrap();
    assert_eq!(causes.relationship, Relationship::Causes);
    assert_eq!((causes.from.as_str(), causes.to.as_str()), ("rain", "floods"));

    let erosion = map
        .semantic_edges()
        .find(|e| e.to == "erosion" || e.from == "erosion")
        .unwrap();
    assert_eq!(erosion.relationship, Relationship::Causes);
    assert_eq!(erosion.from, "floods");
}

#[test]
fn test_derived_vocabulary_from_designated_node() {
    let mut service = MapService::default();
    let summary = service
        .generate("d", &biology(), &MapRequest::derived("r"))
        .unwrap();
    assert!(summary.concepts > 2);
    assert!(validate_map(service.map("d").unwrap()).is_empty());
}

#[test]
fn test_rejections_are_values() {
    let mut service = MapService::default();
    let too_small = service
        .generate("x", &biology(), &MapRequest::explicit(["cells"]))
        .unwrap_err();
    assert_eq!(too_small.reason, RejectionReason::VocabularyOutOfRange);

    let unknown = service
        .generate("x", &biology(), &biology_request().with_root("missing"))
        .unwrap_err();
    assert_eq!(unknown.reason, RejectionReason::UnknownNode);
    assert!(service.map("x").is_none());
}

#[test]
fn test_static_render_through_rasterizer() {
    let config = ServiceConfig {
        render: lexigraph::RenderSettings {
            raster: lexigraph::render::RasterOptions {
                format: ImageFormat::Jpeg,
                width: 800,
                height: 600,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let mut service = MapService::new(config).with_rasterizer(RecordingRasterizer::default());
    service.generate("bio", &biology(), &biology_request()).unwrap();

    let StaticOutcome::Rendered { dot, image } = service.render_static("bio").unwrap() else {
        panic!("expected a rendered image");
    };
    assert!(dot.contains("\"core\" [label=\"Biology\""));
    assert_eq!(image.format, ImageFormat::Jpeg);
    assert_eq!(&image.bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 600));
}

#[test]
fn test_interactive_document_for_session() {
    let config = ServiceConfig {
        host: Some("https://notes.example".to_string()),
        ..Default::default()
    };
    let mut service = MapService::new(config);
    service.generate("bio", &biology(), &biology_request()).unwrap();
    let html = service.render_interactive("bio").unwrap();
    assert!(html.contains("<title>Biology</title>"));
    assert!(html.contains("https://notes.example/#/n"));
    assert!(html.contains("cancelAnimationFrame"));
}

#[test]
fn test_sessions_do_not_clobber_each_other() {
    let mut service = MapService::default();
    service.generate("one", &biology(), &biology_request()).unwrap();
    service
        .generate(
            "two",
            &weather(),
            &MapRequest::explicit(["rain", "floods"]).with_title("Weather"),
        )
        .unwrap();
    assert_eq!(service.map("one").unwrap().title, "Biology");
    assert_eq!(service.map("two").unwrap().title, "Weather");
}

#[test]
fn test_corpus_loaded_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(&path, crate::common::BIOLOGY_JSON).unwrap();
    let corpus = lexigraph::core::Corpus::load(&path).unwrap();
    assert_eq!(corpus.len(), 8);
    assert!(lexigraph::core::Corpus::load(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_recording_rasterizer_call_order() {
    let rasterizer = RecordingRasterizer::default();
    let map = {
        let mut service = MapService::default();
        service.generate("bio", &biology(), &biology_request()).unwrap();
        service.map("bio").unwrap().export()
    };
    let outcome = lexigraph::render::render_static(
        &map,
        &Default::default(),
        &Default::default(),
        &rasterizer,
    );
    assert!(outcome.is_rendered());
    let calls = rasterizer.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, GraphvizOutput::Svg);
    assert_eq!(calls[1].0, GraphvizOutput::Png);
    assert_eq!(calls[0].1, calls[1].1);
}
