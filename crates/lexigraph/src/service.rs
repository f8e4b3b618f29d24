//! The end-to-end pipeline behind a visualization request.
//!
//! [`MapService`] builds a map for a session, keeps it in its [`MapStore`],
//! and renders it on demand as a static image or an interactive document.

use lexigraph_core::{Corpus, Error, Result};
use lexigraph_graph::{
    BuildOutcome, BuildStats, BuilderConfig, ConceptGraphBuilder, ConceptMap, Level, MapRequest,
    PatternClassifier, Rejection, RelationClassifier,
};
use lexigraph_layout::{Canvas, LayoutSession, PhysicsParams, SessionOptions};
use lexigraph_render::{
    render_html, render_static, DotOptions, GraphvizRasterizer, HtmlOptions, RasterOptions,
    Rasterizer, StaticOutcome,
};
use lexigraph_text::{rank_related, KeywordExtractor, RankedNode, StopwordConfig};
use serde::{Deserialize, Serialize};

use crate::store::{MapStore, DEFAULT_STORE_CAPACITY};

/// Static renderer settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(flatten)]
    pub dot: DotOptions,
    #[serde(flatten)]
    pub raster: RasterOptions,
}

/// Everything the pipeline can be configured with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host for deep links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub stopwords: StopwordConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub physics: PhysicsParams,
    #[serde(default)]
    pub canvas: Canvas,
    /// Sessions kept before the oldest is evicted.
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
}

fn default_store_capacity() -> usize {
    DEFAULT_STORE_CAPACITY
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: None,
            builder: BuilderConfig::default(),
            stopwords: StopwordConfig::default(),
            render: RenderSettings::default(),
            physics: PhysicsParams::default(),
            canvas: Canvas::default(),
            store_capacity: default_store_capacity(),
        }
    }
}

/// Summary of a stored map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapSummary {
    pub session: String,
    pub title: String,
    pub concepts: usize,
    pub majors: usize,
    pub details: usize,
    pub edges: usize,
    pub truncated: bool,
    pub stats: BuildStats,
}

impl MapSummary {
    fn new(session: &str, map: &ConceptMap) -> Self {
        Self {
            session: session.to_string(),
            title: map.title.clone(),
            concepts: map.node_count(),
            majors: map.nodes_at(Level::Major).count(),
            details: map.nodes_at(Level::Detail).count(),
            edges: map.edge_count(),
            truncated: map.truncated,
            stats: map.stats.clone(),
        }
    }
}

/// Builds, stores and renders concept maps per session.
pub struct MapService<R: Rasterizer = GraphvizRasterizer, C: RelationClassifier = PatternClassifier> {
    config: ServiceConfig,
    builder: ConceptGraphBuilder<C>,
    extractor: KeywordExtractor,
    rasterizer: R,
    store: MapStore,
}

impl MapService {
    /// Creates a service that rasterizes through the configured Graphviz
    /// binary.
    pub fn new(config: ServiceConfig) -> Self {
        let rasterizer = GraphvizRasterizer::new(config.render.raster.graphviz_bin.clone());
        let extractor = KeywordExtractor::with_stopwords(&config.stopwords);
        Self {
            builder: ConceptGraphBuilder::new()
                .with_config(config.builder.clone())
                .with_extractor(extractor.clone()),
            extractor,
            rasterizer,
            store: MapStore::with_capacity(config.store_capacity),
            config,
        }
    }
}

impl Default for MapService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl<R: Rasterizer, C: RelationClassifier> MapService<R, C> {
    /// Replaces the rasterizer.
    pub fn with_rasterizer<S: Rasterizer>(self, rasterizer: S) -> MapService<S, C> {
        MapService {
            config: self.config,
            builder: self.builder,
            extractor: self.extractor,
            rasterizer,
            store: self.store,
        }
    }

    /// Replaces the relationship classifier.
    pub fn with_classifier<D: RelationClassifier>(self, classifier: D) -> MapService<R, D> {
        MapService {
            config: self.config,
            builder: self.builder.with_classifier(classifier),
            extractor: self.extractor,
            rasterizer: self.rasterizer,
            store: self.store,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    /// Builds a map and stores it under `session`, replacing that session's
    /// previous map. Rejections leave the store untouched.
    pub fn generate(
        &mut self,
        session: &str,
        corpus: &Corpus,
        request: &MapRequest,
    ) -> std::result::Result<MapSummary, Rejection> {
        match self.builder.build(corpus, request) {
            BuildOutcome::Built(map) => {
                let summary = MapSummary::new(session, &map);
                log::info!(
                    "session {session}: built '{}' with {} concepts and {} edges",
                    summary.title,
                    summary.concepts,
                    summary.edges
                );
                self.store.insert(session, map);
                Ok(summary)
            }
            BuildOutcome::Rejected(rejection) => {
                log::info!("session {session}: request rejected: {rejection}");
                Err(rejection)
            }
        }
    }

    /// The map stored for a session.
    pub fn map(&self, session: &str) -> Option<&ConceptMap> {
        self.store.get(session)
    }

    fn require(&self, session: &str) -> Result<&ConceptMap> {
        self.map(session)
            .ok_or_else(|| Error::not_found("session", session))
    }

    /// Drops a session's map.
    pub fn forget(&mut self, session: &str) -> bool {
        self.store.remove(session).is_some()
    }

    /// Renders a session's map through Graphviz.
    pub fn render_static(&self, session: &str) -> Result<StaticOutcome> {
        let map = self.require(session)?;
        Ok(render_static(
            &map.export(),
            &self.config.render.dot,
            &self.config.render.raster,
            &self.rasterizer,
        ))
    }

    /// Renders a session's map as a self-contained interactive document.
    pub fn render_interactive(&self, session: &str) -> Result<String> {
        let map = self.require(session)?;
        render_html(&map.export(), &self.html_options())
    }

    /// Opens a headless layout session over a stored map.
    pub fn open_layout(&self, session: &str, seed: Option<u64>) -> Result<LayoutSession> {
        let map = self.require(session)?;
        LayoutSession::from_map(
            map,
            SessionOptions {
                physics: self.config.physics.clone(),
                canvas: self.config.canvas,
                host: self.config.host.clone(),
                seed,
            },
        )
    }

    fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            host: self.config.host.clone(),
            physics: self.config.physics.clone(),
            canvas: self.config.canvas,
        }
    }

    /// Keywords of a single corpus node.
    pub fn keywords(&self, corpus: &Corpus, node_id: &str) -> Result<Vec<String>> {
        let node = corpus
            .get(node_id)
            .ok_or_else(|| Error::not_found("node", node_id))?;
        Ok(self.extractor.extract_from_node(node))
    }

    /// Nodes related to `node_id` by its keywords, best first.
    pub fn related<'a>(
        &self,
        corpus: &'a Corpus,
        node_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RankedNode<'a>>> {
        let keywords = self.keywords(corpus, node_id)?;
        Ok(rank_related(corpus, &keywords, Some(node_id), limit))
    }
}
