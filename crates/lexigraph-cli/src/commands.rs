//! Command implementations. Each returns its result; `main` prints it.

use anyhow::{Context, Result, anyhow, bail};
use lexigraph::core::Corpus;
use lexigraph::graph::MapRequest;
use lexigraph::render::{render_dot, StaticOutcome};
use lexigraph::text::RankedNode;
use lexigraph::{MapService, MapSummary};
use std::path::{Path, PathBuf};

use crate::cli::{MapArgs, OutputFormat};
use crate::config::LexigraphConfig;

const SESSION: &str = "cli";

/// Reads a corpus JSON file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let corpus = Corpus::load(path)?;
    log::debug!("loaded {} nodes from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Turns `map` arguments into a build request.
pub fn map_request(args: &MapArgs) -> Result<MapRequest> {
    let mut request = if args.vocabulary.is_empty() {
        let Some(root) = &args.root else {
            bail!("either --vocabulary or --root is required");
        };
        MapRequest::derived(root.clone())
    } else {
        let request = MapRequest::explicit(args.vocabulary.iter().map(String::as_str));
        match &args.root {
            Some(root) => request.with_root(root.clone()),
            None => request,
        }
    };
    request = request.with_scope(args.scope);
    if let Some(title) = &args.title {
        request = request.with_title(title.clone());
    }
    Ok(request)
}

fn default_output(format: OutputFormat, image_ext: &str) -> PathBuf {
    let ext = match format {
        OutputFormat::Image => image_ext,
        OutputFormat::Dot => "dot",
        OutputFormat::Html => "html",
        OutputFormat::Json => "json",
    };
    PathBuf::from(format!("concept-map.{ext}"))
}

/// Builds a map and writes the requested artifact. Returns the build summary
/// and the file written.
pub fn run_map(config: &LexigraphConfig, args: &MapArgs) -> Result<(MapSummary, PathBuf)> {
    let corpus = load_corpus(&args.corpus)?;
    let request = map_request(args)?;

    let mut service = MapService::new(config.service.clone());
    let summary = service
        .generate(SESSION, &corpus, &request)
        .map_err(|rejection| anyhow!("map request rejected: {rejection}"))?;

    let image_format = config.service.render.raster.format;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_output(args.format, image_format.extension()));

    let bytes = match args.format {
        OutputFormat::Image => match service.render_static(SESSION)? {
            StaticOutcome::Rendered { image, .. } => image.bytes,
            StaticOutcome::Failed { message } => bail!("static render failed: {message}"),
        },
        OutputFormat::Dot => {
            let map = service
                .map(SESSION)
                .context("generated map missing from store")?;
            render_dot(&map.export(), &config.service.render.dot).into_bytes()
        }
        OutputFormat::Html => service.render_interactive(SESSION)?.into_bytes(),
        OutputFormat::Json => {
            let map = service
                .map(SESSION)
                .context("generated map missing from store")?;
            serde_json::to_vec_pretty(&map.export())?
        }
    };

    std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}", out.display());
    Ok((summary, out))
}

/// Keywords of one node.
pub fn run_keywords(config: &LexigraphConfig, corpus: &Path, node: &str) -> Result<Vec<String>> {
    let corpus = load_corpus(corpus)?;
    Ok(MapService::new(config.service.clone()).keywords(&corpus, node)?)
}

/// Nodes related to one node, as `(id, name, score, matched)` rows.
pub fn run_related(
    config: &LexigraphConfig,
    corpus: &Path,
    node: &str,
    limit: Option<usize>,
) -> Result<Vec<(String, String, usize, Vec<String>)>> {
    let corpus = load_corpus(corpus)?;
    let service = MapService::new(config.service.clone());
    let ranked = service.related(&corpus, node, limit)?;
    Ok(ranked.into_iter().map(row).collect())
}

fn row(ranked: RankedNode<'_>) -> (String, String, usize, Vec<String>) {
    (
        ranked.node.id.clone(),
        ranked.node.name.clone(),
        ranked.relevance.score,
        ranked.relevance.matched,
    )
}
