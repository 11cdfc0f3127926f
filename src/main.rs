use std::env;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use eigenspace::datasets;
use eigenspace::sampling::NodeRole;
use eigenspace::spectral::DEFAULT_ZERO_TOLERANCE;
use eigenspace::{
    CommunitySampler, DecompositionVerifier, EmbeddingConfig, GraphInstance, GraphLoader,
    SampleConfig, SpectralGraph,
};

const DEFAULT_SOURCE: &str = "communities";
const DEFAULT_DIMS: usize = 3;
const SAMPLE_SEED: u64 = 42;
const VERIFY_EPSILON: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

struct Args {
    source: String,
    dims: usize,
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let dims = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("parse dimension count {raw:?}"))?,
        None => DEFAULT_DIMS,
    };
    if let Some(extra) = args.next() {
        anyhow::bail!("Unexpected extra argument: {extra}");
    }
    Ok(Args { source, dims })
}

struct LoadedGraph {
    graph: GraphInstance,
    communities: Option<Vec<usize>>,
    roles: Option<Vec<NodeRole>>,
}

fn load_source(source: &str) -> Result<LoadedGraph> {
    let plain = |graph| LoadedGraph {
        graph,
        communities: None,
        roles: None,
    };
    match source {
        "gene-network" => Ok(plain(GraphInstance::from_adjacency(
            &datasets::gene_network(),
            &datasets::gene_labels(),
        ))),
        "communities" => {
            let sampled = CommunitySampler::sample(&SampleConfig {
                seed: Some(SAMPLE_SEED),
                ..SampleConfig::default()
            })?;
            Ok(LoadedGraph {
                graph: GraphInstance::from_adjacency(&sampled.adjacency, &sampled.node_ids()),
                communities: Some(sampled.communities),
                roles: Some(sampled.roles),
            })
        }
        other => {
            if let Some(order) = other.strip_prefix("cycle:") {
                let n = order
                    .parse::<usize>()
                    .with_context(|| format!("parse cycle order {order:?}"))?;
                return Ok(plain(GraphInstance::from_adjacency(
                    &datasets::cycle(n),
                    &[],
                )));
            }
            let graph = GraphLoader::from_path(Path::new(other))
                .with_context(|| format!("load graph source {other:?}"))?;
            Ok(plain(graph))
        }
    }
}

#[derive(Serialize)]
struct NodeReport {
    id: String,
    coordinates: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    community: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<NodeRole>,
}

#[derive(Serialize)]
struct EmbeddingReport {
    source: String,
    axes: Vec<usize>,
    eigenvalues: Vec<f64>,
    algebraic_connectivity: Option<f64>,
    components: usize,
    trace: f64,
    converged: bool,
    residual: f64,
    rotations: usize,
    verified: bool,
    nodes: Vec<NodeReport>,
}

fn main() -> Result<()> {
    init_logging();
    let args = parse_args()?;
    let loaded = load_source(&args.source)?;
    info!(
        "Source {}: nodes {}, edges {}",
        args.source,
        loaded.graph.node_count(),
        loaded.graph.edge_count()
    );

    let config = EmbeddingConfig {
        dims: args.dims,
        ..EmbeddingConfig::default()
    };
    let start = Instant::now();
    let analysis = SpectralGraph::from_graph(&loaded.graph, config)?;
    let laplacian = analysis.laplacian()?;
    let eigen = analysis.eigen()?;
    let profile = analysis.profile()?;
    let embedding = analysis.embedding()?;
    info!(
        "Decomposed order {} in {:?} ({} rotations, residual {:e})",
        analysis.node_count(),
        start.elapsed(),
        eigen.rotations,
        eigen.residual
    );

    let report = DecompositionVerifier::verify(&laplacian, &eigen, VERIFY_EPSILON);
    if !report.is_valid {
        warn!("Decomposition failed verification:\n{}", report.explanation);
    }

    let nodes = analysis
        .node_ids()
        .iter()
        .enumerate()
        .map(|(i, id)| NodeReport {
            id: id.clone(),
            coordinates: embedding.point(i).to_vec(),
            community: loaded.communities.as_ref().map(|c| c[i]),
            role: loaded.roles.as_ref().map(|r| r[i]),
        })
        .collect();

    let output = EmbeddingReport {
        source: args.source,
        axes: embedding.axes.clone(),
        eigenvalues: eigen.values.clone(),
        algebraic_connectivity: profile.algebraic_connectivity(),
        components: profile.zero_multiplicity(DEFAULT_ZERO_TOLERANCE),
        trace: profile.trace,
        converged: eigen.converged,
        residual: eigen.residual,
        rotations: eigen.rotations,
        verified: report.is_valid,
        nodes,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serialize embedding report")?
    );
    Ok(())
}
