use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use eigenspace::{
    CommunitySampler, DatasetLoader, EmbeddingConfig, GraphLoader, GraphWriter, SampleConfig,
    SpectralGraph,
};

fn temp_dir(name: &str) -> PathBuf {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("eigenspace_{}_{}", name, epoch));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

#[test]
fn path_graph_file_embeds_monotonically() {
    let graph = r#"
    {
        "nodes": [
            {"id": "a", "attributes": {"label": "A"}},
            {"id": "b", "attributes": {"label": "B"}},
            {"id": "c", "attributes": {"label": "C"}},
            {"id": "d", "attributes": {"label": "D"}}
        ],
        "edges": [
            {"source": "a", "target": "b", "attributes": {"weight": 1.0}},
            {"source": "b", "target": "c", "attributes": {"weight": 1.0}},
            {"source": "c", "target": "d"}
        ],
        "directed": false
    }
    "#;

    let root = temp_dir("path");
    fs::write(root.join("path.json"), graph).expect("write graph");

    let instance = DatasetLoader::new(&root).load("path.json").expect("load graph");
    let config = EmbeddingConfig {
        dims: 1,
        ..EmbeddingConfig::default()
    };
    let analysis = SpectralGraph::from_graph(&instance, config).expect("analysis");
    assert_eq!(analysis.node_ids(), &["a", "b", "c", "d"]);

    let embedding = analysis.embedding().expect("embedding");
    assert!(embedding.converged);
    let fiedler: Vec<f64> = embedding.coordinates.column(0).to_vec();
    let increasing = fiedler.windows(2).all(|w| w[0] < w[1]);
    let decreasing = fiedler.windows(2).all(|w| w[0] > w[1]);
    assert!(increasing || decreasing, "fiedler vector {:?}", fiedler);

    let expected = 2.0 - 2.0 * (std::f64::consts::PI / 4.0).cos();
    assert!((embedding.axis_eigenvalues[0] - expected).abs() < 1e-9);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn sampled_graph_survives_a_file_round_trip() {
    let sampled = CommunitySampler::sample(&SampleConfig {
        seed: Some(42),
        ..SampleConfig::default()
    })
    .expect("community graph");
    let instance = sampled.to_graph_instance();

    let root = temp_dir("communities");
    let path = root.join("communities.json");
    GraphWriter::write_to_path(&instance, &path).expect("write graph");

    let reloaded = GraphLoader::from_path(&path).expect("reload");
    assert_eq!(reloaded.node_count(), sampled.node_count());
    assert_eq!(
        reloaded.adjacency_matrix().expect("adjacency"),
        sampled.adjacency
    );
    let first = reloaded.graph.node_weights().next().expect("first node");
    assert_eq!(first.extra.get("community"), Some(&serde_json::json!(0)));

    let original = SpectralGraph::new(sampled.adjacency.clone(), EmbeddingConfig::default())
        .embedding()
        .expect("embedding");
    let from_file = SpectralGraph::from_graph(&reloaded, EmbeddingConfig::default())
        .expect("analysis")
        .embedding()
        .expect("embedding");
    assert_eq!(original.coordinates, from_file.coordinates);

    let _ = fs::remove_dir_all(&root);
}
