use crate::{
    leiden_cluster, leiden_cluster_with, AffinityMatrix, ClusterError, GraphStore, LeidenClusterConfig, Objective,
    Partition, PartitionFinder, PartitionRequest,
};
use anyhow::{bail, Result};
use std::cell::Cell;

/// Records the graph it is handed.
#[derive(Default)]
struct RecordingStore {
    builds: Cell<usize>,
}

#[derive(Debug, PartialEq)]
struct RecordedGraph {
    n_vertices: usize,
    edges: Vec<(usize, usize)>,
}

impl GraphStore for RecordingStore {
    type Graph = RecordedGraph;

    fn build_graph(&self, n_vertices: usize, edges: &[(usize, usize)]) -> Result<RecordedGraph> {
        self.builds.set(self.builds.get() + 1);
        Ok(RecordedGraph {
            n_vertices,
            edges: edges.to_vec(),
        })
    }
}

struct FailingStore;

impl GraphStore for FailingStore {
    type Graph = RecordedGraph;

    fn build_graph(&self, _: usize, _: &[(usize, usize)]) -> Result<RecordedGraph> {
        bail!("store unavailable")
    }
}

/// Returns scripted qualities in call order. Each membership puts every vertex in a cluster
/// named after the call number.
#[derive(Default)]
struct ScriptedFinder {
    qualities: Vec<f64>,
    fail_on_call: Option<usize>,
    seeds: Vec<u64>,
    weights: Vec<Vec<f64>>,
}

impl ScriptedFinder {
    fn new(qualities: &[f64]) -> Self {
        ScriptedFinder {
            qualities: qualities.to_vec(),
            ..Default::default()
        }
    }
}

impl PartitionFinder for ScriptedFinder {
    type Graph = RecordedGraph;

    fn find_partition(&mut self, graph: &RecordedGraph, request: &PartitionRequest<'_>) -> Result<Partition> {
        let call = self.seeds.len();
        self.seeds.push(request.seed);
        self.weights.push(request.weights.to_vec());

        assert_eq!(request.objective, Objective::Modularity);
        assert!(request.initial_membership.is_none());
        assert_eq!(request.weights.len(), graph.edges.len());

        if self.fail_on_call == Some(call) {
            bail!("finder crashed");
        }

        Ok(Partition {
            membership: vec![call; graph.n_vertices],
            quality: self.qualities.get(call).copied().unwrap_or(0.0),
        })
    }
}

fn scenario_matrix() -> AffinityMatrix {
    AffinityMatrix::new(vec![0, 1, 3, 3], vec![1, 0, 2], vec![0.5, 0.5, 0.8]).unwrap()
}

fn run_scripted(
    matrix: &AffinityMatrix,
    config: &LeidenClusterConfig,
    finder: &mut ScriptedFinder,
    observed: &mut Vec<(usize, f64)>,
) -> Result<Vec<usize>, ClusterError> {
    let store = RecordingStore::default();
    let mut observer = |seed_index: usize, quality: f64| observed.push((seed_index, quality));
    leiden_cluster_with(matrix, config, &store, finder, &mut observer)
}

#[test]
fn seeds_are_derived_in_order() {
    let mut finder = ScriptedFinder::new(&[]);
    let config = LeidenClusterConfig::default().with_n_seeds(5);
    run_scripted(&scenario_matrix(), &config, &mut finder, &mut Vec::new()).unwrap();

    assert_eq!(finder.seeds, vec![100, 200, 300, 400, 500]);
    for weights in &finder.weights {
        assert_eq!(weights, &[0.5, 0.5, 0.8]);
    }
}

#[test]
fn strictly_better_quality_wins() {
    let mut finder = ScriptedFinder::new(&[0.1, 0.5, 0.3, 0.5]);
    let config = LeidenClusterConfig::default().with_n_seeds(4);
    let membership = run_scripted(&scenario_matrix(), &config, &mut finder, &mut Vec::new()).unwrap();

    // second call, seed 200
    assert_eq!(membership, vec![1, 1, 1]);
}

#[test]
fn equal_qualities_keep_first_seed() {
    let mut finder = ScriptedFinder::new(&[0.7, 0.7, 0.7]);
    let config = LeidenClusterConfig::default().with_n_seeds(3);
    let membership = run_scripted(&scenario_matrix(), &config, &mut finder, &mut Vec::new()).unwrap();

    assert_eq!(membership, vec![0, 0, 0]);
}

#[test]
fn single_seed_returns_finder_partition() {
    let store = RecordingStore::default();
    let mut finder = ScriptedFinder::new(&[0.25]);
    let config = LeidenClusterConfig::default().with_n_seeds(1);

    let mut observer = |_: usize, _: f64| {};
    let membership = leiden_cluster_with(&scenario_matrix(), &config, &store, &mut finder, &mut observer).unwrap();

    assert_eq!(membership, vec![0, 0, 0]);
    assert_eq!(finder.seeds, vec![100]);
    assert_eq!(store.builds.get(), 1);
}

#[test]
fn empty_matrix_gives_empty_membership() {
    let mut finder = ScriptedFinder::new(&[0.0, 0.0]);
    let config = LeidenClusterConfig::default();
    let membership = run_scripted(&AffinityMatrix::empty(), &config, &mut finder, &mut Vec::new()).unwrap();

    assert!(membership.is_empty());
    assert_eq!(finder.seeds, vec![100, 200]);
    assert!(finder.weights.iter().all(Vec::is_empty));

    assert!(leiden_cluster(&AffinityMatrix::empty(), &config).unwrap().is_empty());
}

#[test]
fn zero_seeds_is_an_error() {
    let store = RecordingStore::default();
    let mut finder = ScriptedFinder::new(&[]);
    let config = LeidenClusterConfig::default().with_n_seeds(0);

    let mut observer = |_: usize, _: f64| {};
    let err = leiden_cluster_with(&scenario_matrix(), &config, &store, &mut finder, &mut observer).unwrap_err();

    assert!(matches!(err, ClusterError::NoSeeds));
    assert!(finder.seeds.is_empty());
    assert_eq!(store.builds.get(), 0);
}

#[test]
fn finder_failure_aborts_search() {
    let mut finder = ScriptedFinder {
        qualities: vec![0.9, 0.1, 0.2, 0.3],
        fail_on_call: Some(1),
        ..Default::default()
    };
    let mut observed = Vec::new();
    let config = LeidenClusterConfig::default().with_n_seeds(4).with_verbose(true);

    let err = run_scripted(&scenario_matrix(), &config, &mut finder, &mut observed).unwrap_err();

    match &err {
        ClusterError::Finder { seed, source } => {
            assert_eq!(*seed, 200);
            assert_eq!(source.to_string(), "finder crashed");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());

    assert_eq!(finder.seeds, vec![100, 200]);
    assert_eq!(observed, vec![(1, 0.9)]);
}

#[test]
fn store_failure_is_reported() {
    let mut finder = ScriptedFinder::new(&[]);
    let config = LeidenClusterConfig::default();

    let mut observer = |_: usize, _: f64| {};
    let err = leiden_cluster_with(&scenario_matrix(), &config, &FailingStore, &mut finder, &mut observer).unwrap_err();

    assert!(matches!(err, ClusterError::GraphStore(_)));
    assert!(finder.seeds.is_empty());
}

#[test]
fn wrong_membership_length_is_a_finder_error() {
    struct ShortFinder;

    impl PartitionFinder for ShortFinder {
        type Graph = RecordedGraph;

        fn find_partition(&mut self, _: &RecordedGraph, _: &PartitionRequest<'_>) -> Result<Partition> {
            Ok(Partition {
                membership: vec![0],
                quality: 1.0,
            })
        }
    }

    let err = leiden_cluster_with(
        &scenario_matrix(),
        &LeidenClusterConfig::default(),
        &RecordingStore::default(),
        &mut ShortFinder,
        &mut |_: usize, _: f64| {},
    )
    .unwrap_err();

    assert!(matches!(err, ClusterError::Finder { seed: 100, .. }));
}

#[test]
fn verbose_notifies_once_per_seed() {
    let mut finder = ScriptedFinder::new(&[0.1, 0.2, 0.3]);
    let mut observed = Vec::new();
    let config = LeidenClusterConfig::default().with_n_seeds(3).with_verbose(true);
    run_scripted(&scenario_matrix(), &config, &mut finder, &mut observed).unwrap();
    assert_eq!(observed, vec![(1, 0.1), (2, 0.2), (3, 0.3)]);

    let mut finder = ScriptedFinder::new(&[0.1, 0.2, 0.3]);
    let mut observed = Vec::new();
    let config = config.with_verbose(false);
    run_scripted(&scenario_matrix(), &config, &mut finder, &mut observed).unwrap();
    assert!(observed.is_empty());
}

#[test]
fn graph_matches_matrix_storage() {
    struct CheckingFinder;

    impl PartitionFinder for CheckingFinder {
        type Graph = RecordedGraph;

        fn find_partition(&mut self, graph: &RecordedGraph, request: &PartitionRequest<'_>) -> Result<Partition> {
            assert_eq!(
                graph,
                &RecordedGraph {
                    n_vertices: 3,
                    edges: vec![(0, 1), (1, 0), (1, 2)],
                }
            );
            assert_eq!(request.weights, &[0.5, 0.5, 0.8]);
            assert_eq!(request.n_iterations, 7);
            Ok(Partition {
                membership: vec![0, 0, 1],
                quality: 0.2,
            })
        }
    }

    let config = LeidenClusterConfig::default().with_n_seeds(2).with_n_leiden_iterations(7);
    let membership = leiden_cluster_with(
        &scenario_matrix(),
        &config,
        &RecordingStore::default(),
        &mut CheckingFinder,
        &mut |_: usize, _: f64| {},
    )
    .unwrap();

    assert_eq!(membership, vec![0, 0, 1]);
}

/// Two dense blocks of `size` vertices, joined by one weak edge, stored symmetrically.
fn two_blocks(size: usize) -> AffinityMatrix {
    let n = 2 * size;
    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for i in 0..n {
        let block = i / size;
        for j in 0..n {
            if i != j && j / size == block {
                indices.push(j);
                data.push(1.0);
            } else if (i, j) == (size - 1, size) || (i, j) == (size, size - 1) {
                indices.push(j);
                data.push(0.05);
            }
        }
        indptr.push(indices.len());
    }

    AffinityMatrix::new(indptr, indices, data).unwrap()
}

#[test]
fn bundled_backend_separates_blocks() {
    let matrix = two_blocks(5);
    let config = LeidenClusterConfig::default().with_n_seeds(3);
    let membership = leiden_cluster(&matrix, &config).unwrap();

    assert_eq!(membership.len(), 10);
    assert!(membership[..5].iter().all(|&l| l == membership[0]));
    assert!(membership[5..].iter().all(|&l| l == membership[5]));
    assert_ne!(membership[0], membership[5]);
    assert_eq!(membership.iter().max(), Some(&1));

    // deterministic across invocations
    assert_eq!(membership, leiden_cluster(&matrix, &config).unwrap());
}

#[test]
fn bundled_backend_on_scenario_matrix() {
    let config = LeidenClusterConfig::default().with_n_seeds(2);
    let membership = leiden_cluster(&scenario_matrix(), &config).unwrap();
    assert_eq!(membership.len(), 3);

    let mut observed = Vec::new();
    let store = crate::LeidenBackend::new();
    let mut finder = store.clone();
    let verbose = config.clone().with_verbose(true);
    let again = leiden_cluster_with(&scenario_matrix(), &verbose, &store, &mut finder, &mut |s: usize, q: f64| {
        observed.push((s, q))
    })
    .unwrap();

    assert_eq!(membership, again);
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0].0, 1);
    assert_eq!(observed[1].0, 2);
}
