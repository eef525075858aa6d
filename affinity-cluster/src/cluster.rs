use crate::backend::LeidenBackend;
use crate::finder::{GraphStore, PartitionFinder};
use crate::graph_builder::build_edge_list;
use crate::observer::{LogObserver, SeedObserver};
use crate::search::MultiSeedSearch;
use crate::{AffinityMatrix, ClusterError, LeidenClusterConfig};

/// Cluster the vertices of `matrix`, keeping the best of `config.n_seeds` Leiden runs.
///
/// Returns one cluster label per matrix row. Uses the bundled [`LeidenBackend`] and, in verbose
/// mode, logs every seed's quality.
pub fn leiden_cluster(matrix: &AffinityMatrix, config: &LeidenClusterConfig) -> Result<Vec<usize>, ClusterError> {
    let store = LeidenBackend::new();
    let mut finder = store.clone();
    leiden_cluster_with(matrix, config, &store, &mut finder, &mut LogObserver)
}

/// [`leiden_cluster`] with the graph store, partition finder and observer supplied by the caller.
pub fn leiden_cluster_with<S, F, O>(
    matrix: &AffinityMatrix,
    config: &LeidenClusterConfig,
    store: &S,
    finder: &mut F,
    observer: &mut O,
) -> Result<Vec<usize>, ClusterError>
where
    S: GraphStore + ?Sized,
    F: PartitionFinder<Graph = S::Graph> + ?Sized,
    O: SeedObserver + ?Sized,
{
    config.validate()?;

    let edge_list = build_edge_list(matrix);
    let graph = store
        .build_graph(edge_list.n_vertices, &edge_list.edges)
        .map_err(ClusterError::GraphStore)?;

    let search = MultiSeedSearch::new(
        &graph,
        edge_list.n_vertices,
        &edge_list.weights,
        config.n_leiden_iterations,
        config.verbose,
    );

    let best = search
        .run(finder, config.n_seeds, observer)?
        .finish()
        .ok_or(ClusterError::NoSeeds)?;

    Ok(best.membership)
}
