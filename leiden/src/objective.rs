use crate::{Clustering, Network};
use rayon::iter::ParallelIterator;
use rayon::prelude::*;

/// Combine the edge weight internal to clusters with the cluster strengths.
///
/// `internal_weight` counts every edge inside a cluster once (self-loops included) and
/// `total_edge_weight` is the weight of all edges, again counting self-loops once.
fn unscaled_modularity(
    graph: &Network,
    clustering: &impl Clustering,
    internal_weight: f64,
    total_edge_weight: f64,
) -> f64 {
    if total_edge_weight == 0.0 {
        return 0.0;
    }

    let mut cluster_weights = vec![0.0; clustering.num_clusters()];

    for i in 0..graph.nodes() {
        cluster_weights[clustering.get(i)] += graph.weight(i);
    }

    let mut quality = 2.0 * internal_weight;
    for cluster_weight in cluster_weights {
        quality -= cluster_weight * cluster_weight / (2.0 * total_edge_weight);
    }

    quality
}

/// Modularity of a network clustering, without the final division by `2m`.
///
/// With `m` the total edge weight, `w_c` the edge weight inside cluster `c` and `K_c` the summed
/// strength of its nodes, this is `sum_c (2 w_c - K_c^2 / 2m)`. Node weights must be node strengths,
/// as set up by [`Network::from_weighted_edges`]. Returns 0 for a network without edges.
pub fn modularity(graph: &Network, clustering: &impl Clustering) -> f64 {
    let mut internal_weight = 0.0f64;
    let mut total_edge_weight = 0.0f64;

    for e in graph.graph.edge_references() {
        let c1 = clustering.get(e.source().index() as usize);
        let c2 = clustering.get(e.target().index() as usize);

        if c1 == c2 {
            internal_weight += *e.weight();
        }

        total_edge_weight += *e.weight();
    }

    for i in 0..graph.nodes() {
        internal_weight += graph.self_loop_weight(i);
        total_edge_weight += graph.self_loop_weight(i);
    }

    unscaled_modularity(graph, clustering, internal_weight, total_edge_weight)
}

/// Same value as [`modularity`], computed using parallelization.
///
/// Partial sums are reduced serially in chunk order, so the result is identical from run to run.
pub fn par_modularity<C: Clustering + Sync>(graph: &Network, clustering: &C) -> f64 {
    // Create a number of chunks that is large relative to typical thread-counts
    // To allow rayon to balance the uneven chunk loads induced by the "node ordering" constraint.
    let chunk_size = std::cmp::max(1, ((graph.nodes() as f64) / 64.0) as usize);
    let weight_chunks = (0..graph.nodes())
        .collect::<Vec<usize>>()
        .par_chunks(chunk_size)
        .map(|nodes| {
            let mut internal_weight = 0f64;
            let mut total_edge_weight = 0f64;

            for &i in nodes {
                let c_i = clustering.get(i);
                for (j, edge_weight) in graph.neighbors(i) {
                    // Enforce ordering of node indices to avoid processing edges twice.
                    if j < i {
                        total_edge_weight += edge_weight;
                        if c_i == clustering.get(j) {
                            internal_weight += edge_weight;
                        }
                    }
                }

                internal_weight += graph.self_loop_weight(i);
                total_edge_weight += graph.self_loop_weight(i);
            }
            (internal_weight, total_edge_weight)
        })
        .collect::<Vec<(f64, f64)>>();

    // Reduce serially to ensure deterministic order of adds
    let (internal_weight, total_edge_weight) = weight_chunks
        .into_iter()
        .fold((0f64, 0f64), |a, b| (a.0 + b.0, a.1 + b.1));

    unscaled_modularity(graph, clustering, internal_weight, total_edge_weight)
}
