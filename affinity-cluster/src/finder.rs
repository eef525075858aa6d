use anyhow::Result;

/// Quality objective a partition finder is asked to optimise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Modularity-style vertex partition.
    Modularity,
}

/// Arguments of one partition finder call.
#[derive(Clone, Debug)]
pub struct PartitionRequest<'a> {
    /// Weight of each edge, in the order the graph was built with.
    pub weights: &'a [f64],
    /// Objective to optimise.
    pub objective: Objective,
    /// Iteration budget. Negative means iterate until convergence.
    pub n_iterations: i64,
    /// Optional starting partition, one label per vertex.
    pub initial_membership: Option<&'a [usize]>,
    /// Seed fixing the finder's random choices.
    pub seed: u64,
}

/// A vertex partition and its quality score.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    /// Cluster label of each vertex.
    pub membership: Vec<usize>,
    /// Objective value of `membership`, higher is better.
    pub quality: f64,
}

/// Builds the finder's graph representation from a vertex count and edge endpoints.
pub trait GraphStore {
    /// Graph handle passed back to the matching [`PartitionFinder`].
    type Graph;

    /// Build a graph with `n_vertices` vertices and the given edges, kept in order.
    fn build_graph(&self, n_vertices: usize, edges: &[(usize, usize)]) -> Result<Self::Graph>;
}

/// Stochastic community detection over a graph built by a [`GraphStore`].
pub trait PartitionFinder {
    /// Graph handle accepted by this finder.
    type Graph;

    /// Compute a partition of `graph`. The same graph, request and seed must give the same
    /// partition.
    fn find_partition(&mut self, graph: &Self::Graph, request: &PartitionRequest<'_>) -> Result<Partition>;
}
