use crate::finder::{GraphStore, Objective, Partition, PartitionFinder, PartitionRequest};
use anyhow::{bail, ensure, Result};
use leiden::leiden::DEFAULT_RANDOMNESS;
use leiden::{optimise_modularity, Network, RunOptions};
use log::debug;

/// Vertex count and edge endpoints, as stored by [`LeidenBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeListGraph {
    n_vertices: usize,
    edges: Vec<(u32, u32)>,
}

impl EdgeListGraph {
    /// Number of vertices.
    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// Number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }
}

/// Graph store and partition finder backed by the `leiden` crate.
///
/// Edges are read as undirected. Weights of repeated or mirrored entries add up, and the
/// reported quality is the unscaled modularity of the returned membership.
#[derive(Clone, Debug)]
pub struct LeidenBackend {
    randomness: f64,
}

impl Default for LeidenBackend {
    fn default() -> Self {
        LeidenBackend {
            randomness: DEFAULT_RANDOMNESS,
        }
    }
}

impl LeidenBackend {
    /// Backend with the default refinement randomness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the randomness of the refinement phase.
    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }
}

impl GraphStore for LeidenBackend {
    type Graph = EdgeListGraph;

    fn build_graph(&self, n_vertices: usize, edges: &[(usize, usize)]) -> Result<EdgeListGraph> {
        ensure!(
            n_vertices <= u32::MAX as usize,
            "graph has {n_vertices} vertices, at most {} are supported",
            u32::MAX
        );

        let edges = edges
            .iter()
            .map(|&(source, target)| {
                ensure!(
                    source < n_vertices && target < n_vertices,
                    "edge ({source}, {target}) references a vertex outside 0..{n_vertices}"
                );
                Ok((source as u32, target as u32))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EdgeListGraph { n_vertices, edges })
    }
}

impl PartitionFinder for LeidenBackend {
    type Graph = EdgeListGraph;

    fn find_partition(&mut self, graph: &EdgeListGraph, request: &PartitionRequest<'_>) -> Result<Partition> {
        ensure!(
            request.weights.len() == graph.edges.len(),
            "{} weights supplied for {} edges",
            request.weights.len(),
            graph.edges.len()
        );

        if let Some((edge, weight)) = request
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            bail!("edge {edge} has weight {weight}, modularity needs finite non-negative weights");
        }

        if let Some(initial) = request.initial_membership {
            ensure!(
                initial.len() == graph.n_vertices,
                "initial membership has {} labels for {} vertices",
                initial.len(),
                graph.n_vertices
            );
            ensure!(
                initial.iter().all(|&label| label < graph.n_vertices),
                "initial membership labels must be below the vertex count {}",
                graph.n_vertices
            );
        }

        let network = match request.objective {
            Objective::Modularity => Network::from_weighted_edges(
                graph.n_vertices,
                graph
                    .edges
                    .iter()
                    .zip(request.weights)
                    .map(|(&(source, target), &weight)| (source, target, weight)),
            ),
        };

        let result = optimise_modularity(
            &network,
            &RunOptions {
                n_iterations: request.n_iterations,
                randomness: self.randomness,
                seed: request.seed,
                initial_membership: request.initial_membership,
            },
        );

        debug!(
            "seed {}: {} clusters, quality {}",
            request.seed,
            result.membership.iter().max().map_or(0, |m| m + 1),
            result.quality
        );

        Ok(Partition {
            membership: result.membership,
            quality: result.quality,
        })
    }
}
