use crate::finder::{Objective, PartitionFinder, PartitionRequest};
use crate::observer::SeedObserver;
use crate::select::BestSelector;
use crate::ClusterError;
use anyhow::anyhow;
use log::debug;

/// Distance between the seeds of consecutive attempts.
pub const SEED_STRIDE: u64 = 100;

/// Seed handed to the partition finder for the 1-based attempt `seed_index`.
pub fn derive_seed(seed_index: usize) -> u64 {
    seed_index as u64 * SEED_STRIDE
}

/// Runs the partition finder once per seed over a fixed graph and keeps the best result.
pub struct MultiSeedSearch<'a, G> {
    graph: &'a G,
    n_vertices: usize,
    weights: &'a [f64],
    n_iterations: i64,
    verbose: bool,
}

impl<'a, G> MultiSeedSearch<'a, G> {
    /// Search over `graph`, which has `n_vertices` vertices and one entry of `weights` per edge.
    pub fn new(graph: &'a G, n_vertices: usize, weights: &'a [f64], n_iterations: i64, verbose: bool) -> Self {
        MultiSeedSearch {
            graph,
            n_vertices,
            weights,
            n_iterations,
            verbose,
        }
    }

    /// Call `finder` for seeds `1..=n_seeds` in order.
    ///
    /// The first finder error stops the search. With `verbose` set, `observer` hears about
    /// every seed's quality.
    pub fn run<F, O>(&self, finder: &mut F, n_seeds: usize, observer: &mut O) -> Result<BestSelector, ClusterError>
    where
        F: PartitionFinder<Graph = G> + ?Sized,
        O: SeedObserver + ?Sized,
    {
        let mut selector = BestSelector::new();

        for seed_index in 1..=n_seeds {
            let seed = derive_seed(seed_index);
            debug!("Leiden clustering: seed {seed_index}/{n_seeds}");

            let request = PartitionRequest {
                weights: self.weights,
                objective: Objective::Modularity,
                n_iterations: self.n_iterations,
                initial_membership: None,
                seed,
            };

            let partition = finder
                .find_partition(self.graph, &request)
                .map_err(|source| ClusterError::Finder { seed, source })?;

            if partition.membership.len() != self.n_vertices {
                return Err(ClusterError::Finder {
                    seed,
                    source: anyhow!(
                        "partition has {} labels for {} vertices",
                        partition.membership.len(),
                        self.n_vertices
                    ),
                });
            }

            if self.verbose {
                observer.seed_quality(seed_index, partition.quality);
            }

            selector.offer(seed_index, partition);
        }

        Ok(selector)
    }
}
