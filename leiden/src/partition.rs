use crate::leiden::{Leiden, DEFAULT_RANDOMNESS};
use crate::objective::par_modularity;
use crate::{Clustering, Network, SimpleClustering};

/// Settings for one modularity optimisation run.
#[derive(Clone, Debug)]
pub struct RunOptions<'a> {
    /// Number of Leiden iterations. A negative value iterates until an iteration no longer
    /// improves the partition; zero keeps the initial partition.
    pub n_iterations: i64,
    /// Randomness of the refinement phase.
    pub randomness: f64,
    /// Seed of the random stream driving node orders and refinement choices.
    pub seed: u64,
    /// Starting partition. Each node starts in its own cluster when absent.
    pub initial_membership: Option<&'a [usize]>,
}

impl Default for RunOptions<'_> {
    fn default() -> Self {
        RunOptions {
            n_iterations: -1,
            randomness: DEFAULT_RANDOMNESS,
            seed: 0,
            initial_membership: None,
        }
    }
}

/// Outcome of a modularity optimisation run.
#[derive(Clone, Debug, PartialEq)]
pub struct ModularityPartition {
    /// Cluster label of each node. Label 0 is the largest cluster.
    pub membership: Vec<usize>,
    /// Unscaled modularity of `membership`, as computed by [`crate::objective::modularity`].
    pub quality: f64,
}

/// Optimise the modularity of `network` with the Leiden algorithm.
///
/// Node weights of `network` must be node strengths, which is what
/// [`Network::from_weighted_edges`] produces. Panics if `initial_membership` does not have one
/// label per node.
pub fn optimise_modularity(network: &Network, options: &RunOptions<'_>) -> ModularityPartition {
    let mut clustering = match options.initial_membership {
        Some(labels) => {
            assert_eq!(
                labels.len(),
                network.nodes(),
                "initial membership must have one label per node"
            );
            SimpleClustering::new_from_labels(labels)
        }
        None => SimpleClustering::init_different_clusters(network.nodes()),
    };

    // Modularity is CPM on strengths with a resolution of 1 / 2m.
    let total_node_weight = network.get_total_node_weight();

    let mut quality = par_modularity(network, &clustering);

    if total_node_weight > 0.0 {
        let mut leiden = Leiden::new(1.0 / total_node_weight, options.randomness, options.seed);

        if options.n_iterations < 0 {
            loop {
                let updated = leiden.iterate(network, &mut clustering);
                let new_quality = par_modularity(network, &clustering);
                let improved = new_quality > quality;
                quality = new_quality;
                if !updated || !improved {
                    break;
                }
            }
        } else {
            for _ in 0..options.n_iterations {
                leiden.iterate(network, &mut clustering);
            }
            quality = par_modularity(network, &clustering);
        }
    }

    clustering.relabel_by_size();

    ModularityPartition {
        membership: clustering.into_labels(),
        quality,
    }
}
