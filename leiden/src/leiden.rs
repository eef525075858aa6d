use crate::fast_local_moving::FastLocalMoving;
use crate::local_merging::LocalMerging;
use crate::{Clustering, Network, ZeroVec};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Default randomness of the refinement phase
pub const DEFAULT_RANDOMNESS: f64 = 1e-2;

/// Perform the Leiden clustering algorithm
pub struct Leiden {
    resolution: f64,
    randomness: f64,

    rng: ChaCha20Rng,

    local_moving: FastLocalMoving,
    num_nodes_per_cluster_reduced_network: Vec<usize>,
}

impl Leiden {
    /// Initialize the Leiden algorithm with the given resolution and randomness parameters.
    /// The random stream is fully determined by `seed` and is the same on every platform.
    pub fn new(resolution: f64, randomness: f64, seed: u64) -> Leiden {
        Leiden {
            resolution,
            randomness,
            rng: ChaCha20Rng::seed_from_u64(seed),
            local_moving: FastLocalMoving::new(resolution),
            num_nodes_per_cluster_reduced_network: Vec::new(),
        }
    }

    /// Iterate the Leiden algorithm one step. Returns true if cluster labels were updated, otherwise returns false.
    pub fn iterate<C: Clustering>(&mut self, n: &Network, c: &mut C) -> bool {
        // Update the clustering by moving individual nodes between clusters.
        let mut update = self.local_moving.iterate(n, c, &mut self.rng);

        if c.num_clusters() == n.nodes() {
            return update;
        }

        let mut local_merging = LocalMerging::new(self.resolution, self.randomness);

        let subnetworks = n.create_subnetworks(c);

        let nodes_per_cluster = c.nodes_per_cluster();

        // clear clustering
        c.clear();

        self.num_nodes_per_cluster_reduced_network.zero_len(subnetworks.len());
        let mut cluster_counter = 0;

        for i in 0..subnetworks.len() {
            let sub_clustering = local_merging.run(&subnetworks[i], &mut self.rng);

            for j in 0..subnetworks[i].nodes() {
                c.set(nodes_per_cluster[i][j], cluster_counter + sub_clustering.get(j))
            }

            cluster_counter += sub_clustering.num_clusters();
            self.num_nodes_per_cluster_reduced_network[i] = sub_clustering.num_clusters()
        }
        c.remove_empty_clusters();

        if c.num_clusters() == n.nodes() {
            // The refinement kept every node on its own, so aggregating it would reproduce this
            // network. Aggregate the non-refined clustering instead and start from singletons.
            for (cluster, nodes) in nodes_per_cluster.iter().enumerate() {
                for &node in nodes {
                    c.set(node, cluster);
                }
            }
            c.remove_empty_clusters();

            let reduced_n = n.create_reduced_network(c);
            let mut clustering_reduced_network = C::init_different_clusters(reduced_n.nodes());

            update |= self.iterate(&reduced_n, &mut clustering_reduced_network);
            c.merge_clusters(&clustering_reduced_network);

            return update;
        }

        // Create an aggregate network based on the refined clustering of
        // the non-aggregate network.
        let reduced_n = n.create_reduced_network(c);

        // Create an initial clustering for the aggregate network based on the
        // non-refined clustering of the non-aggregate network.
        let mut clusters_reduced_network = vec![0; c.num_clusters()];

        let mut i = 0;
        for (j, num_nodes) in self.num_nodes_per_cluster_reduced_network.iter().enumerate() {
            for cluster in clusters_reduced_network.iter_mut().skip(i).take(*num_nodes) {
                *cluster = j;
            }
            i += num_nodes;
        }

        let mut clustering_reduced_network = C::new_from_labels(&clusters_reduced_network);

        // Recursively apply the algorithm to the aggregate network,
        // starting from the initial clustering created for this network.
        update |= self.iterate(&reduced_n, &mut clustering_reduced_network);

        // Update the clustering of the non-aggregate network so that it
        // coincides with the final clustering obtained for the aggregate
        // network.
        c.merge_clusters(&clustering_reduced_network);

        update
    }
}
