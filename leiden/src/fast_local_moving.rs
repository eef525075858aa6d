use crate::{Clustering, Network, ZeroVec};
use rand::{seq::SliceRandom, Rng};

/// Local moving with a queue of unstable nodes: after a node changes cluster, only its neighbors
/// that fall outside the new cluster are revisited.
#[derive(Default)]
pub(crate) struct FastLocalMoving {
    resolution: f64,
    cluster_weights: Vec<f64>,
    nodes_per_cluster: Vec<usize>,
    unused_clusters: Vec<usize>,
    node_order: Vec<usize>,
    stable_nodes: Vec<bool>,
    edge_weight_per_cluster: Vec<f64>,
    neighboring_clusters: Vec<usize>,
}

impl FastLocalMoving {
    pub fn new(resolution: f64) -> Self {
        FastLocalMoving {
            resolution,
            ..FastLocalMoving::default()
        }
    }

    pub fn iterate(&mut self, n: &Network, c: &mut impl Clustering, rng: &mut impl Rng) -> bool {
        if n.nodes() == 0 {
            return false;
        }

        let mut update = false;

        self.cluster_weights.zero_len(n.nodes());
        self.nodes_per_cluster.zero_len(n.nodes());

        for i in 0..n.nodes() {
            self.cluster_weights[c.get(i)] += n.weight(i);
            self.nodes_per_cluster[c.get(i)] += 1;
        }

        let mut num_unused_clusters = 0;
        self.unused_clusters.zero_len(n.nodes());

        // make a list of unused cluster ids.
        for i in (0..n.nodes()).rev() {
            if self.nodes_per_cluster[i] == 0 {
                self.unused_clusters[num_unused_clusters] = i;
                num_unused_clusters += 1;
            }
        }

        // generate random permutation of the nodes
        self.node_order.clear();
        self.node_order.extend(0..n.nodes());
        self.node_order.shuffle(rng);

        self.stable_nodes.zero_len(n.nodes());
        self.edge_weight_per_cluster.zero_len(n.nodes());
        self.neighboring_clusters.zero_len(n.nodes());

        /*
         * The queue of nodes still to be visited is node_order[i], ...,
         * node_order[i + num_unstable_nodes - 1], wrapping around the end of
         * the array. Nodes re-enter the queue when a neighbor changes cluster.
         */
        let mut num_unstable_nodes = n.nodes();
        let mut i = 0;

        loop {
            let j = self.node_order[i];
            let current_cluster = c.get(j);

            // Remove the currently selected node from its current cluster.
            self.cluster_weights[current_cluster] -= n.weight(j);
            self.nodes_per_cluster[current_cluster] -= 1;
            if self.nodes_per_cluster[current_cluster] == 0 {
                self.unused_clusters[num_unused_clusters] = current_cluster;
                num_unused_clusters += 1;
            }

            /*
             * Identify the neighboring clusters of the currently selected
             * node. An empty cluster is always a candidate, so the node can
             * also be moved out on its own.
             */
            self.neighboring_clusters[0] = self.unused_clusters[num_unused_clusters - 1];
            let mut num_neighboring_clusters = 1;
            for (target, edge_weight) in n.neighbors(j) {
                let neighbor_cluster = c.get(target);

                if self.edge_weight_per_cluster[neighbor_cluster] == 0.0 {
                    self.neighboring_clusters[num_neighboring_clusters] = neighbor_cluster;
                    num_neighboring_clusters += 1;
                }
                self.edge_weight_per_cluster[neighbor_cluster] += edge_weight;
            }

            /*
             * Move the node to the neighboring cluster with the largest
             * quality increment. Staying put wins unless another cluster is
             * strictly better.
             */
            let mut best_cluster = current_cluster;
            let mut max_qv_increment = self.edge_weight_per_cluster[current_cluster]
                - n.weight(j) * self.cluster_weights[current_cluster] * self.resolution;

            for &l in &self.neighboring_clusters[..num_neighboring_clusters] {
                let qv_increment =
                    self.edge_weight_per_cluster[l] - n.weight(j) * self.cluster_weights[l] * self.resolution;
                if qv_increment > max_qv_increment {
                    best_cluster = l;
                    max_qv_increment = qv_increment;
                }
                self.edge_weight_per_cluster[l] = 0.0;
            }

            self.cluster_weights[best_cluster] += n.weight(j);
            self.nodes_per_cluster[best_cluster] += 1;

            if best_cluster == self.unused_clusters[num_unused_clusters - 1] {
                num_unused_clusters -= 1;
            }

            // Mark the currently selected node as stable and remove it from the queue.
            self.stable_nodes[j] = true;
            num_unstable_nodes -= 1;

            /*
             * If the node changed cluster, its neighbors outside the new
             * cluster become unstable and are appended to the queue.
             */
            if best_cluster != current_cluster {
                c.set(j, best_cluster);

                for (target, _) in n.neighbors(j) {
                    if self.stable_nodes[target] && c.get(target) != best_cluster {
                        self.stable_nodes[target] = false;
                        num_unstable_nodes += 1;
                        self.node_order[(i + num_unstable_nodes) % n.nodes()] = target;
                    }
                }

                update = true;
            }

            i = (i + 1) % n.nodes();

            if num_unstable_nodes == 0 {
                break;
            }
        }

        if update {
            c.remove_empty_clusters();
        }

        update
    }
}
