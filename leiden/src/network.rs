use crate::graph::{Edges, UnGraph};
use crate::Clustering;
use fxhash::FxHashMap;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSlice;
use std::collections::hash_map::Entry;

/// Undirected graph with f64 node weights and f64 edge weights. Used to represent the network being clustered.
pub type Graph = UnGraph<f64, f64, u32>;

/// Container for the network graph.
///
/// Node weights hold the strength of each node (the sum of its incident edge weights) so that the
/// Leiden moves optimise modularity. Self-loops are tracked per node, outside of the adjacency lists.
pub struct Network {
    pub(crate) graph: Graph,
    self_loops: Vec<f64>,
}

/// Iterator over pairs of (adjacent node id, edge_weight) for all neighbors of a chosen node.
pub struct NeighborAndWeightIter<'a> {
    edge_iter: Edges<'a, f64, u32>,
    home_node: usize,
}

impl Iterator for NeighborAndWeightIter<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.edge_iter.next().map(|edge_ref| {
            debug_assert_eq!(edge_ref.source().index() as usize, self.home_node);
            (edge_ref.target().index() as usize, *edge_ref.weight())
        })
    }
}

/// Merge `weight` into the edge keyed by the unordered pair `(a, b)`, remembering first-seen order.
fn accumulate_pair(
    memo: &mut FxHashMap<(u32, u32), f64>,
    order: &mut Vec<(u32, u32)>,
    a: u32,
    b: u32,
    weight: f64,
) {
    let key = if a < b { (a, b) } else { (b, a) };
    match memo.entry(key) {
        Entry::Occupied(mut e) => *e.get_mut() += weight,
        Entry::Vacant(e) => {
            e.insert(weight);
            order.push(key);
        }
    }
}

impl Network {
    /// Create a new empty network
    pub fn new() -> Network {
        Network {
            graph: Graph::with_capacity(0),
            self_loops: Vec::new(),
        }
    }

    /// Build a network over `n_nodes` nodes from `(source, target, weight)` triples.
    ///
    /// Repeated node pairs, in either orientation, are merged into one edge carrying the summed
    /// weight, in the order the pairs are first seen. Self-loops count toward the total edge
    /// weight and add twice their weight to the node weight, but are never reported as neighbors.
    /// Zero-weight entries are skipped.
    ///
    /// Panics if an endpoint is not below `n_nodes`.
    pub fn from_weighted_edges<I>(n_nodes: usize, edges: I) -> Network
    where
        I: IntoIterator<Item = (u32, u32, f64)>,
    {
        let mut strengths = vec![0.0; n_nodes];
        let mut self_loops = vec![0.0; n_nodes];
        let mut pair_weights = FxHashMap::default();
        let mut pair_order = Vec::new();

        for (i, j, weight) in edges {
            assert!(
                (i as usize) < n_nodes && (j as usize) < n_nodes,
                "edge ({i}, {j}) out of range for a network of {n_nodes} nodes"
            );
            if weight == 0.0 {
                continue;
            }

            if i == j {
                self_loops[i as usize] += weight;
                strengths[i as usize] += 2.0 * weight;
            } else {
                strengths[i as usize] += weight;
                strengths[j as usize] += weight;
                accumulate_pair(&mut pair_weights, &mut pair_order, i, j, weight);
            }
        }

        let mut graph = Graph::with_capacity(n_nodes);
        for strength in strengths {
            graph.add_node(strength);
        }
        for (i, j) in pair_order {
            graph.add_edge(i.into(), j.into(), pair_weights[&(i, j)]);
        }

        Network { graph, self_loops }
    }

    /// Number of nodes in the graph
    pub fn nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges between different nodes
    pub fn edges_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get the node weight of `node`.
    pub fn weight(&self, node: usize) -> f64 {
        *self.graph.node_weight((node as u32).into()).unwrap()
    }

    /// Total weight of the self-loops on `node`. Networks derived from a clustering carry none.
    pub fn self_loop_weight(&self, node: usize) -> f64 {
        self.self_loops.get(node).copied().unwrap_or(0.0)
    }

    /// Iterate over edges connected to `node`
    fn edges(&'_ self, node: usize) -> Edges<'_, f64, u32> {
        self.graph.edges((node as u32).into())
    }

    /// Iterator over pairs of (adjacent node id, edge_weight) for all neighbors of `node`.
    pub fn neighbors(&'_ self, node: usize) -> NeighborAndWeightIter<'_> {
        NeighborAndWeightIter {
            edge_iter: self.edges(node),
            home_node: node,
        }
    }

    /// Get the total weight of all nodes in the graph
    pub fn get_total_node_weight(&self) -> f64 {
        (0..self.nodes()).map(|i| self.weight(i)).sum()
    }

    /// Get the total weight of the edges between distinct nodes
    pub fn get_total_edge_weight(&self) -> f64 {
        self.graph
            .edge_references()
            .fold(0.0, |acc, edge| acc + *edge.weight())
    }

    /// Get the total weight of the edges between distinct nodes, summed in parallel
    pub fn get_total_edge_weight_par(&self) -> f64 {
        let mut partial_sums = vec![];

        // sum up the edge weights in parallelized over chunks, then sum the chunks to ensure
        // a deterministic result.  Just allow double counting of edge weights, and fix at the end
        // almost certainly faster than filtering on the fly.
        self.graph
            .edges
            .par_chunks(256)
            .map(|node_chunk| {
                node_chunk
                    .iter()
                    .map(|w| w.iter().fold(0.0, |acc, edge| acc + edge.weight))
                    .sum::<f64>()
            })
            .collect_into_vec(&mut partial_sums);

        // divide edge sum by 2 to account for double-counting
        partial_sums.iter().sum::<f64>() / 2.0
    }

    /// Get the total weight of all self-loops in the graph
    pub fn get_total_self_loop_weight(&self) -> f64 {
        self.self_loops.iter().sum()
    }

    /// Tabulate the total edge weight of each node into `result`
    pub fn get_total_edge_weight_per_node(&self, result: &mut Vec<f64>) {
        result.clear();

        for i in 0..self.nodes() {
            result.push(self.edges(i).fold(0.0, |acc, e| acc + *e.weight()));
        }
    }

    /// Creates a reduced (or aggregate) network based on a clustering.
    /// Each node in the reduced network corresponds to a cluster of nodes in
    /// the original network. The weight of a node in the reduced network equals
    /// the sum of the weights of the nodes in the corresponding cluster in the
    /// original network. The weight of an edge between two nodes in the reduced
    /// network equals the sum of the weights of the edges between the nodes in
    /// the two corresponding clusters in the original network.
    pub fn create_reduced_network(&self, clustering: &impl Clustering) -> Network {
        let mut cluster_weights = vec![0.0; clustering.num_clusters()];
        for i in 0..self.nodes() {
            cluster_weights[clustering.get(i)] += self.weight(i);
        }

        let mut cluster_g = Graph::with_capacity(cluster_weights.len());
        for w in cluster_weights {
            cluster_g.add_node(w);
        }

        let mut edge_memo = FxHashMap::default();
        let mut edge_order = Vec::new();

        for e in self.graph.edge_references() {
            let c1 = clustering.get(e.source().index() as usize) as u32;
            let c2 = clustering.get(e.target().index() as usize) as u32;

            if c1 == c2 {
                continue;
            }

            accumulate_pair(&mut edge_memo, &mut edge_order, c1, c2, *e.weight());
        }

        for (c1, c2) in edge_order {
            cluster_g.add_edge(c1.into(), c2.into(), edge_memo[&(c1, c2)]);
        }

        Network {
            graph: cluster_g,
            self_loops: Vec::new(),
        }
    }

    /// Make a subnetwork for each cluster
    pub fn create_subnetworks(&self, c: &impl Clustering) -> Vec<Network> {
        let mut graphs = Vec::with_capacity(c.num_clusters());
        let mut new_id_map = Vec::with_capacity(c.nodes());
        let mut counts = vec![0u32; c.num_clusters()];

        for _ in 0..c.num_clusters() {
            graphs.push(Graph::with_capacity(0));
        }

        for i in 0..self.nodes() {
            let c = c.get(i);

            new_id_map.push(counts[c]);
            counts[c] += 1;
            graphs[c].add_node(self.weight(i));
        }

        for e in self.graph.edge_references() {
            let n1 = e.source().index() as usize;
            let c1 = c.get(n1);

            let n2 = e.target().index() as usize;
            let c2 = c.get(n2);

            if c1 == c2 {
                let new_id1 = new_id_map[n1];
                let new_id2 = new_id_map[n2];
                graphs[c1].add_edge(new_id1.into(), new_id2.into(), *e.weight());
            }
        }

        graphs
            .into_iter()
            .map(|graph| Network {
                graph,
                self_loops: Vec::new(),
            })
            .collect()
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
