//! Leiden community detection algorithm, optimising modularity over weighted undirected networks
#![deny(missing_docs)]

/// Data structure for storing a clustering of nodes
pub mod clustering;

/// Data structure for storing a weighted, undirected graph (aka network)
pub mod network;

/// Leiden clustering algorithm
pub mod leiden;

/// Clustering objective functions
pub mod objective;

/// Seeded runs of the Leiden algorithm producing a scored partition
pub mod partition;

mod fast_local_moving;
mod graph;
mod local_merging;


pub use clustering::{Clustering, SimpleClustering};
pub use network::{Graph, Network};
pub use partition::{optimise_modularity, ModularityPartition, RunOptions};

trait ZeroVec {
    fn zero(&mut self);
    fn zero_len(&mut self, len: usize);
}

impl<T: Default> ZeroVec for Vec<T> {
    fn zero(&mut self) {
        for i in self.iter_mut() {
            *i = T::default();
        }
    }

    fn zero_len(&mut self, len: usize) {
        self.zero();
        self.resize_with(len, T::default)
    }
}
