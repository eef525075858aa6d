//! Multi-seed Leiden clustering of sparse affinity matrices.
//!
//! A square CSR affinity matrix is expanded into a weighted edge list, a partition finder is run
//! once per seed (`100, 200, ...`), and the membership with the highest quality is returned.
#![deny(missing_docs)]

/// Bundled graph store and partition finder built on the `leiden` crate
pub mod backend;

/// Clustering entry points
pub mod cluster;

/// Settings of a clustering run
pub mod config;

mod error;

/// Graph store and partition finder interfaces
pub mod finder;

/// Conversion of an affinity matrix into an edge list
pub mod graph_builder;

/// Validated CSR affinity matrix
pub mod matrix;

/// Matrix Market loading
pub mod mtx;

/// Per-seed quality reporting
pub mod observer;

/// Seed loop over a partition finder
pub mod search;

/// Best-partition selection
pub mod select;

#[cfg(test)]
mod test;

pub use backend::{EdgeListGraph, LeidenBackend};
pub use cluster::{leiden_cluster, leiden_cluster_with};
pub use config::LeidenClusterConfig;
pub use error::ClusterError;
pub use finder::{GraphStore, Objective, Partition, PartitionFinder, PartitionRequest};
pub use graph_builder::{build_edge_list, EdgeList};
pub use matrix::AffinityMatrix;
pub use observer::{LogObserver, SeedObserver};
pub use search::MultiSeedSearch;
pub use select::{BestSelector, SelectedPartition};
