use crate::finder::Partition;

/// The partition held by a [`BestSelector`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedPartition {
    /// 1-based index of the seed that produced the partition.
    pub seed_index: usize,
    /// Quality of the partition.
    pub quality: f64,
    /// Cluster label of each vertex.
    pub membership: Vec<usize>,
}

/// Keeps the highest-quality partition offered so far.
///
/// A partition replaces the held one only if its quality is strictly greater, so on ties the
/// earliest offer wins.
#[derive(Clone, Debug, Default)]
pub struct BestSelector {
    best: Option<SelectedPartition>,
}

impl BestSelector {
    /// A selector holding nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the partition found for `seed_index`. Returns true if it is now the one held.
    pub fn offer(&mut self, seed_index: usize, partition: Partition) -> bool {
        let replace = match &self.best {
            None => true,
            Some(best) => partition.quality > best.quality,
        };

        if replace {
            self.best = Some(SelectedPartition {
                seed_index,
                quality: partition.quality,
                membership: partition.membership,
            });
        }

        replace
    }

    /// The partition currently held.
    pub fn best(&self) -> Option<&SelectedPartition> {
        self.best.as_ref()
    }

    /// Consume the selector, returning the held partition if anything was offered.
    pub fn finish(self) -> Option<SelectedPartition> {
        self.best
    }
}
