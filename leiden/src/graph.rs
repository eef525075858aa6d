use num_traits::bounds::Bounded;
use num_traits::cast::AsPrimitive;
use num_traits::identities::{One, Zero};
use std::ops::{Add, AddAssign};
use std::slice::Iter;

pub trait IndexTrait:
    Add<Output = Self> + AddAssign + AsPrimitive<usize> + Bounded + Copy + One + PartialEq + PartialOrd + Zero
where
    Self: std::marker::Sized,
{
}

impl IndexTrait for usize {}
impl IndexTrait for u32 {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub struct Index<Ix>(Ix)
where
    Ix: IndexTrait;

impl<Ix> Index<Ix>
where
    Ix: IndexTrait,
{
    pub fn index(&self) -> Ix {
        self.0
    }
}

impl<Ix> From<Ix> for Index<Ix>
where
    Ix: IndexTrait,
{
    fn from(ix: Ix) -> Self {
        Index(ix)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Edge<W, NodeIx>
where
    NodeIx: IndexTrait,
{
    source: Index<NodeIx>,
    target: Index<NodeIx>,
    weight: W,
}

impl<W, NodeIx> Edge<W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    pub fn source(&self) -> Index<NodeIx> {
        self.source
    }
    pub fn target(&self) -> Index<NodeIx> {
        self.target
    }
    pub fn weight(&self) -> W {
        self.weight.clone()
    }
}

/// One half of an undirected edge, stored in the adjacency list of its source node.
#[derive(Copy, Clone, Debug)]
pub struct DiEdge<W, NodeIx = usize>
where
    NodeIx: IndexTrait,
{
    target: Index<NodeIx>,
    pub(crate) weight: W,
}

/// Edges incident to a single node.
pub struct Edges<'a, W, NodeIx = usize>
where
    NodeIx: IndexTrait,
{
    source: Index<NodeIx>,
    iter: Iter<'a, DiEdge<W, NodeIx>>,
}

impl<'a, W, NodeIx> Iterator for Edges<'a, W, NodeIx>
where
    NodeIx: IndexTrait,
{
    type Item = Edge<&'a W, NodeIx>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|DiEdge { target, weight }| Edge {
            source: self.source,
            target: *target,
            weight,
        })
    }
}

/// Every undirected edge of the graph exactly once, reported from its lower-indexed endpoint.
pub struct EdgeReferences<'a, W, NodeIx = usize>
where
    NodeIx: IndexTrait,
{
    lists: Iter<'a, Vec<DiEdge<W, NodeIx>>>,
    next_source: NodeIx,
    current: Option<(Index<NodeIx>, Iter<'a, DiEdge<W, NodeIx>>)>,
}

impl<'a, W, NodeIx> Iterator for EdgeReferences<'a, W, NodeIx>
where
    NodeIx: IndexTrait,
{
    type Item = Edge<&'a W, NodeIx>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((source, iter)) = self.current.as_mut() {
                for DiEdge { target, weight } in iter.by_ref() {
                    if target.0 >= source.0 {
                        return Some(Edge {
                            source: *source,
                            target: *target,
                            weight,
                        });
                    }
                }
            }

            let list = self.lists.next()?;
            self.current = Some((Index(self.next_source), list.iter()));
            self.next_source += NodeIx::one();
        }
    }
}

/// Undirected graph stored as one adjacency list per node. Each edge between distinct nodes
/// appears in both adjacency lists; a self-loop appears once, in its node's list.
pub struct UnGraph<NodeW, EdgeW, NodeIx = usize>
where
    NodeW: Add<Output = NodeW> + AddAssign + Clone + Zero,
    EdgeW: Clone,
    NodeIx: IndexTrait,
{
    pub(crate) edges: Vec<Vec<DiEdge<EdgeW, NodeIx>>>,
    node_weights: Vec<NodeW>,
    total_edges: usize,
    total_nodes: NodeIx,
}

impl<NodeW, EdgeW, NodeIx> UnGraph<NodeW, EdgeW, NodeIx>
where
    NodeW: Add<Output = NodeW> + AddAssign + Clone + Zero,
    EdgeW: Clone,
    NodeIx: IndexTrait,
{
    pub fn with_capacity(nodes: usize) -> Self {
        UnGraph {
            edges: Vec::with_capacity(nodes),
            node_weights: Vec::with_capacity(nodes),
            total_edges: 0,
            total_nodes: NodeIx::zero(),
        }
    }

    pub fn add_node(&mut self, weight: NodeW) -> Index<NodeIx> {
        let index = self.total_nodes;
        self.edges.push(vec![]);
        self.node_weights.push(weight);
        self.total_nodes += NodeIx::one();
        Index(index)
    }

    pub fn add_edge(&mut self, source: Index<NodeIx>, target: Index<NodeIx>, weight: EdgeW) {
        if source != target {
            self.edges[target.0.as_()].push(DiEdge {
                target: source,
                weight: weight.clone(),
            });
        }
        self.edges[source.0.as_()].push(DiEdge { target, weight });
        self.total_edges += 1;
    }

    pub fn edge_count(&self) -> usize {
        self.total_edges
    }

    pub fn node_count(&self) -> usize {
        self.node_weights.len()
    }

    pub fn node_weight(&self, ix: Index<NodeIx>) -> Option<&NodeW> {
        self.node_weights.get(ix.0.as_())
    }

    pub fn edges(&self, source: Index<NodeIx>) -> Edges<'_, EdgeW, NodeIx> {
        Edges {
            source,
            iter: self.edges[source.0.as_()].iter(),
        }
    }

    pub fn edge_references(&self) -> EdgeReferences<'_, EdgeW, NodeIx> {
        EdgeReferences {
            lists: self.edges.iter(),
            next_source: NodeIx::zero(),
            current: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edge_references_visit_each_edge_once() {
        let mut g = UnGraph::<f64, f64, u32>::with_capacity(4);
        for _ in 0..4 {
            g.add_node(0.0);
        }
        g.add_edge(0u32.into(), 1u32.into(), 1.0);
        g.add_edge(2u32.into(), 1u32.into(), 2.0);
        g.add_edge(3u32.into(), 3u32.into(), 4.0);

        let edges = g
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
            .collect::<Vec<_>>();

        assert_eq!(edges, vec![(0, 1, 1.0), (1, 2, 2.0), (3, 3, 4.0)]);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges(1u32.into()).count(), 2);
        assert_eq!(g.edges(3u32.into()).count(), 1);
    }
}
