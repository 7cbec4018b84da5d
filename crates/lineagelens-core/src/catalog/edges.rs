//! Object-edge catalog keyed by `(source, target)`.

use std::collections::HashMap;

use crate::types::ObjectEdge;

/// Object edges with a pair lookup.
///
/// When the same ordered pair is declared more than once, the first declaration
/// answers lookups. Later ones remain in [`EdgeCatalog::edges`] and are listed
/// by [`EdgeCatalog::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct EdgeCatalog {
    edges: Vec<ObjectEdge>,
    by_pair: HashMap<String, HashMap<String, usize>>,
    duplicates: Vec<usize>,
}

impl EdgeCatalog {
    pub fn new(edges: Vec<ObjectEdge>) -> Self {
        let mut by_pair: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut duplicates = Vec::new();

        for (idx, edge) in edges.iter().enumerate() {
            let targets = by_pair.entry(edge.source.clone()).or_default();
            if targets.contains_key(&edge.target) {
                duplicates.push(idx);
            } else {
                targets.insert(edge.target.clone(), idx);
            }
        }

        Self {
            edges,
            by_pair,
            duplicates,
        }
    }

    /// Metadata for the ordered pair `(source, target)`.
    ///
    /// Direction matters: `get_edge(a, b)` never answers with an edge `b -> a`.
    pub fn get_edge(&self, source: &str, target: &str) -> Option<&ObjectEdge> {
        self.by_pair
            .get(source)
            .and_then(|targets| targets.get(target))
            .map(|&idx| &self.edges[idx])
    }

    pub fn edges(&self) -> &[ObjectEdge] {
        &self.edges
    }

    /// Edges leaving `source`, in declaration order.
    pub fn outgoing<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a ObjectEdge> {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    /// Edges entering `target`, in declaration order.
    pub fn incoming<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a ObjectEdge> {
        self.edges.iter().filter(move |edge| edge.target == target)
    }

    /// Declarations shadowed by an earlier edge with the same pair.
    pub fn duplicates(&self) -> impl Iterator<Item = &ObjectEdge> {
        self.duplicates.iter().map(|&idx| &self.edges[idx])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
