//! Graph store
//!
//! The single source of truth for which nodes exist and how they are
//! connected. Nodes are stored under opaque [`NodeKey`]s that are never
//! reused, so a key held by a `source` list can always be checked for
//! liveness with [`Graph::contains`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowModelError};

/// Stable handle of a node in the graph
///
/// Keys are allocated in increasing order, so iterating the store yields
/// nodes in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(u64);

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeKey,
    pub destination: NodeKey,
}

impl Edge {
    /// Whether either endpoint is `key`
    pub fn touches(&self, key: NodeKey) -> bool {
        self.source == key || self.destination == key
    }

    /// The endpoint that is not `key`, if `key` is one of the endpoints
    pub fn other(&self, key: NodeKey) -> Option<NodeKey> {
        if self.source == key {
            Some(self.destination)
        } else if self.destination == key {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Registry of nodes and directed edges
///
/// Multiple edges may share endpoints (fan-in and repeated connections are
/// both allowed).
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: BTreeMap<NodeKey, N>,
    edges: Vec<Edge>,
    next_key: u64,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            next_key: 0,
        }
    }
}

impl<N> Graph<N> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node built from its freshly allocated key
    pub fn add_node_with(&mut self, build: impl FnOnce(NodeKey) -> N) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(key, build(key));
        key
    }

    /// Add a node
    pub fn add_node(&mut self, node: N) -> NodeKey {
        self.add_node_with(|_| node)
    }

    /// Remove a node and every edge touching it
    ///
    /// Returns the node together with the removed edges, or `None` if the
    /// key is unknown (in which case nothing changes).
    pub fn remove_node(&mut self, key: NodeKey) -> Option<(N, Vec<Edge>)> {
        let node = self.nodes.remove(&key)?;
        let removed = self.remove_edges(|edge| edge.touches(key));
        Some((node, removed))
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, source: NodeKey, destination: NodeKey) -> Result<Edge> {
        for key in [source, destination] {
            if !self.contains(key) {
                return Err(WorkflowModelError::UnresolvedReference(key.to_string()));
            }
        }
        let edge = Edge {
            source,
            destination,
        };
        self.edges.push(edge);
        Ok(edge)
    }

    /// Remove every edge matching `predicate`, returning them in order
    pub fn remove_edges(&mut self, mut predicate: impl FnMut(&Edge) -> bool) -> Vec<Edge> {
        let mut removed = Vec::new();
        self.edges.retain(|edge| {
            if predicate(edge) {
                removed.push(*edge);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove the first edge equal to `edge`
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        match self.edges.iter().position(|e| *e == edge) {
            Some(pos) => {
                self.edges.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Edges with `key` as either endpoint
    pub fn edges_touching(&self, key: NodeKey) -> Vec<Edge> {
        self.edges.iter().filter(|e| e.touches(key)).copied().collect()
    }

    /// Edges ending at `key`
    pub fn incoming(&self, key: NodeKey) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.destination == key)
    }

    /// Edges starting at `key`
    pub fn outgoing(&self, key: NodeKey) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.source == key)
    }

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(&key)
    }

    /// Get a node by key (mutable)
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut N> {
        self.nodes.get_mut(&key)
    }

    /// Check if a node exists
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &N)> + '_ {
        self.nodes.iter().map(|(k, n)| (*k, n))
    }

    /// All nodes in insertion order (mutable)
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (NodeKey, &mut N)> + '_ {
        self.nodes.iter_mut().map(|(k, n)| (*k, n))
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
