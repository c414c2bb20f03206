//! Graph model: nodes, links, the serialized document and the in-memory
//! [`TagGraph`] it is emitted from.
//!
//! [`TagGraph`] wraps a petgraph `StableGraph` keyed by [`NodeKey`]. Node and
//! link insertion order is preserved so [`TagGraph::to_document`] is
//! deterministic for a given build sequence.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeKey;

/// Owner recorded on every emitted node.
pub const DEFAULT_USER: &str = "admin";

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "[ENTRY]")]
    Entry,
    #[serde(rename = "[TAG]")]
    Tag,
}

/// Kind of a graph link, named after its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Entry -> its deepest tag.
    #[serde(rename = "[ENTRY]")]
    EntryToTag,
    /// Tag -> its immediate parent tag.
    #[serde(rename = "[TAG]")]
    TagToTag,
}

/// A node as it appears in the graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeKey,
    pub user: String,
    pub title: String,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// A directed link as it appears in the graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: NodeKey,
    pub target: NodeKey,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// The serialized node/link document consumed by the visualization layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a document, running the structural check first.
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        check_structure(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty-printed JSON, the on-disk form.
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &NodeKey) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Links leaving `id`, in document order.
    pub fn links_from(&self, id: &NodeKey) -> impl Iterator<Item = &GraphLink> + '_ {
        let id = id.clone();
        self.links.iter().filter(move |l| l.source == id)
    }
}

/// Checks that a JSON value is an object with `nodes` and `links` arrays.
pub fn check_structure(value: &serde_json::Value) -> Result<(), CoreError> {
    let obj = value.as_object().ok_or_else(|| CoreError::MalformedGraph {
        reason: "document is not a JSON object".to_string(),
    })?;
    for key in ["nodes", "links"] {
        match obj.get(key) {
            Some(v) if v.is_array() => {}
            Some(_) => {
                return Err(CoreError::MalformedGraph {
                    reason: format!("'{}' is not an array", key),
                })
            }
            None => {
                return Err(CoreError::MalformedGraph {
                    reason: format!("missing '{}'", key),
                })
            }
        }
    }
    Ok(())
}

/// In-memory directed graph of entries and tags.
#[derive(Debug, Clone, Default)]
pub struct TagGraph {
    graph: StableGraph<GraphNode, LinkKind, Directed, u32>,
    index: HashMap<NodeKey, NodeIndex<u32>>,
}

impl TagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless one with the same id exists.
    ///
    /// Returns `true` if the node was inserted.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        let key = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        true
    }

    /// Adds a link between two existing nodes.
    pub fn add_link(
        &mut self,
        source: &NodeKey,
        target: &NodeKey,
        kind: LinkKind,
    ) -> Result<EdgeIndex<u32>, CoreError> {
        let s = self.lookup(source)?;
        let t = self.lookup(target)?;
        Ok(self.graph.add_edge(s, t, kind))
    }

    pub fn contains(&self, id: &NodeKey) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &NodeKey) -> Option<&GraphNode> {
        self.index.get(id).and_then(|idx| self.graph.node_weight(*idx))
    }

    /// Targets of every outgoing link of `id`, with the link kind.
    pub fn outgoing(&self, id: &NodeKey) -> Vec<(&GraphNode, LinkKind)> {
        let Some(idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<(EdgeIndex<u32>, &GraphNode, LinkKind)> = self
            .graph
            .edges_directed(*idx, Direction::Outgoing)
            .filter_map(|e| {
                self.graph
                    .node_weight(e.target())
                    .map(|n| (e.id(), n, *e.weight()))
            })
            .collect();
        out.sort_by_key(|(eid, _, _)| eid.index());
        out.into_iter().map(|(_, n, k)| (n, k)).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Emits the document in insertion order.
    ///
    /// Nothing is ever removed from the graph, so index order equals
    /// insertion order.
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect();
        let links = self
            .graph
            .edge_indices()
            .filter_map(|eidx| {
                let (s, t) = self.graph.edge_endpoints(eidx)?;
                let kind = *self.graph.edge_weight(eidx)?;
                Some(GraphLink {
                    source: self.graph.node_weight(s)?.id.clone(),
                    target: self.graph.node_weight(t)?.id.clone(),
                    kind,
                })
            })
            .collect();
        GraphDocument { nodes, links }
    }

    fn lookup(&self, id: &NodeKey) -> Result<NodeIndex<u32>, CoreError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })
    }
}
