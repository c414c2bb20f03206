//! Compiles entries and their tag hierarchy into a graph document.
//!
//! # Algorithm
//!
//! 1. One Tag-node per expanded tag, ascending lexical order.
//! 2. One TAG_TO_TAG link from each tag of depth > 1 to its parent.
//! 3. One Entry-node per distinct title id, store order.
//! 4. One ENTRY_TO_TAG link per entry, to the deepest tag of its chain.
//!
//! Text that yields no identifier (blank title or tag segment) is skipped
//! with a warning; compilation itself never fails on it. Tags whose text
//! differs only by whitespace share one node and one parent link. An entry
//! whose title id is already taken by a tag is dropped, since tags never
//! carry ENTRY_TO_TAG links.

use serde::Serialize;

use crate::entry::Entry;
use crate::graph::{GraphDocument, GraphNode, LinkKind, NodeKind, TagGraph, DEFAULT_USER};
use crate::hierarchy::{expand, parent_of, TagHierarchy};
use crate::id::{IdentifierGenerator, NodeKey};

/// What a compile run produced and what it had to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    pub tag_nodes: usize,
    pub entry_nodes: usize,
    pub tag_links: usize,
    pub entry_links: usize,
    /// Entries whose title collapsed onto an existing Entry-node.
    pub merged_entries: usize,
    /// Nodes or links dropped because an identifier could not be derived.
    pub skipped: Vec<SkippedItem>,
}

/// One node or link that was left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkippedItem {
    TagNode { tag_path: String },
    TagLink { tag_path: String },
    EntryNode { title: String },
    EntryLink { title: String, tag_path: String },
    /// The title's id is already a Tag-node.
    TitleCollidesWithTag { title: String, tag_path: String },
}

/// Builds graph documents using a pluggable identifier scheme.
pub struct GraphCompiler<'a> {
    ids: &'a dyn IdentifierGenerator,
    user: String,
}

impl<'a> GraphCompiler<'a> {
    pub fn new(ids: &'a dyn IdentifierGenerator) -> Self {
        GraphCompiler {
            ids,
            user: DEFAULT_USER.to_string(),
        }
    }

    /// Overrides the owner recorded on every node.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Compiles to a document, discarding the summary.
    pub fn compile(&self, entries: &[Entry], hierarchy: &TagHierarchy) -> GraphDocument {
        self.build(entries, hierarchy).0.to_document()
    }

    /// Compiles to the in-memory graph together with a summary of the run.
    pub fn build(&self, entries: &[Entry], hierarchy: &TagHierarchy) -> (TagGraph, CompileSummary) {
        let mut graph = TagGraph::new();
        let mut summary = CompileSummary::default();

        let tag_nodes = self.add_tag_nodes(&mut graph, hierarchy, &mut summary);
        self.add_tag_links(&mut graph, &tag_nodes, &mut summary);
        self.add_entries(&mut graph, entries, &mut summary);

        tracing::debug!(
            digest = self.ids.name(),
            tag_nodes = summary.tag_nodes,
            entry_nodes = summary.entry_nodes,
            links = summary.tag_links + summary.entry_links,
            skipped = summary.skipped.len(),
            "compiled tag graph"
        );
        (graph, summary)
    }

    /// Returns the tag strings that produced a node, one per node.
    fn add_tag_nodes<'h>(
        &self,
        graph: &mut TagGraph,
        hierarchy: &'h TagHierarchy,
        summary: &mut CompileSummary,
    ) -> Vec<&'h str> {
        let mut inserted_tags = Vec::new();
        for tag in hierarchy.counts().keys() {
            let Some(id) = self.ids.id_for(tag) else {
                tracing::warn!(tag_path = %tag, "skipping tag node: blank identifier text");
                summary.skipped.push(SkippedItem::TagNode {
                    tag_path: tag.clone(),
                });
                continue;
            };
            let inserted = graph.add_node(GraphNode {
                id,
                user: self.user.clone(),
                title: tag.clone(),
                link: None,
                kind: NodeKind::Tag,
            });
            // Whitespace-only differences collapse onto one id.
            if inserted {
                summary.tag_nodes += 1;
                inserted_tags.push(tag.as_str());
            }
        }
        inserted_tags
    }

    fn add_tag_links(&self, graph: &mut TagGraph, tags: &[&str], summary: &mut CompileSummary) {
        for &tag in tags {
            let Some(parent) = parent_of(tag) else {
                continue;
            };
            let (Some(source), Some(target)) = (self.ids.id_for(tag), self.ids.id_for(parent)) else {
                tracing::warn!(tag_path = %tag, parent = %parent, "skipping tag link: blank identifier text");
                summary.skipped.push(SkippedItem::TagLink {
                    tag_path: tag.to_string(),
                });
                continue;
            };
            self.link(graph, &source, &target, LinkKind::TagToTag, summary);
        }
    }

    fn add_entries(&self, graph: &mut TagGraph, entries: &[Entry], summary: &mut CompileSummary) {
        for entry in entries {
            let Some(entry_id) = self.ids.id_for(&entry.title) else {
                tracing::warn!(tag_path = %entry.tag_path, "skipping entry: blank title");
                summary.skipped.push(SkippedItem::EntryNode {
                    title: entry.title.clone(),
                });
                continue;
            };

            if graph.node(&entry_id).is_some_and(|n| n.kind == NodeKind::Tag) {
                tracing::warn!(title = %entry.title, tag_path = %entry.tag_path, "skipping entry: title id is taken by a tag");
                summary.skipped.push(SkippedItem::TitleCollidesWithTag {
                    title: entry.title.clone(),
                    tag_path: entry.tag_path.clone(),
                });
                continue;
            }

            let inserted = graph.add_node(GraphNode {
                id: entry_id.clone(),
                user: self.user.clone(),
                title: entry.title.clone(),
                link: Some(entry.link.clone()).filter(|l| !l.is_empty()),
                kind: NodeKind::Entry,
            });
            if inserted {
                summary.entry_nodes += 1;
            } else {
                summary.merged_entries += 1;
            }

            let deepest = expand(&entry.tag_path).pop();
            match deepest.as_deref().and_then(|t| self.ids.id_for(t)) {
                Some(tag_id) => {
                    self.link(graph, &entry_id, &tag_id, LinkKind::EntryToTag, summary);
                }
                None => {
                    tracing::warn!(title = %entry.title, tag_path = %entry.tag_path, "skipping entry link: blank tag");
                    summary.skipped.push(SkippedItem::EntryLink {
                        title: entry.title.clone(),
                        tag_path: entry.tag_path.clone(),
                    });
                }
            }
        }
    }

    fn link(
        &self,
        graph: &mut TagGraph,
        source: &NodeKey,
        target: &NodeKey,
        kind: LinkKind,
        summary: &mut CompileSummary,
    ) {
        match graph.add_link(source, target, kind) {
            Ok(_) => match kind {
                LinkKind::TagToTag => summary.tag_links += 1,
                LinkKind::EntryToTag => summary.entry_links += 1,
            },
            // Only reachable when the entries were not the ones the
            // hierarchy was built from.
            Err(e) => tracing::warn!(error = %e, "skipping link"),
        }
    }
}
