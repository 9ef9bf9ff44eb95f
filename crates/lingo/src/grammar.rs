use crate::{
    display,
    error::Result,
    handle::NodeId,
    node::{Node, Nodes},
    parse::{ParseConfig, Parser},
    source::Source,
    visit::{self, Visitor},
};

/// A finished, immutable node graph.
///
/// Parsing never mutates the graph, so one grammar can serve any number of
/// parses at once as long as each has its own [`Source`].
#[derive(Debug)]
pub struct Grammar {
    nodes: Nodes,
}

impl Grammar {
    pub(crate) fn new(nodes: Nodes) -> Grammar {
        Grammar { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> cranelift_entity::Iter<'_, NodeId, Node> {
        self.nodes.iter()
    }

    pub fn parse<S: Source + ?Sized>(&self, root: NodeId, source: &mut S) -> Result<bool> {
        self.parse_with(root, source, &ParseConfig::default())
    }

    pub fn parse_with<S: Source + ?Sized>(
        &self,
        root: NodeId,
        source: &mut S,
        config: &ParseConfig,
    ) -> Result<bool> {
        Parser::new(&self.nodes, source, *config).parse(root)
    }

    pub fn accept(&self, root: NodeId, visitor: &mut dyn Visitor) {
        visit::walk(&self.nodes, root, visitor)
    }

    pub fn pretty(&self, root: NodeId) -> String {
        display::pretty(&self.nodes, root)
    }
}
