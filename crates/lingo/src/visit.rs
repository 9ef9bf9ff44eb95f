use cranelift_entity::EntitySet;

use crate::{
    handle::NodeId,
    node::{NodeKind, Nodes},
};

/// Where in the walk a node was reached.
#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    pub id: NodeId,
    pub name: Option<&'a str>,
    /// The node whose edge led here, `None` for the root.
    pub parent: Option<NodeId>,
    pub depth: u32,
    /// False when the node was already reached through another edge, its
    /// children are not walked again.
    pub first: bool,
}

/// Read-only callbacks over the node graph, one per node kind.
#[allow(unused_variables)]
pub trait Visitor {
    fn literal(&mut self, visit: &Visit, from: char, to: char) {}
    fn sequence(&mut self, visit: &Visit, children: &[NodeId]) {}
    fn choice(&mut self, visit: &Visit, children: &[NodeId]) {}
    fn negation(&mut self, visit: &Visit, child: NodeId) {}
    fn repetition(&mut self, visit: &Visit, child: NodeId, min: u32, max: u32) {}
    fn placeholder(&mut self, visit: &Visit, target: Option<NodeId>) {}
}

/// Depth-first walk from `root` that descends into every node at most once.
///
/// Callbacks still fire for each edge that reaches an already visited node, so
/// renderers can draw shared sub-rules and the back edges of recursive rules.
pub fn walk(nodes: &Nodes, root: NodeId, visitor: &mut dyn Visitor) {
    let mut visited = EntitySet::with_capacity(nodes.len());
    walk_impl(nodes, root, None, 0, &mut visited, visitor);
}

fn walk_impl(
    nodes: &Nodes,
    id: NodeId,
    parent: Option<NodeId>,
    depth: u32,
    visited: &mut EntitySet<NodeId>,
    visitor: &mut dyn Visitor,
) {
    let Some(node) = nodes.get(id) else {
        return;
    };

    let first = !visited.contains(id);
    if first {
        visited.insert(id);
    }

    let visit = Visit {
        id,
        name: node.name(),
        parent,
        depth,
        first,
    };

    match node.kind {
        NodeKind::Literal { from, to } => visitor.literal(&visit, from, to),
        NodeKind::Sequence(ref children) => visitor.sequence(&visit, children),
        NodeKind::Choice(ref children) => visitor.choice(&visit, children),
        NodeKind::Negation(child) => visitor.negation(&visit, child),
        NodeKind::Repetition { child, min, max } => visitor.repetition(&visit, child, min, max),
        NodeKind::Placeholder(target) => visitor.placeholder(&visit, target),
    }

    if first {
        for &child in node.kind.children() {
            walk_impl(nodes, child, Some(id), depth + 1, visited, visitor);
        }
    }
}
