use std::fmt::Display;

use cranelift_entity::PrimaryMap;

use crate::handle::NodeId;

/// Arena holding every node of one grammar.
pub type Nodes = PrimaryMap<NodeId, Node>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// A single character within `from..=to`.
    Literal { from: char, to: char },
    Sequence(Vec<NodeId>),
    Choice(Vec<NodeId>),
    /// Zero-width negative lookahead.
    Negation(NodeId),
    /// `max == 0` means unbounded.
    Repetition { child: NodeId, min: u32, max: u32 },
    /// Forward reference, bound exactly once.
    Placeholder(Option<NodeId>),
}

impl NodeKind {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, NodeKind::Placeholder(_))
    }
    /// Outgoing edges in matching order.
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Literal { .. } | NodeKind::Placeholder(None) => &[],
            NodeKind::Sequence(children) | NodeKind::Choice(children) => children,
            NodeKind::Negation(child)
            | NodeKind::Repetition { child, .. }
            | NodeKind::Placeholder(Some(child)) => std::slice::from_ref(child),
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Literal { .. } => "literal",
            NodeKind::Sequence(_) => "next",
            NodeKind::Choice(_) => "or",
            NodeKind::Negation(_) => "not",
            NodeKind::Repetition { .. } => "repeat",
            NodeKind::Placeholder(_) => "placeholder",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            NodeKind::Literal { from, to } => write!(f, "literal ({from},{to})"),
            NodeKind::Repetition { min, max, .. } => write!(f, "repeat ({min},{max})"),
            ref other => f.write_str(other.label()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Node {
        Node { kind, name: None }
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Returns the first placeholder that was never bound, in creation order.
pub(crate) fn find_unbound(nodes: &Nodes) -> Option<NodeId> {
    nodes
        .iter()
        .find(|(_, node)| node.kind == NodeKind::Placeholder(None))
        .map(|(id, _)| id)
}

#[test]
fn test_kind_display() {
    let literal = NodeKind::Literal { from: 'a', to: 'z' };
    assert_eq!(literal.to_string(), "literal (a,z)");
    assert!(literal.children().is_empty());

    let mut nodes = Nodes::new();
    let a = nodes.push(Node::new(literal));
    let repeat = NodeKind::Repetition {
        child: a,
        min: 1,
        max: 0,
    };
    assert_eq!(repeat.to_string(), "repeat (1,0)");
    assert_eq!(repeat.children(), &[a]);

    assert_eq!(find_unbound(&nodes), None);
    let p = nodes.push(Node::new(NodeKind::Placeholder(None)));
    assert_eq!(find_unbound(&nodes), Some(p));
}
