use cranelift_entity::{entity_impl, EntityRef};

/// Index of a node inside the arena of one grammar.
///
/// Handles are handed out sequentially as nodes are created, so the numbering
/// of a grammar is reproducible as long as it is built in the same order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

entity_impl! { NodeId, "node" }

impl NodeId {
    /// Position of the node in creation order.
    pub fn ordinal(self) -> usize {
        self.index()
    }
}

#[test]
fn test_node_id_display() {
    let id = NodeId::new(7);
    assert_eq!(id.ordinal(), 7);
    assert_eq!(id.to_string(), "node7");
    assert_eq!(format!("{id:?}"), "node7");
}
