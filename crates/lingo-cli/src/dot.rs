use std::fmt::Write;

use lingo::{NodeId, NodeKind, Visit, Visitor};

/// Graphviz export of a node graph.
///
/// Every node is declared once, on the first edge that reaches it, and every
/// edge walked gets its own line so shared and recursive rules stay visible.
pub struct DotWriter<W: Write> {
    buf: W,
    result: std::fmt::Result,
}

impl<W: Write> DotWriter<W> {
    pub fn begin(mut buf: W, graph: &str) -> DotWriter<W> {
        let result = writeln!(buf, "digraph {graph:?} {{");
        DotWriter { buf, result }
    }

    pub fn finish(mut self) -> Result<W, std::fmt::Error> {
        self.result?;
        writeln!(self.buf, "}}")?;
        Ok(self.buf)
    }

    fn node(&mut self, visit: &Visit, kind: &dyn std::fmt::Display) {
        if self.result.is_ok() {
            self.result = self.write_node(visit, kind);
        }
    }

    fn write_node(&mut self, visit: &Visit, kind: &dyn std::fmt::Display) -> std::fmt::Result {
        let id = visit.id.ordinal();
        if visit.first {
            let label = match visit.name {
                Some(name) => format!("{kind}\n<{name}>"),
                None => kind.to_string(),
            };
            writeln!(self.buf, "    n{id} [label={label:?}]")?;
        }
        if let Some(parent) = visit.parent {
            writeln!(self.buf, "    n{} -> n{id}", parent.ordinal())?;
        }
        Ok(())
    }
}

impl<W: Write> Visitor for DotWriter<W> {
    fn literal(&mut self, visit: &Visit, from: char, to: char) {
        self.node(visit, &NodeKind::Literal { from, to });
    }
    fn sequence(&mut self, visit: &Visit, _: &[NodeId]) {
        self.node(visit, &"next");
    }
    fn choice(&mut self, visit: &Visit, _: &[NodeId]) {
        self.node(visit, &"or");
    }
    fn negation(&mut self, visit: &Visit, _: NodeId) {
        self.node(visit, &"not");
    }
    fn repetition(&mut self, visit: &Visit, _: NodeId, min: u32, max: u32) {
        self.node(visit, &format_args!("repeat ({min},{max})"));
    }
    fn placeholder(&mut self, visit: &Visit, target: Option<NodeId>) {
        match target {
            Some(_) => self.node(visit, &"placeholder"),
            None => self.node(visit, &"placeholder (empty)"),
        }
    }
}
