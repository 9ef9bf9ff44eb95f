use std::fmt::Write;

use crate::{
    handle::NodeId,
    node::{NodeKind, Nodes},
    visit::{walk, Visit, Visitor},
};

/// Renders a node graph as an indented outline, one node per line.
///
/// Nodes reached a second time are printed as a reference to their first
/// occurrence instead of being expanded again.
pub struct PrettyPrinter<W: Write> {
    buf: W,
    result: std::fmt::Result,
}

impl<W: Write> PrettyPrinter<W> {
    pub fn new(buf: W) -> PrettyPrinter<W> {
        PrettyPrinter {
            buf,
            result: Ok(()),
        }
    }

    pub fn finish(self) -> Result<W, std::fmt::Error> {
        self.result.map(|_| self.buf)
    }

    fn line(&mut self, visit: &Visit, kind: &dyn std::fmt::Display) {
        if self.result.is_ok() {
            self.result = self.write_line(visit, kind);
        }
    }

    fn write_line(&mut self, visit: &Visit, kind: &dyn std::fmt::Display) -> std::fmt::Result {
        indent(&mut self.buf, visit.depth)?;
        write!(self.buf, "{kind}")?;
        if let Some(name) = visit.name {
            write!(self.buf, " <{name}>")?;
        }
        if !visit.first {
            write!(self.buf, " (see {})", visit.id)?;
        }
        writeln!(self.buf)
    }
}

fn indent(buf: &mut dyn Write, depth: u32) -> std::fmt::Result {
    for _ in 0..depth {
        buf.write_char(' ')?;
    }
    Ok(())
}

impl<W: Write> Visitor for PrettyPrinter<W> {
    fn literal(&mut self, visit: &Visit, from: char, to: char) {
        self.line(visit, &NodeKind::Literal { from, to });
    }
    fn sequence(&mut self, visit: &Visit, _: &[NodeId]) {
        self.line(visit, &"next");
    }
    fn choice(&mut self, visit: &Visit, _: &[NodeId]) {
        self.line(visit, &"or");
    }
    fn negation(&mut self, visit: &Visit, _: NodeId) {
        self.line(visit, &"not");
    }
    fn repetition(&mut self, visit: &Visit, _: NodeId, min: u32, max: u32) {
        self.line(visit, &format_args!("repeat ({min},{max})"));
    }
    fn placeholder(&mut self, visit: &Visit, target: Option<NodeId>) {
        self.line(visit, &"placeholder");
        if target.is_none() && visit.first && self.result.is_ok() {
            self.result = indent(&mut self.buf, visit.depth + 1)
                .and_then(|_| writeln!(self.buf, "(empty)"));
        }
    }
}

/// Renders the graph reachable from `root` with a [`PrettyPrinter`].
pub fn pretty(nodes: &Nodes, root: NodeId) -> String {
    let mut printer = PrettyPrinter::new(String::new());
    walk(nodes, root, &mut printer);
    // writing into a String cannot fail
    printer.finish().unwrap_or_default()
}
