use crate::{
    error::{Error, Result},
    handle::NodeId,
    node::{NodeKind, Nodes},
    source::Source,
};

/// Tunables of a single parse call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParseConfig {
    /// Maximum nesting of rules before the parse is aborted with [`Error::DepthExceeded`].
    pub max_depth: u32,
}

impl ParseConfig {
    pub const DEFAULT_MAX_DEPTH: u32 = 1024;

    pub fn with_max_depth(mut self, max_depth: u32) -> ParseConfig {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive backtracking matcher over a node arena.
///
/// Every combinator leaves the source exactly where its contract says:
/// sequences and choices are atomic, negations are zero-width and
/// repetitions roll back the attempt that failed.
pub struct Parser<'a, S: Source + ?Sized> {
    nodes: &'a Nodes,
    source: &'a mut S,
    config: ParseConfig,
    depth: u32,
}

impl<'a, S: Source + ?Sized> Parser<'a, S> {
    pub fn new(nodes: &'a Nodes, source: &'a mut S, config: ParseConfig) -> Parser<'a, S> {
        Parser {
            nodes,
            source,
            config,
            depth: 0,
        }
    }

    pub fn parse(&mut self, id: NodeId) -> Result<bool> {
        if self.depth >= self.config.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        self.depth += 1;
        let result = self.parse_node(id);
        self.depth -= 1;

        result
    }

    fn parse_node(&mut self, id: NodeId) -> Result<bool> {
        let nodes = self.nodes;
        let node = nodes.get(id).ok_or(Error::UnknownNode(id))?;

        log::trace!(
            "{id} {} at {}:{}:{}",
            node.kind,
            self.source.name(),
            self.source.row(),
            self.source.col()
        );

        match node.kind {
            NodeKind::Literal { from, to } => Ok(self.literal(from, to)),
            NodeKind::Sequence(ref children) => self.sequence(children),
            NodeKind::Choice(ref children) => self.choice(children),
            NodeKind::Negation(child) => self.negation(child),
            NodeKind::Repetition { child, min, max } => self.repetition(child, min, max),
            NodeKind::Placeholder(Some(target)) => self.parse(target),
            NodeKind::Placeholder(None) => Err(Error::UnboundPlaceholder(id)),
        }
    }

    fn literal(&mut self, from: char, to: char) -> bool {
        // a mismatched character stays consumed, the enclosing combinator rolls it back
        match self.source.consume() {
            Some(c) => (from..=to).contains(&c),
            None => false,
        }
    }

    fn sequence(&mut self, children: &[NodeId]) -> Result<bool> {
        let start = self.source.mark();
        for &child in children {
            if !self.parse(child)? {
                self.source.reset(start);
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn choice(&mut self, children: &[NodeId]) -> Result<bool> {
        let start = self.source.mark();
        for &child in children {
            if self.parse(child)? {
                return Ok(true);
            }
            self.source.reset(start);
        }
        Ok(false)
    }

    fn negation(&mut self, child: NodeId) -> Result<bool> {
        let start = self.source.mark();
        let matched = self.parse(child)?;
        self.source.reset(start);
        Ok(!matched)
    }

    fn repetition(&mut self, child: NodeId, min: u32, max: u32) -> Result<bool> {
        let start = self.source.mark();
        let mut count = 0;

        while max == 0 || count < max {
            let attempt = self.source.mark();
            if !self.parse(child)? {
                self.source.reset(attempt);
                break;
            }
            count += 1;

            if self.source.mark() == attempt {
                // further attempts would match the same empty prefix forever,
                // so any count up to the bound is reachable
                log::debug!("{child} matched empty input, stopping repetition after {count}");
                count = count.max(min);
                break;
            }
        }

        let matched = count >= min && (max == 0 || count <= max);
        if !matched {
            self.source.reset(start);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        node::Node,
        source::{Source, StrSource},
    };

    fn literal(nodes: &mut Nodes, c: char) -> NodeId {
        nodes.push(Node::new(NodeKind::Literal { from: c, to: c }))
    }

    fn run(nodes: &Nodes, root: NodeId, input: &str) -> (Result<bool>, usize) {
        let mut src = StrSource::new(input);
        let result = Parser::new(nodes, &mut src, ParseConfig::default()).parse(root);
        (result, src.offset())
    }

    #[test]
    fn literal_consumes_even_on_mismatch() {
        let mut nodes = Nodes::new();
        let a = literal(&mut nodes, 'a');
        assert_eq!(run(&nodes, a, "a"), (Ok(true), 1));
        assert_eq!(run(&nodes, a, "b"), (Ok(false), 1));
        assert_eq!(run(&nodes, a, ""), (Ok(false), 0));
    }

    #[test]
    fn sequence_is_atomic() {
        let mut nodes = Nodes::new();
        let a = literal(&mut nodes, 'a');
        let b = literal(&mut nodes, 'b');
        let ab = nodes.push(Node::new(NodeKind::Sequence(vec![a, b])));
        assert_eq!(run(&nodes, ab, "abc"), (Ok(true), 2));
        assert_eq!(run(&nodes, ab, "ac"), (Ok(false), 0));
        assert_eq!(run(&nodes, ab, "a"), (Ok(false), 0));
    }

    #[test]
    fn choice_resets_between_alternatives() {
        let mut nodes = Nodes::new();
        let a = literal(&mut nodes, 'a');
        let b = literal(&mut nodes, 'b');
        let c = literal(&mut nodes, 'c');
        let ab = nodes.push(Node::new(NodeKind::Sequence(vec![a, b])));
        let ac = nodes.push(Node::new(NodeKind::Sequence(vec![a, c])));
        let choice = nodes.push(Node::new(NodeKind::Choice(vec![ab, ac])));
        assert_eq!(run(&nodes, choice, "ac"), (Ok(true), 2));
        assert_eq!(run(&nodes, choice, "ad"), (Ok(false), 0));
    }

    #[test]
    fn negation_is_zero_width() {
        let mut nodes = Nodes::new();
        let a = literal(&mut nodes, 'a');
        let not_a = nodes.push(Node::new(NodeKind::Negation(a)));
        assert_eq!(run(&nodes, not_a, "a"), (Ok(false), 0));
        assert_eq!(run(&nodes, not_a, "b"), (Ok(true), 0));
        assert_eq!(run(&nodes, not_a, ""), (Ok(true), 0));
    }

    #[test]
    fn repetition_stops_at_bound() {
        let mut nodes = Nodes::new();
        let a = literal(&mut nodes, 'a');
        let rep = nodes.push(Node::new(NodeKind::Repetition {
            child: a,
            min: 2,
            max: 3,
        }));
        assert_eq!(run(&nodes, rep, "aaaaa"), (Ok(true), 3));
        assert_eq!(run(&nodes, rep, "aab"), (Ok(true), 2));
        assert_eq!(run(&nodes, rep, "ab"), (Ok(false), 0));
    }

    #[test]
    fn repetition_of_empty_match_terminates() {
        let mut nodes = Nodes::new();
        let empty = nodes.push(Node::new(NodeKind::Sequence(vec![])));
        let rep = nodes.push(Node::new(NodeKind::Repetition {
            child: empty,
            min: 3,
            max: 0,
        }));
        assert_eq!(run(&nodes, rep, "xyz"), (Ok(true), 0));
    }

    #[test]
    fn unbound_placeholder_is_an_error() {
        let mut nodes = Nodes::new();
        let p = nodes.push(Node::new(NodeKind::Placeholder(None)));
        assert_eq!(run(&nodes, p, "a").0, Err(Error::UnboundPlaceholder(p)));
    }

    #[test]
    fn depth_limit() {
        let mut nodes = Nodes::new();
        let p = nodes.push(Node::new(NodeKind::Placeholder(None)));
        nodes[p].kind = NodeKind::Placeholder(Some(p));

        let mut src = StrSource::new("a");
        let config = ParseConfig::default().with_max_depth(16);
        let result = Parser::new(&nodes, &mut src, config).parse(p);
        assert_eq!(result, Err(Error::DepthExceeded { limit: 16 }));
        assert_eq!(src.mark(), crate::source::SourcePosition::start());
    }
}
