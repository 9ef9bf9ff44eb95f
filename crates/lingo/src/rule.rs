use std::{
    cell::RefCell,
    fmt::Debug,
    ops::{Add, BitOr, Not},
};

use crate::{
    display,
    error::{Error, Result},
    grammar::Grammar,
    handle::NodeId,
    node::{self, Node, NodeKind, Nodes},
    parse::{ParseConfig, Parser},
    source::Source,
    visit::{self, Visitor},
};

/// One grammar-building session.
///
/// Owns the node arena, rules created through it are cheap handles that share
/// nodes instead of copying them. Call [`GrammarBuilder::finish`] to obtain an
/// immutable [`Grammar`] that can be shared between threads.
#[derive(Default)]
pub struct GrammarBuilder {
    nodes: RefCell<Nodes>,
}

impl GrammarBuilder {
    pub fn new() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    fn push(&self, kind: NodeKind) -> Rule<'_> {
        let id = self.nodes.borrow_mut().push(Node::new(kind));
        Rule { builder: self, id }
    }

    pub fn literal(&self, c: char) -> Rule<'_> {
        self.push(NodeKind::Literal { from: c, to: c })
    }

    pub fn range(&self, from: char, to: char) -> Result<Rule<'_>> {
        if from > to {
            return Err(Error::InvertedRange { from, to });
        }
        Ok(self.push(NodeKind::Literal { from, to }))
    }

    /// Any one of `chars`, tried in the given order.
    pub fn choice_of(&self, chars: impl IntoIterator<Item = char>) -> Rule<'_> {
        let children = chars.into_iter().map(|c| self.literal(c).id).collect();
        self.push(NodeKind::Choice(children))
    }

    /// The characters of `text` in order.
    pub fn sequence(&self, text: &str) -> Rule<'_> {
        let children = text.chars().map(|c| self.literal(c).id).collect();
        self.push(NodeKind::Sequence(children))
    }

    /// An unbound forward reference, see [`Rule::bind`].
    pub fn placeholder(&self) -> Rule<'_> {
        self.push(NodeKind::Placeholder(None))
    }

    pub fn repeat<'g>(&'g self, rule: Rule<'g>, min: u32, max: u32) -> Result<Rule<'g>> {
        assert!(
            std::ptr::eq(self, rule.builder),
            "Rule belongs to a different grammar builder"
        );
        rule.repeat(min, max)
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Freezes the graph, every placeholder must have been bound by now.
    pub fn finish(self) -> Result<Grammar> {
        let nodes = self.nodes.into_inner();
        if let Some(id) = node::find_unbound(&nodes) {
            return Err(Error::UnboundPlaceholder(id));
        }

        log::debug!("Finished grammar with {} nodes", nodes.len());
        Ok(Grammar::new(nodes))
    }
}

/// Handle to the root node of a rule.
///
/// Combinators never modify their operands, they allocate a new node that
/// refers to the operand nodes and return a new handle to it.
#[derive(Clone, Copy)]
pub struct Rule<'g> {
    builder: &'g GrammarBuilder,
    id: NodeId,
}

impl<'g> Rule<'g> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> NodeKind {
        self.builder.nodes.borrow()[self.id].kind.clone()
    }

    pub fn name(self) -> Option<String> {
        self.builder.nodes.borrow()[self.id].name.clone()
    }

    /// Attaches a display name to the node, the graph itself is unchanged.
    pub fn named(self, name: impl Into<String>) -> Rule<'g> {
        self.builder.nodes.borrow_mut()[self.id].name = Some(name.into());
        self
    }

    #[track_caller]
    fn same_builder(self, other: Rule<'g>) {
        assert!(
            std::ptr::eq(self.builder, other.builder),
            "Rules from different grammar builders cannot be combined"
        );
    }

    fn unary(self, kind: NodeKind) -> Rule<'g> {
        self.builder.push(kind)
    }

    /// Builds `wrap([self, other])`, reusing the children of `self` instead
    /// when it already is the same kind of node, so that chains stay flat.
    fn chain(self, other: Rule<'g>, wrap: fn(Vec<NodeId>) -> NodeKind) -> Rule<'g> {
        self.same_builder(other);

        let mut nodes = self.builder.nodes.borrow_mut();
        let left = &nodes[self.id].kind;

        let flatten = std::mem::discriminant(left) == std::mem::discriminant(&wrap(vec![]));

        let mut children = match flatten {
            true => left.children().to_vec(),
            false => vec![self.id],
        };
        children.push(other.id);

        let id = nodes.push(Node::new(wrap(children)));
        Rule {
            builder: self.builder,
            id,
        }
    }

    /// Ordered choice, `self` is tried first.
    pub fn or(self, other: Rule<'g>) -> Rule<'g> {
        self.chain(other, NodeKind::Choice)
    }

    pub fn then(self, other: Rule<'g>) -> Rule<'g> {
        self.chain(other, NodeKind::Sequence)
    }

    pub fn not(self) -> Rule<'g> {
        self.unary(NodeKind::Negation(self.id))
    }

    /// Matches `self` between `min` and `max` times, greedily. A `max` of 0 means unbounded.
    pub fn repeat(self, min: u32, max: u32) -> Result<Rule<'g>> {
        if max != 0 && max < min {
            return Err(Error::InvertedBounds { min, max });
        }
        Ok(self.unary(NodeKind::Repetition {
            child: self.id,
            min,
            max,
        }))
    }

    pub fn one_or_more(self) -> Rule<'g> {
        self.unary(NodeKind::Repetition {
            child: self.id,
            min: 1,
            max: 0,
        })
    }

    pub fn zero_or_more(self) -> Rule<'g> {
        self.unary(NodeKind::Repetition {
            child: self.id,
            min: 0,
            max: 0,
        })
    }

    pub fn optional(self) -> Rule<'g> {
        self.unary(NodeKind::Repetition {
            child: self.id,
            min: 0,
            max: 1,
        })
    }

    /// Points the placeholder `self` at `target`. This is the only way to make a rule refer to itself.
    pub fn bind(self, target: Rule<'g>) -> Result<()> {
        self.same_builder(target);

        let mut nodes = self.builder.nodes.borrow_mut();
        match &mut nodes[self.id].kind {
            NodeKind::Placeholder(slot @ None) => *slot = Some(target.id),
            NodeKind::Placeholder(Some(_)) => return Err(Error::AlreadyBound(self.id)),
            _ => return Err(Error::NotAPlaceholder(self.id)),
        }

        log::debug!("Bound placeholder {} to {}", self.id, target.id);
        Ok(())
    }

    /// Tries to match a prefix of `source`, advancing it past the prefix on success.
    pub fn parse<S: Source + ?Sized>(self, source: &mut S) -> Result<bool> {
        self.parse_with(source, &ParseConfig::default())
    }

    pub fn parse_with<S: Source + ?Sized>(
        self,
        source: &mut S,
        config: &ParseConfig,
    ) -> Result<bool> {
        let nodes = self.builder.nodes.borrow();
        Parser::new(&nodes, source, *config).parse(self.id)
    }

    pub fn accept(self, visitor: &mut dyn Visitor) {
        let nodes = self.builder.nodes.borrow();
        visit::walk(&nodes, self.id, visitor);
    }

    pub fn pretty(self) -> String {
        let nodes = self.builder.nodes.borrow();
        display::pretty(&nodes, self.id)
    }
}

impl Debug for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.id).finish()
    }
}

impl<'g> BitOr for Rule<'g> {
    type Output = Rule<'g>;
    fn bitor(self, rhs: Rule<'g>) -> Rule<'g> {
        self.or(rhs)
    }
}

impl<'g> Add for Rule<'g> {
    type Output = Rule<'g>;
    fn add(self, rhs: Rule<'g>) -> Rule<'g> {
        self.then(rhs)
    }
}

impl<'g> Not for Rule<'g> {
    type Output = Rule<'g>;
    fn not(self) -> Rule<'g> {
        Rule::not(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    #[test]
    fn choices_flatten_on_the_left() {
        let g = GrammarBuilder::new();
        let (a, b, c, d) = (g.literal('a'), g.literal('b'), g.literal('c'), g.literal('d'));

        let chain = a | b | c | d;
        assert_eq!(chain.kind(), NodeKind::Choice(vec![a.id, b.id, c.id, d.id]));

        // only the left operand is flattened
        let right = a | (b | c);
        let NodeKind::Choice(children) = right.kind() else {
            panic!("Expected a choice");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], a.id);
    }

    #[test]
    fn sequences_flatten_but_do_not_mix_with_choices() {
        let g = GrammarBuilder::new();
        let (a, b, c) = (g.literal('a'), g.literal('b'), g.literal('c'));

        let seq = a + b + c;
        assert_eq!(seq.kind(), NodeKind::Sequence(vec![a.id, b.id, c.id]));

        let choice = a | b;
        let mixed = choice + c;
        assert_eq!(mixed.kind(), NodeKind::Sequence(vec![choice.id, c.id]));
    }

    #[test]
    fn operands_are_shared_not_copied() {
        let g = GrammarBuilder::new();
        let digit = g.range('0', '9').unwrap();
        let before = g.len();

        let pair = digit + digit;
        assert_eq!(g.len(), before + 1);
        assert_eq!(pair.kind(), NodeKind::Sequence(vec![digit.id, digit.id]));
        assert_eq!(digit.kind(), NodeKind::Literal { from: '0', to: '9' });
    }

    #[test]
    fn flattening_leaves_the_left_operand_untouched() {
        let g = GrammarBuilder::new();
        let (a, b, c) = (g.literal('a'), g.literal('b'), g.literal('c'));
        let ab = a | b;
        let _abc = ab | c;
        assert_eq!(ab.kind(), NodeKind::Choice(vec![a.id, b.id]));
    }

    #[test]
    fn convenience_constructors() {
        let g = GrammarBuilder::new();
        let ws = g.choice_of([' ', '\t']);
        assert!(matches!(ws.kind(), NodeKind::Choice(ref c) if c.len() == 2));

        let keyword = g.sequence("input");
        assert!(matches!(keyword.kind(), NodeKind::Sequence(ref c) if c.len() == 5));

        assert_eq!(
            g.range('z', 'a').unwrap_err(),
            Error::InvertedRange { from: 'z', to: 'a' }
        );
    }

    #[test]
    fn repetition_bounds_are_checked() {
        let g = GrammarBuilder::new();
        let a = g.literal('a');
        assert_eq!(
            a.repeat(3, 2).unwrap_err(),
            Error::InvertedBounds { min: 3, max: 2 }
        );
        assert!(a.repeat(3, 0).is_ok());
        assert!(g.repeat(a, 2, 2).is_ok());
        assert_eq!(
            a.optional().kind(),
            NodeKind::Repetition {
                child: a.id,
                min: 0,
                max: 1
            }
        );
    }

    #[test]
    fn placeholders_bind_once() {
        let g = GrammarBuilder::new();
        let p = g.placeholder();
        let a = g.literal('a');

        assert_eq!(a.bind(p), Err(Error::NotAPlaceholder(a.id)));
        assert_eq!(p.bind(a), Ok(()));
        assert_eq!(p.bind(a), Err(Error::AlreadyBound(p.id)));
        assert_eq!(p.kind(), NodeKind::Placeholder(Some(a.id)));
    }

    #[test]
    fn finish_rejects_unbound_placeholders() {
        let g = GrammarBuilder::new();
        let p = g.placeholder();
        let id = p.id();
        assert_eq!(g.finish().unwrap_err(), Error::UnboundPlaceholder(id));
    }

    #[test]
    fn parse_through_unbound_placeholder_fails_loudly() {
        let g = GrammarBuilder::new();
        let p = g.placeholder();
        let rule = g.literal('(') + p;
        let mut src = StrSource::new("(x");
        assert_eq!(rule.parse(&mut src), Err(Error::UnboundPlaceholder(p.id)));
    }

    #[test]
    #[should_panic]
    fn mixing_builders_panics() {
        let g1 = GrammarBuilder::new();
        let g2 = GrammarBuilder::new();
        let _ = g1.literal('a') | g2.literal('b');
    }

    #[test]
    fn pretty_print() {
        let g = GrammarBuilder::new();
        let letter = (g.range('a', 'z').unwrap() | g.range('A', 'Z').unwrap()).named("letter");
        let p = g.placeholder();
        let ident = letter + letter.zero_or_more() + !p;

        let expected = "\
next
 or <letter>
  literal (a,z)
  literal (A,Z)
 repeat (0,0)
  or <letter> (see node2)
 not
  placeholder
   (empty)
";
        assert_eq!(ident.pretty(), expected);
    }
}
