//! Grammar combinators with a backtracking recursive-descent matcher.
//!
//! Rules are assembled from character literals with `|` (ordered choice),
//! `+` (sequence), `!` (negative lookahead) and bounded repetition. Every
//! combinator allocates a node in the arena of a [`GrammarBuilder`] and shares
//! the nodes of its operands, recursive rules are wired through placeholders.
//!
//! ```
//! use lingo::{GrammarBuilder, StrSource};
//!
//! let g = GrammarBuilder::new();
//! let digit = g.range('0', '9')?;
//! let number = digit.one_or_more();
//! let list = number + (g.literal(',') + number).zero_or_more();
//!
//! let mut src = StrSource::new("12,3,045");
//! assert!(list.parse(&mut src)?);
//! assert_eq!(src.offset(), 8);
//! # Ok::<(), lingo::Error>(())
//! ```
//!
//! Parsing is plain recursion over the graph. Nesting is bounded by
//! [`ParseConfig::max_depth`], which also turns non-consuming left recursion
//! into [`Error::DepthExceeded`] rather than a stack overflow.

pub mod display;
pub mod error;
pub mod grammar;
pub mod handle;
pub mod node;
pub mod parse;
pub mod rule;
pub mod source;
pub mod visit;

pub use display::PrettyPrinter;
pub use error::{Error, Result};
pub use grammar::Grammar;
pub use handle::NodeId;
pub use node::{Node, NodeKind};
pub use parse::ParseConfig;
pub use rule::{GrammarBuilder, Rule};
pub use source::{BytesSource, Source, SourcePosition, StrSource};
pub use visit::{Visit, Visitor};
