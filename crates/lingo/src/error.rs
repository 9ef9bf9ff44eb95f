use crate::handle::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

/// Misuse of the grammar algebra, surfaced at construction or at parse time.
///
/// A failing match is not an error, parsing reports it as `Ok(false)`.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    #[error("repetition upper bound {max} is below lower bound {min}")]
    InvertedBounds { min: u32, max: u32 },
    #[error("character range {from:?}..={to:?} is empty")]
    InvertedRange { from: char, to: char },
    #[error("{0} is not a placeholder")]
    NotAPlaceholder(NodeId),
    #[error("placeholder {0} is already bound")]
    AlreadyBound(NodeId),
    #[error("placeholder {0} was never bound")]
    UnboundPlaceholder(NodeId),
    #[error("rule nesting exceeded the depth limit of {limit}")]
    DepthExceeded { limit: u32 },
    #[error("{0} does not belong to this grammar")]
    UnknownNode(NodeId),
}
