use crate::models::ComponentId;

/// Errors reported by paragraph, format and section operations.
///
/// Every variant is recoverable: the operation that produced it left the
/// paragraph (or section) exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Index {index} (+{count}) is out of range for text of length {len}")]
    OutOfRange {
        index: usize,
        count: usize,
        len: usize,
    },
    #[error("Invalid format range {from}..{to}")]
    InvalidFormatRange { from: usize, to: usize },
    #[error("Format `{tag}` over {from}..{to} overlaps formats of another type")]
    AmbiguousOverlap { tag: String, from: usize, to: usize },
    #[error("Index {index} splits a surrogate pair")]
    SplitsCharacter { index: usize },
    #[error("Component {0} is not attached to a section")]
    Detached(ComponentId),
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),
    #[error("Component already exists: {0}")]
    DuplicateComponent(ComponentId),
    #[error("Index {index} is outside section of length {len}")]
    IndexOutOfSection { index: usize, len: usize },
}

impl EditError {
    pub(crate) fn out_of_range(index: usize, count: usize, len: usize) -> Self {
        EditError::OutOfRange { index, count, len }
    }
}
