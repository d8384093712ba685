use crate::editing::{Format, UpdateAttrs, UpdateHints};

/// Commands that can be applied to a paragraph.
///
/// Component insertion and deletion act on a section, so they have no
/// command here; [`Section::apply`](crate::editing::Section::apply) handles
/// them itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertChars {
        index: usize,
        text: String,
        /// Replaces the formats after the insert instead of shifting them
        formats: Option<Vec<Format>>,
    },
    RemoveChars { index: usize, count: usize },
    Format { format: Format },
    Update { attrs: UpdateAttrs, hints: UpdateHints },
}
