use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::editing::EditError;

/// Extra key/value data carried by a format (e.g. `href` on a link)
pub type Attrs = BTreeMap<String, String>;

/// An inline format over the half-open range `[from, to)` of paragraph text.
///
/// Offsets are UTF-16 code units, the same index space as
/// [`TextBuffer`](crate::editing::TextBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Format {
    /// Format type, e.g. `"b"`, `"i"`, `"a"`
    #[serde(rename = "type")]
    pub tag: String,
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Format {
    pub fn new(tag: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            tag: tag.into(),
            from,
            to,
            attrs: None,
        }
    }

    /// Attach (or extend) the attribute map
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Length in UTF-16 code units. Saturates for inverted ranges.
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rejects zero-width and inverted ranges
    pub fn validate(&self) -> Result<(), EditError> {
        if self.from >= self.to {
            return Err(EditError::InvalidFormatRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    /// True when `[from, to)` and `[self.from, self.to)` share at least one
    /// code unit. Touching ranges do not intersect.
    pub fn intersects(&self, from: usize, to: usize) -> bool {
        self.from < to && from < self.to
    }

    /// True when the two ranges overlap or share a boundary
    pub fn touches_or_overlaps(&self, other: &Format) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    pub fn same_range(&self, other: &Format) -> bool {
        self.from == other.from && self.to == other.to
    }

    pub fn contains(&self, index: usize) -> bool {
        self.from <= index && index < self.to
    }

    /// Index ordering: `from`, then `tag`, then `to`
    pub(crate) fn index_order(&self, other: &Format) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.tag.cmp(&other.tag))
            .then_with(|| self.to.cmp(&other.to))
    }

    pub(crate) fn range_copy(&self, from: usize, to: usize) -> Format {
        Format {
            tag: self.tag.clone(),
            from,
            to,
            attrs: self.attrs.clone(),
        }
    }
}
