use std::fmt;
use xi_rope::Rope;
use xi_rope::delta::Builder;
use xi_rope::rope::{BaseMetric, Utf16CodeUnitsMetric};

use crate::editing::EditError;

/// Paragraph text stored in an xi-rope buffer.
///
/// Every public index is a UTF-16 code unit offset. Offsets are translated to
/// the rope's byte offsets at this boundary, and out-of-range or
/// surrogate-splitting indexes are rejected before anything is edited.
#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
}

/// Length of `s` in UTF-16 code units
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from("")
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.rope.measure::<Utf16CodeUnitsMetric>()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert `chars` so they occupy `[index, index + utf16_len(chars))`
    pub fn insert_at(&mut self, index: usize, chars: &str) -> Result<String, EditError> {
        let at = self.byte_offset(index, 0)?;

        let mut builder = Builder::new(self.rope.len());
        builder.replace(at..at, Rope::from(chars));
        self.rope = builder.build().apply(&self.rope);

        Ok(self.text())
    }

    /// Remove `count` code units starting at `index`
    pub fn remove_at(&mut self, index: usize, count: usize) -> Result<String, EditError> {
        let (start, end) = self.byte_range(index, count)?;

        let mut builder = Builder::new(self.rope.len());
        builder.delete(start..end);
        self.rope = builder.build().apply(&self.rope);

        Ok(self.text())
    }

    /// Copy out the text in `[from, to)`
    pub fn slice(&self, from: usize, to: usize) -> Result<String, EditError> {
        if to < from {
            return Err(EditError::out_of_range(from, 0, self.len()));
        }
        let (start, end) = self.byte_range(from, to - from)?;
        Ok(self.rope.slice_to_cow(start..end).into_owned())
    }

    /// Check that `[index, index + count)` lies inside the buffer
    pub fn check_range(&self, index: usize, count: usize) -> Result<(), EditError> {
        self.byte_range(index, count).map(|_| ())
    }

    fn byte_range(&self, index: usize, count: usize) -> Result<(usize, usize), EditError> {
        let len = self.len();
        let end = index
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or_else(|| EditError::out_of_range(index, count, len))?;
        let start = self.byte_offset(index, count)?;
        let end = self.byte_offset(end, count)?;
        Ok((start, end))
    }

    fn byte_offset(&self, index: usize, count: usize) -> Result<usize, EditError> {
        let len = self.len();
        if index > len {
            return Err(EditError::out_of_range(index, count, len));
        }
        let byte = self
            .rope
            .convert_metrics::<Utf16CodeUnitsMetric, BaseMetric>(index);
        // An index inside a surrogate pair rounds to the next char boundary
        if self
            .rope
            .convert_metrics::<BaseMetric, Utf16CodeUnitsMetric>(byte)
            != index
        {
            return Err(EditError::SplitsCharacter { index });
        }
        Ok(byte)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
        }
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.text()).finish()
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}
