use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

use crate::editing::buffer::utf16_len;
use crate::editing::segments::derive_segments;
use crate::editing::{
    Cmd, ComponentAttrs, ComponentLocator, EditError, Format, FormatIndex, Op, OpPair, Segment,
    SelectRange, TextBuffer, UpdateAttrs, UpdateHints,
};
use crate::models::{ComponentId, IdAllocator, ParagraphKind, ParagraphRecord};

/// What [`Paragraph::apply_format`] does when the target span carries
/// formats of other types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Clear same-type formatting in the span, then apply the format
    #[default]
    ClearAndReapply,
    /// Report [`EditError::AmbiguousOverlap`] to the caller
    Reject,
}

/// A paragraph: text, inline formats and presentation attributes.
///
/// This is the only mutation path for its [`TextBuffer`] and
/// [`FormatIndex`]: every splice shifts the formats with it, and every
/// mutation returns the [`OpPair`] describing it and its inverse.
///
/// ```rust
/// use folio_engine::editing::{Format, Paragraph};
/// use folio_engine::models::SequentialIds;
///
/// let mut ids = SequentialIds::default();
/// let mut para = Paragraph::new(&mut ids, "hello world");
///
/// para.apply_format(Format::new("b", 0, 5)).unwrap();
/// let ops = para.insert_chars(5, "!").unwrap();
///
/// assert_eq!(para.text(), "hello! world");
/// assert_eq!(para.formats().to_vec(), vec![Format::new("b", 0, 5)]);
/// assert_eq!(ops.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Paragraph {
    id: ComponentId,
    text: TextBuffer,
    placeholder_text: Option<String>,
    kind: ParagraphKind,
    formats: FormatIndex,
    /// Name of the owning section, if attached. Positions are looked up
    /// through a [`ComponentLocator`], never stored.
    section: Option<String>,
    overlap_policy: OverlapPolicy,
    version: u64,
    segments: OnceCell<Vec<Segment>>,
}

impl Paragraph {
    /// Create a paragraph with an identifier from `ids`
    pub fn new(ids: &mut impl IdAllocator, text: &str) -> Self {
        Self::with_id(ids.next_id(), text)
    }

    pub fn with_id(id: ComponentId, text: &str) -> Self {
        Self {
            id,
            text: TextBuffer::from(text),
            placeholder_text: None,
            kind: ParagraphKind::default(),
            formats: FormatIndex::new(),
            section: None,
            overlap_policy: OverlapPolicy::default(),
            version: 0,
            segments: OnceCell::new(),
        }
    }

    /// Recreate a paragraph from an attribute snapshot
    pub fn from_attrs(id: ComponentId, attrs: ComponentAttrs) -> Result<Self, EditError> {
        Self::with_id(id, &attrs.text)
            .with_kind(attrs.paragraph_type)
            .with_placeholder(attrs.placeholder_text)
            .with_formats(attrs.formats)
    }

    pub fn from_record(record: ParagraphRecord) -> Result<Self, EditError> {
        Self::with_id(record.id, &record.text)
            .with_kind(record.paragraph_type)
            .with_formats(record.formats.unwrap_or_default())
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ParagraphKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder_text = placeholder;
        self
    }

    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Replace the formats, validating each against the current text
    pub fn with_formats(mut self, formats: Vec<Format>) -> Result<Self, EditError> {
        self.formats = Self::checked_index(&self.text, formats)?;
        self.segments = OnceCell::new();
        Ok(self)
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn text(&self) -> String {
        self.text.text()
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn kind(&self) -> ParagraphKind {
        self.kind
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder_text.as_deref()
    }

    pub fn formats(&self) -> &FormatIndex {
        &self.formats
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    /// Number of successful mutations since construction
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Name of the owning section
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub(crate) fn attach(&mut self, section: &str) {
        self.section = Some(section.to_string());
    }

    pub(crate) fn detach(&mut self) {
        self.section = None;
    }

    /// Text split into runs of identical formatting, derived on first use
    /// after each mutation
    pub fn segments(&self) -> &[Segment] {
        self.segments
            .get_or_init(|| derive_segments(&self.text, &self.formats))
    }

    /// Full attribute snapshot, as carried by `insertComponent`
    pub fn snapshot(&self) -> ComponentAttrs {
        ComponentAttrs {
            text: self.text(),
            placeholder_text: self.placeholder_text.clone(),
            paragraph_type: self.kind,
            formats: self.formats.to_vec(),
        }
    }

    pub fn to_record(&self) -> ParagraphRecord {
        ParagraphRecord {
            id: self.id.clone(),
            text: self.text(),
            paragraph_type: self.kind,
            formats: (!self.formats.is_empty()).then(|| self.formats.to_vec()),
        }
    }

    /// Apply a command through the matching facade operation
    pub fn apply(&mut self, cmd: Cmd) -> Result<Vec<OpPair>, EditError> {
        match cmd {
            Cmd::InsertChars {
                index,
                text,
                formats,
            } => self.splice_in(index, &text, formats),
            Cmd::RemoveChars { index, count } => self.remove_chars(index, count),
            Cmd::Format { format } => self.apply_format(format),
            Cmd::Update { attrs, hints } => self.update(attrs, hints),
        }
    }

    /// Insert `chars` at `index`, shifting formats to follow the text
    pub fn insert_chars(&mut self, index: usize, chars: &str) -> Result<Vec<OpPair>, EditError> {
        self.splice_in(index, chars, None)
    }

    /// Remove `count` code units at `index`. Formats lying wholly inside the
    /// removed span go with it.
    ///
    /// When re-inserting the text would not bring the formats back (a
    /// format bound fell inside the span), the undo `insertChars` also
    /// carries the formats from before the removal.
    pub fn remove_chars(&mut self, index: usize, count: usize) -> Result<Vec<OpPair>, EditError> {
        self.text.check_range(index, count)?;
        let removed = self.text.slice(index, index + count)?;
        let before = self.formats.clone();

        self.text.remove_at(index, count)?;
        self.formats.shift(index, -(count as isize));
        self.touch();

        let mut reinserted = self.formats.clone();
        reinserted.shift(index, count as isize);
        let restore = (reinserted != before).then(|| before.to_vec());
        if restore.is_some() {
            debug!("{}: removal at {index} collapses format bounds", self.id);
        }

        debug!("{}: removed {count} code units at {index}", self.id);
        Ok(vec![OpPair::new(
            Op::RemoveChars {
                component: self.id.clone(),
                index,
                count,
            },
            Op::InsertChars {
                component: self.id.clone(),
                index,
                value: removed,
                formats: restore,
            },
        )])
    }

    /// Toggle, trim, split, extend or insert `format` (see
    /// [`FormatIndex::apply_format`]), honouring the paragraph's
    /// [`OverlapPolicy`].
    pub fn apply_format(&mut self, format: Format) -> Result<Vec<OpPair>, EditError> {
        Self::check_format(&self.text, &format)?;

        let before = self.formats.to_vec();
        let span = SelectRange {
            from: format.from,
            to: format.to,
        };

        let mut next = self.formats.clone();
        match next.apply_format(format.clone(), false) {
            Ok(()) => {}
            Err(EditError::AmbiguousOverlap { .. })
                if self.overlap_policy == OverlapPolicy::ClearAndReapply =>
            {
                debug!(
                    "{}: mixed formatting under {} {}..{}, clearing and re-applying",
                    self.id, format.tag, format.from, format.to
                );
                next.clear_and_apply(format)?;
            }
            Err(err) => return Err(err),
        }
        self.formats = next;
        self.touch();

        debug!("{}: formats now {:?}", self.id, self.formats.as_slice());
        let hints = UpdateHints {
            cursor_offset: None,
            select_range: Some(span),
        };
        Ok(vec![self.update_pair(
            UpdateAttrs::formats(self.formats.to_vec()),
            UpdateAttrs::formats(before),
            hints,
        )])
    }

    /// Set any of formats, paragraph type and placeholder.
    ///
    /// The undo half carries the values each changed key had before the
    /// call. Formats are validated and normalized before anything changes.
    pub fn update(
        &mut self,
        attrs: UpdateAttrs,
        hints: UpdateHints,
    ) -> Result<Vec<OpPair>, EditError> {
        let formats = attrs
            .formats
            .clone()
            .map(|formats| Self::checked_index(&self.text, formats))
            .transpose()?;

        let previous = UpdateAttrs {
            formats: formats.as_ref().map(|_| self.formats.to_vec()),
            paragraph_type: attrs.paragraph_type.map(|_| self.kind),
            placeholder_text: attrs
                .placeholder_text
                .as_ref()
                .map(|_| self.placeholder_text.clone()),
        };

        if let Some(formats) = formats {
            self.formats = formats;
        }
        if let Some(kind) = attrs.paragraph_type {
            self.kind = kind;
        }
        if let Some(placeholder) = attrs.placeholder_text.clone() {
            self.placeholder_text = placeholder;
        }
        self.touch();

        let applied = UpdateAttrs {
            formats: attrs.formats.as_ref().map(|_| self.formats.to_vec()),
            ..attrs
        };
        debug!("{}: updated attributes {:?}", self.id, applied);
        Ok(vec![self.update_pair(applied, previous, hints)])
    }

    /// Operations that insert this paragraph into `section` at `index`
    pub fn insert_ops(&self, section: &str, index: usize) -> Vec<OpPair> {
        vec![OpPair::new(
            Op::InsertComponent {
                component: self.id.clone(),
                section: section.to_string(),
                index,
                attrs: self.snapshot(),
            },
            Op::DeleteComponent {
                component: self.id.clone(),
            },
        )]
    }

    /// Operations that delete this paragraph from its section.
    ///
    /// The undo re-inserts a full snapshot at the paragraph's current index
    /// plus `index_offset` (clamped at 0).
    pub fn delete_ops(
        &self,
        locator: &impl ComponentLocator,
        index_offset: isize,
    ) -> Result<Vec<OpPair>, EditError> {
        let section = match self.section.as_deref() {
            Some(name) if name == locator.section_name() => name,
            _ => return Err(EditError::Detached(self.id.clone())),
        };
        let index = locator
            .index_of(&self.id)
            .ok_or_else(|| EditError::UnknownComponent(self.id.clone()))?;
        let index = index.saturating_add_signed(index_offset);

        Ok(vec![OpPair::new(
            Op::DeleteComponent {
                component: self.id.clone(),
            },
            Op::InsertComponent {
                component: self.id.clone(),
                section: section.to_string(),
                index,
                attrs: self.snapshot(),
            },
        )])
    }

    /// Insert `chars`, then either shift the formats or, when `restore` is
    /// given, replace them with it. Both are checked before anything changes.
    fn splice_in(
        &mut self,
        index: usize,
        chars: &str,
        restore: Option<Vec<Format>>,
    ) -> Result<Vec<OpPair>, EditError> {
        let mut text = self.text.clone();
        text.insert_at(index, chars)?;
        let count = utf16_len(chars);

        let formats = match &restore {
            Some(formats) => Self::checked_index(&text, formats.clone())?,
            None => {
                let mut formats = self.formats.clone();
                formats.shift(index, count as isize);
                formats
            }
        };
        self.text = text;
        self.formats = formats;
        self.touch();

        debug!("{}: inserted {count} code units at {index}", self.id);
        Ok(vec![OpPair::new(
            Op::InsertChars {
                component: self.id.clone(),
                index,
                value: chars.to_string(),
                formats: restore,
            },
            Op::RemoveChars {
                component: self.id.clone(),
                index,
                count,
            },
        )])
    }

    fn update_pair(&self, forward: UpdateAttrs, undo: UpdateAttrs, hints: UpdateHints) -> OpPair {
        let op = |attrs| Op::UpdateComponent {
            component: self.id.clone(),
            attrs,
            cursor_offset: hints.cursor_offset,
            select_range: hints.select_range,
        };
        OpPair::new(op(forward), op(undo))
    }

    fn check_format(text: &TextBuffer, format: &Format) -> Result<(), EditError> {
        format.validate()?;
        text.check_range(format.from, format.to - format.from)
    }

    fn checked_index(text: &TextBuffer, formats: Vec<Format>) -> Result<FormatIndex, EditError> {
        for format in &formats {
            Self::check_format(text, format)?;
        }
        FormatIndex::from_formats(formats)
    }

    fn touch(&mut self) {
        self.version += 1;
        self.segments = OnceCell::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Section;
    use crate::models::SequentialIds;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> Paragraph {
        Paragraph::with_id(ComponentId::from("p1"), text)
    }

    fn b(from: usize, to: usize) -> Format {
        Format::new("b", from, to)
    }

    #[test]
    fn test_new_takes_id_from_allocator() {
        let mut ids = SequentialIds::new("x");
        assert_eq!(Paragraph::new(&mut ids, "a").id().as_str(), "x1");
        assert_eq!(Paragraph::new(&mut ids, "b").id().as_str(), "x2");
    }

    #[test]
    fn test_insert_at_format_boundary() {
        let mut p = para("hello world");
        p.apply_format(b(0, 5)).unwrap();

        p.insert_chars(5, "! ").unwrap();

        assert_eq!(p.text(), "hello!  world");
        assert_eq!(p.formats().to_vec(), vec![b(0, 5)]);
    }

    #[test]
    fn test_insert_ops_pair() {
        let mut p = para("abc");
        let ops = p.insert_chars(1, "xy").unwrap();
        assert_eq!(
            ops,
            vec![OpPair::new(
                Op::InsertChars {
                    component: ComponentId::from("p1"),
                    index: 1,
                    value: "xy".to_string(),
                    formats: None
                },
                Op::RemoveChars {
                    component: ComponentId::from("p1"),
                    index: 1,
                    count: 2
                },
            )]
        );
    }

    #[test]
    fn test_remove_shrinks_format_and_captures_text() {
        let mut p = para("0123456789").with_formats(vec![b(0, 10)]).unwrap();

        let ops = p.remove_chars(2, 5).unwrap();

        assert_eq!(p.text(), "01789");
        assert_eq!(p.formats().to_vec(), vec![b(0, 5)]);
        assert_eq!(
            ops[0].undo,
            Op::InsertChars {
                component: ComponentId::from("p1"),
                index: 2,
                value: "23456".to_string(),
                formats: None
            }
        );
    }

    #[test]
    fn test_remove_across_format_bounds_keeps_formats_for_undo() {
        let original = vec![b(0, 4), Format::new("i", 6, 8)];
        let mut p = para("0123456789").with_formats(original.clone()).unwrap();

        let ops = p.remove_chars(3, 4).unwrap();

        assert_eq!(p.text(), "012789");
        assert_eq!(p.formats().to_vec(), vec![b(0, 3), Format::new("i", 3, 4)]);
        assert_eq!(
            ops,
            vec![OpPair::new(
                Op::RemoveChars {
                    component: ComponentId::from("p1"),
                    index: 3,
                    count: 4
                },
                Op::InsertChars {
                    component: ComponentId::from("p1"),
                    index: 3,
                    value: "3456".to_string(),
                    formats: Some(original.clone())
                },
            )]
        );

        let Op::InsertChars {
            index,
            value,
            formats,
            ..
        } = ops[0].undo.clone()
        else {
            panic!("expected an insertChars undo");
        };
        p.apply(Cmd::InsertChars {
            index,
            text: value,
            formats,
        })
        .unwrap();
        assert_eq!(p.text(), "0123456789");
        assert_eq!(p.formats().to_vec(), original);
    }

    #[test]
    fn test_out_of_range_edits_change_nothing() {
        let mut p = para("abc").with_formats(vec![b(0, 3)]).unwrap();

        assert!(matches!(
            p.insert_chars(9, "x"),
            Err(EditError::OutOfRange { .. })
        ));
        assert!(matches!(
            p.remove_chars(1, 3),
            Err(EditError::OutOfRange { .. })
        ));
        assert!(matches!(
            p.apply_format(b(1, 4)),
            Err(EditError::OutOfRange { .. })
        ));

        assert_eq!(p.text(), "abc");
        assert_eq!(p.formats().to_vec(), vec![b(0, 3)]);
        assert_eq!(p.version(), 0);
    }

    #[test]
    fn test_format_undo_carries_previous_formats() {
        let mut p = para("hello world").with_formats(vec![b(0, 5)]).unwrap();

        let ops = p.apply_format(Format::new("i", 6, 11)).unwrap();

        let Op::UpdateComponent { attrs, .. } = &ops[0].forward else {
            panic!("expected updateComponent");
        };
        assert_eq!(
            attrs.formats,
            Some(vec![b(0, 5), Format::new("i", 6, 11)])
        );
        let Op::UpdateComponent { attrs, select_range, .. } = &ops[0].undo else {
            panic!("expected updateComponent");
        };
        assert_eq!(attrs.formats, Some(vec![b(0, 5)]));
        assert_eq!(*select_range, Some(SelectRange { from: 6, to: 11 }));
    }

    #[test]
    fn test_mixed_overlap_follows_policy() {
        let italic = vec![Format::new("i", 0, 5)];

        let mut lenient = para("hello").with_formats(italic.clone()).unwrap();
        lenient.apply_format(b(2, 5)).unwrap();
        assert_eq!(
            lenient.formats().to_vec(),
            vec![Format::new("i", 0, 5), b(2, 5)]
        );

        let mut strict = para("hello")
            .with_formats(italic.clone())
            .unwrap()
            .with_overlap_policy(OverlapPolicy::Reject);
        assert!(matches!(
            strict.apply_format(b(2, 5)),
            Err(EditError::AmbiguousOverlap { .. })
        ));
        assert_eq!(strict.formats().to_vec(), italic);
    }

    #[test]
    fn test_update_undo_is_pre_mutation_snapshot() {
        let mut p = para("abc")
            .with_kind(ParagraphKind::Quote)
            .with_placeholder(Some("Say something".to_string()));

        let ops = p
            .update(
                UpdateAttrs {
                    paragraph_type: Some(ParagraphKind::MainHeader),
                    placeholder_text: Some(None),
                    formats: None,
                },
                UpdateHints::default(),
            )
            .unwrap();

        assert_eq!(p.kind(), ParagraphKind::MainHeader);
        assert_eq!(p.placeholder_text(), None);

        let Op::UpdateComponent { attrs, .. } = &ops[0].undo else {
            panic!("expected updateComponent");
        };
        assert_eq!(
            *attrs,
            UpdateAttrs {
                paragraph_type: Some(ParagraphKind::Quote),
                placeholder_text: Some(Some("Say something".to_string())),
                formats: None,
            }
        );
    }

    #[test]
    fn test_update_normalizes_formats_and_rejects_bad_ones() {
        let mut p = para("abcdef");

        let ops = p
            .update(
                UpdateAttrs::formats(vec![b(0, 2), b(2, 4)]),
                UpdateHints::default(),
            )
            .unwrap();
        let Op::UpdateComponent { attrs, .. } = &ops[0].forward else {
            panic!("expected updateComponent");
        };
        assert_eq!(attrs.formats, Some(vec![b(0, 4)]));

        assert_eq!(
            p.update(UpdateAttrs::formats(vec![b(3, 3)]), UpdateHints::default()),
            Err(EditError::InvalidFormatRange { from: 3, to: 3 })
        );
        assert_eq!(p.formats().to_vec(), vec![b(0, 4)]);
    }

    #[test]
    fn test_delete_ops_snapshot_formats() {
        let mut section = Section::new("body");
        let p = para("abc")
            .with_formats(vec![Format::new("i", 0, 1)])
            .unwrap();
        section.insert(0, p).unwrap();

        let ops = section.paragraphs()[0].delete_ops(&section, 0).unwrap();
        let Op::InsertComponent { attrs, index, section: name, .. } = &ops[0].undo else {
            panic!("expected insertComponent");
        };
        assert_eq!(attrs.formats, vec![Format::new("i", 0, 1)]);
        assert_eq!(attrs.text, "abc");
        assert_eq!(*index, 0);
        assert_eq!(name, "body");
    }

    #[test]
    fn test_delete_ops_offset_and_detached() {
        let mut section = Section::new("body");
        section.insert(0, para("first")).unwrap();
        section
            .insert(1, Paragraph::with_id(ComponentId::from("p2"), "second"))
            .unwrap();

        let second = &section.paragraphs()[1];
        let ops = second.delete_ops(&section, 1).unwrap();
        assert!(matches!(ops[0].undo, Op::InsertComponent { index: 2, .. }));

        let ops = second.delete_ops(&section, -5).unwrap();
        assert!(matches!(ops[0].undo, Op::InsertComponent { index: 0, .. }));

        let loose = para("loose");
        assert_eq!(
            loose.delete_ops(&section, 0),
            Err(EditError::Detached(ComponentId::from("p1")))
        );
    }

    #[test]
    fn test_segments_are_refreshed_after_mutation() {
        let mut p = para("hello").with_formats(vec![b(0, 2)]).unwrap();
        assert_eq!(p.segments().len(), 2);

        p.apply_format(b(0, 2)).unwrap();
        assert_eq!(p.segments().len(), 1);
        assert!(p.segments()[0].formats.is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let p = para("abc")
            .with_kind(ParagraphKind::ListItem)
            .with_formats(vec![Format::new("i", 0, 1)])
            .unwrap();

        let record = p.to_record();
        assert_eq!(record.formats, Some(vec![Format::new("i", 0, 1)]));

        let restored = Paragraph::from_record(record.clone()).unwrap();
        assert_eq!(restored.to_record(), record);

        assert_eq!(para("plain").to_record().formats, None);
    }

    #[test]
    fn test_from_record_rejects_formats_past_text() {
        let record = ParagraphRecord {
            id: ComponentId::from("p1"),
            text: "ab".to_string(),
            paragraph_type: ParagraphKind::Paragraph,
            formats: Some(vec![b(0, 3)]),
        };
        assert!(matches!(
            Paragraph::from_record(record),
            Err(EditError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut p = para("ab");
        p.apply(Cmd::InsertChars {
            index: 2,
            text: "cd".to_string(),
            formats: None,
        })
        .unwrap();
        p.apply(Cmd::Format { format: b(0, 4) }).unwrap();
        p.apply(Cmd::RemoveChars { index: 0, count: 1 }).unwrap();

        assert_eq!(p.text(), "bcd");
        assert_eq!(p.formats().to_vec(), vec![b(0, 3)]);
        assert_eq!(p.version(), 3);
    }
}
