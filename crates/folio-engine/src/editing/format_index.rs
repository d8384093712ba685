use log::trace;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::editing::{EditError, Format};

/// Result of asking which formats intersect a query range, with the
/// query's type in mind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlap<'a> {
    /// Nothing intersects the query
    None,
    /// Everything that intersects the query has the query's type
    Homogeneous(Vec<&'a Format>),
    /// At least one intersecting format has a different type
    Mixed,
}

/// How an incoming format relates to an existing format of the same type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// Identical ranges
    Equal,
    /// Incoming lies strictly inside the existing range
    Interior,
    /// Incoming lies inside the existing range and shares exactly one edge
    SharedEdge,
    /// Anything else that intersects: one-sided overlap, or the existing
    /// range lies inside the incoming one
    Partial,
}

impl Relation {
    fn of(existing: &Format, incoming: &Format) -> Self {
        if existing.same_range(incoming) {
            Relation::Equal
        } else if existing.from < incoming.from && incoming.to < existing.to {
            Relation::Interior
        } else if existing.from <= incoming.from && incoming.to <= existing.to {
            Relation::SharedEdge
        } else {
            Relation::Partial
        }
    }
}

/// Ordered set of inline formats over one paragraph's text.
///
/// Ranges are kept sorted by `from`, then type. Ranges of the same type never
/// overlap and never touch unless their attributes differ; ranges of
/// different types overlap freely. The index knows nothing about the text
/// itself, so bounds against the text length are checked by the owning
/// [`Paragraph`](crate::editing::Paragraph).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatIndex {
    ranges: Vec<Format>,
}

impl FormatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalized index from arbitrary formats
    pub fn from_formats(formats: impl IntoIterator<Item = Format>) -> Result<Self, EditError> {
        let ranges = formats
            .into_iter()
            .map(|format| format.validate().map(|()| format))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = Self { ranges };
        index.normalize();
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Format> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[Format] {
        &self.ranges
    }

    pub fn to_vec(&self) -> Vec<Format> {
        self.ranges.clone()
    }

    /// Largest `to` of any range (0 when empty)
    pub fn max_offset(&self) -> usize {
        self.ranges.iter().map(|f| f.to).max().unwrap_or(0)
    }

    /// Every format intersecting `[from, to)`, of any type
    pub fn overlapping(&self, from: usize, to: usize) -> impl Iterator<Item = &Format> {
        self.ranges.iter().filter(move |f| f.intersects(from, to))
    }

    /// Classify the formats intersecting `query` with respect to its type
    pub fn classify(&self, query: &Format) -> Overlap<'_> {
        let mut found = Vec::new();
        for format in self.overlapping(query.from, query.to) {
            if format.tag != query.tag {
                return Overlap::Mixed;
            }
            found.push(format);
        }

        if found.is_empty() {
            Overlap::None
        } else {
            Overlap::Homogeneous(found)
        }
    }

    /// Formats covering the code unit at `index`
    pub fn formats_at(&self, index: usize) -> impl Iterator<Item = &Format> {
        self.ranges.iter().filter(move |f| f.contains(index))
    }

    /// True when every code unit of `[from, to)` carries a format of type `tag`
    pub fn has_format(&self, tag: &str, from: usize, to: usize) -> bool {
        if from >= to {
            return false;
        }

        let mut covered = from;
        for format in self.ranges.iter().filter(|f| f.tag == tag) {
            if format.from <= covered && format.to > covered {
                covered = format.to;
                if covered >= to {
                    return true;
                }
            }
        }
        false
    }

    /// Move ranges to follow a splice at `start`.
    ///
    /// `delta` is the number of code units inserted (positive) or removed
    /// (negative). Ranges starting at or after `start` move with the text;
    /// ranges straddling `start` grow or shrink at their end. Ranges wholly
    /// inside a removed span disappear.
    pub fn shift(&mut self, start: usize, delta: isize) {
        let amount = delta.unsigned_abs();
        if amount == 0 {
            return;
        }

        if delta > 0 {
            for format in &mut self.ranges {
                if format.from >= start {
                    format.from += amount;
                    format.to += amount;
                } else if format.to > start {
                    format.to += amount;
                }
            }
            return;
        }

        let end = start.saturating_add(amount);
        // Bounds inside the removed span collapse onto its start
        let map = |offset: usize| match offset {
            o if o <= start => o,
            o if o <= end => start,
            o => o - amount,
        };

        self.ranges.retain_mut(|format| {
            if format.from >= start && format.to <= end {
                trace!(
                    "dropping {} {}..{}: removed with its text",
                    format.tag, format.from, format.to
                );
                return false;
            }
            format.from = map(format.from);
            format.to = map(format.to);
            format.from < format.to
        });

        // Closing a gap can leave same-type neighbours touching
        self.normalize();
    }

    /// Apply `format` to the index.
    ///
    /// The formats intersecting the span decide what happens. With none,
    /// the format is inserted. When they are all of the format's type, each
    /// is resolved: attributes are overwritten, identical ranges toggle off,
    /// interior ranges are cut out, and partial overlaps are extended to the
    /// union. Any other type in the span makes the request ambiguous, which
    /// is reported as [`EditError::AmbiguousOverlap`] (see
    /// [`FormatIndex::clear_and_apply`]).
    ///
    /// With `clear_only` set this is the clear pass: same-type ranges in the
    /// span are resolved whatever else intersects it, and partial overlaps
    /// are removed entirely instead of extended.
    ///
    /// Nothing is modified when an error is returned.
    pub fn apply_format(&mut self, format: Format, clear_only: bool) -> Result<(), EditError> {
        format.validate()?;

        let (untouched, mixed) = match self.classify(&format) {
            Overlap::None => (true, false),
            Overlap::Homogeneous(_) => (false, false),
            Overlap::Mixed => (false, true),
        };

        if untouched {
            if !clear_only {
                trace!("inserting {} {}..{}", format.tag, format.from, format.to);
                self.insert_sorted(format);
                self.normalize();
            }
            return Ok(());
        }
        if mixed && !clear_only {
            return Err(EditError::AmbiguousOverlap {
                tag: format.tag,
                from: format.from,
                to: format.to,
            });
        }

        let mut resolved = Vec::with_capacity(self.ranges.len() + 1);
        for existing in std::mem::take(&mut self.ranges) {
            if existing.tag == format.tag && existing.intersects(format.from, format.to) {
                resolve(existing, &format, clear_only, &mut resolved);
            } else {
                resolved.push(existing);
            }
        }
        self.ranges = resolved;

        if clear_only {
            self.ranges.sort_by(Format::index_order);
        } else {
            self.normalize();
        }
        Ok(())
    }

    /// Run the clear pass over the span of `format`, then insert `format`
    /// regardless of formats of other types.
    pub fn clear_and_apply(&mut self, format: Format) -> Result<(), EditError> {
        format.validate()?;

        self.apply_format(format.clone(), true)?;
        trace!(
            "re-applying {} {}..{} after clear",
            format.tag, format.from, format.to
        );
        self.insert_sorted(format);
        self.normalize();
        Ok(())
    }

    /// Merge overlapping (or touching, equally attributed) same-type ranges
    /// and restore the index order. Zero-width ranges are discarded.
    pub fn normalize(&mut self) {
        self.ranges.retain(|f| f.from < f.to);
        self.ranges.sort_by(Format::index_order);

        let mut merged: Vec<Format> = Vec::with_capacity(self.ranges.len());
        let mut last_of_type: HashMap<String, usize> = HashMap::new();

        for format in std::mem::take(&mut self.ranges) {
            if let Some(&at) = last_of_type.get(&format.tag) {
                let previous = &mut merged[at];
                let overlaps = format.from < previous.to;
                let touches = format.from == previous.to && format.attrs == previous.attrs;
                if overlaps || touches {
                    trace!(
                        "merging {} {}..{} into {}..{}",
                        format.tag, format.from, format.to, previous.from, previous.to
                    );
                    previous.to = previous.to.max(format.to);
                    continue;
                }
            }
            last_of_type.insert(format.tag.clone(), merged.len());
            merged.push(format);
        }

        self.ranges = merged;
    }

    fn insert_sorted(&mut self, format: Format) {
        let at = self
            .ranges
            .partition_point(|f| f.index_order(&format) != Ordering::Greater);
        self.ranges.insert(at, format);
    }
}

/// Resolve one existing same-type range against an incoming format,
/// pushing whatever survives into `out`.
fn resolve(existing: Format, incoming: &Format, clear_only: bool, out: &mut Vec<Format>) {
    if !clear_only && let Some(attrs) = &incoming.attrs {
        trace!(
            "updating attributes of {} {}..{}",
            existing.tag, existing.from, existing.to
        );
        out.push(Format {
            attrs: Some(attrs.clone()),
            ..existing
        });
        return;
    }

    let relation = Relation::of(&existing, incoming);
    trace!(
        "{:?}: {} {}..{} against {}..{}",
        relation, existing.tag, existing.from, existing.to, incoming.from, incoming.to
    );

    match relation {
        Relation::Equal => {}
        Relation::Interior | Relation::SharedEdge => subtract(&existing, incoming, out),
        Relation::Partial if clear_only => {}
        Relation::Partial => out.push(existing.range_copy(
            existing.from.min(incoming.from),
            existing.to.max(incoming.to),
        )),
    }
}

/// Push the parts of `existing` lying outside `incoming`
fn subtract(existing: &Format, incoming: &Format, out: &mut Vec<Format>) {
    if existing.from < incoming.from {
        out.push(existing.range_copy(existing.from, incoming.from));
    }
    if incoming.to < existing.to {
        out.push(existing.range_copy(incoming.to, existing.to));
    }
}
