use log::{debug, warn};

use crate::editing::{Cmd, EditError, Op, OpPair, OverlapPolicy, Paragraph, UpdateHints};
use crate::models::ComponentId;

/// Answers where a component sits, without owning it
pub trait ComponentLocator {
    fn section_name(&self) -> &str;
    fn index_of(&self, id: &ComponentId) -> Option<usize>;
}

/// An ordered run of paragraphs that can execute operation descriptors.
///
/// This is the smallest owner needed to replay `do`/`undo` operations: it
/// resolves components by id, attaches inserted paragraphs to itself and
/// routes character and attribute operations through the paragraph facade.
#[derive(Debug, Clone, Default)]
pub struct Section {
    name: String,
    paragraphs: Vec<Paragraph>,
    overlap_policy: OverlapPolicy,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paragraphs: Vec::new(),
            overlap_policy: OverlapPolicy::default(),
        }
    }

    /// Policy given to paragraphs recreated from `insertComponent`
    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id() == id)
    }

    /// Mutable access for editing through the paragraph facade
    pub fn get_mut(&mut self, id: &ComponentId) -> Option<&mut Paragraph> {
        self.paragraphs.iter_mut().find(|p| p.id() == id)
    }

    /// Insert `paragraph` at `index` and return the operations describing it
    pub fn insert(
        &mut self,
        index: usize,
        mut paragraph: Paragraph,
    ) -> Result<Vec<OpPair>, EditError> {
        if index > self.paragraphs.len() {
            return Err(EditError::IndexOutOfSection {
                index,
                len: self.paragraphs.len(),
            });
        }
        if self.index_of(paragraph.id()).is_some() {
            return Err(EditError::DuplicateComponent(paragraph.id().clone()));
        }

        paragraph.attach(&self.name);
        let ops = paragraph.insert_ops(&self.name, index);
        debug!("{}: inserted {} at {index}", self.name, paragraph.id());
        self.paragraphs.insert(index, paragraph);
        Ok(ops)
    }

    /// Remove a paragraph, returning it with the operations describing the removal
    pub fn remove(&mut self, id: &ComponentId) -> Result<(Paragraph, Vec<OpPair>), EditError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditError::UnknownComponent(id.clone()))?;
        let ops = self.paragraphs[index].delete_ops(&*self, 0)?;

        let mut paragraph = self.paragraphs.remove(index);
        paragraph.detach();
        debug!("{}: removed {id} from {index}", self.name);
        Ok((paragraph, ops))
    }

    /// Execute one operation descriptor
    pub fn apply(&mut self, op: &Op) -> Result<(), EditError> {
        match op {
            Op::InsertComponent {
                component,
                section,
                index,
                attrs,
            } => {
                if section != &self.name {
                    warn!(
                        "{}: inserting {component} addressed to section {section}",
                        self.name
                    );
                }
                let paragraph = Paragraph::from_attrs(component.clone(), attrs.clone())?
                    .with_overlap_policy(self.overlap_policy);
                self.insert(*index, paragraph).map(|_| ())
            }
            Op::DeleteComponent { component } => self.remove(component).map(|_| ()),
            Op::InsertChars {
                component,
                index,
                value,
                formats,
            } => self.run(
                component,
                Cmd::InsertChars {
                    index: *index,
                    text: value.clone(),
                    formats: formats.clone(),
                },
            ),
            Op::RemoveChars {
                component,
                index,
                count,
            } => self.run(
                component,
                Cmd::RemoveChars {
                    index: *index,
                    count: *count,
                },
            ),
            Op::UpdateComponent {
                component,
                attrs,
                cursor_offset,
                select_range,
            } => self.run(
                component,
                Cmd::Update {
                    attrs: attrs.clone(),
                    hints: UpdateHints {
                        cursor_offset: *cursor_offset,
                        select_range: *select_range,
                    },
                },
            ),
        }
    }

    /// Route a paragraph-level command to the component it names
    fn run(&mut self, component: &ComponentId, cmd: Cmd) -> Result<(), EditError> {
        let paragraph = self
            .get_mut(component)
            .ok_or_else(|| EditError::UnknownComponent(component.clone()))?;
        paragraph.apply(cmd).map(|_| ())
    }

    /// Execute operations in order. Either all of them apply or, on the
    /// first error, none do.
    pub fn apply_all<'a>(&mut self, ops: impl IntoIterator<Item = &'a Op>) -> Result<(), EditError> {
        let mut scratch = self.clone();
        for op in ops {
            scratch.apply(op)?;
        }
        *self = scratch;
        Ok(())
    }

    /// Execute the `undo` halves of `pairs`, newest first
    pub fn undo(&mut self, pairs: &[OpPair]) -> Result<(), EditError> {
        self.apply_all(pairs.iter().rev().map(|pair| &pair.undo))
    }

    /// Execute the `do` halves of `pairs`, oldest first
    pub fn redo(&mut self, pairs: &[OpPair]) -> Result<(), EditError> {
        self.apply_all(pairs.iter().map(|pair| &pair.forward))
    }
}

impl ComponentLocator for Section {
    fn section_name(&self) -> &str {
        &self.name
    }

    fn index_of(&self, id: &ComponentId) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.id() == id)
    }
}
