//! Operation descriptors.
//!
//! Every facade mutation is described by an [`OpPair`]: the operation that
//! performs it and the operation that reverts it. Pairs are plain data meant
//! for an external undo/redo or synchronization layer; a [`Section`] can
//! execute them.
//!
//! [`Section`]: crate::editing::Section

use serde::{Deserialize, Serialize};

use crate::editing::Format;
use crate::models::{ComponentId, ParagraphKind};

/// A single reversible step, tagged by `op` when serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Op {
    #[serde(rename_all = "camelCase")]
    InsertComponent {
        component: ComponentId,
        section: String,
        index: usize,
        attrs: ComponentAttrs,
    },
    #[serde(rename_all = "camelCase")]
    DeleteComponent { component: ComponentId },
    #[serde(rename_all = "camelCase")]
    InsertChars {
        component: ComponentId,
        index: usize,
        value: String,
        /// Formats to restore after inserting, set on the undo of a removal
        /// that collapsed format bounds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formats: Option<Vec<Format>>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveChars {
        component: ComponentId,
        index: usize,
        count: usize,
    },
    #[serde(rename_all = "camelCase")]
    UpdateComponent {
        component: ComponentId,
        attrs: UpdateAttrs,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select_range: Option<SelectRange>,
    },
}

impl Op {
    /// Name used for the `op` field
    pub fn name(&self) -> &'static str {
        match self {
            Op::InsertComponent { .. } => "insertComponent",
            Op::DeleteComponent { .. } => "deleteComponent",
            Op::InsertChars { .. } => "insertChars",
            Op::RemoveChars { .. } => "removeChars",
            Op::UpdateComponent { .. } => "updateComponent",
        }
    }

    /// The paragraph this operation targets
    pub fn component(&self) -> &ComponentId {
        match self {
            Op::InsertComponent { component, .. }
            | Op::DeleteComponent { component }
            | Op::InsertChars { component, .. }
            | Op::RemoveChars { component, .. }
            | Op::UpdateComponent { component, .. } => component,
        }
    }
}

/// A forward operation and its exact inverse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpPair {
    #[serde(rename = "do")]
    pub forward: Op,
    pub undo: Op,
}

impl OpPair {
    pub fn new(forward: Op, undo: Op) -> Self {
        Self { forward, undo }
    }

    /// The same pair with `do` and `undo` swapped, i.e. the redo entry of an undo
    #[must_use]
    pub fn inverted(self) -> Self {
        Self {
            forward: self.undo,
            undo: self.forward,
        }
    }
}

/// Full attribute snapshot of a paragraph, enough to recreate it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAttrs {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    pub paragraph_type: ParagraphKind,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// The attributes changed by an `updateComponent` operation.
///
/// Absent keys are left alone. `placeholder_text` is doubly optional so an
/// update can clear the placeholder (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<Format>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_type: Option<ParagraphKind>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub placeholder_text: Option<Option<String>>,
}

impl UpdateAttrs {
    pub fn formats(formats: Vec<Format>) -> Self {
        Self {
            formats: Some(formats),
            ..Self::default()
        }
    }

    pub fn paragraph_type(kind: ParagraphKind) -> Self {
        Self {
            paragraph_type: Some(kind),
            ..Self::default()
        }
    }

    pub fn placeholder_text(placeholder: Option<String>) -> Self {
        Self {
            placeholder_text: Some(placeholder),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_none() && self.paragraph_type.is_none() && self.placeholder_text.is_none()
    }
}

/// Presentation hints carried by `updateComponent`; the engine passes them
/// through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateHints {
    pub cursor_offset: Option<usize>,
    pub select_range: Option<SelectRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectRange {
    pub from: usize,
    pub to: usize,
}

/// Distinguishes an explicit `null` (clear) from an absent key
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
