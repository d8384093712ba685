use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable name of a component (paragraph) inside a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Hands out identifiers for newly constructed components
pub trait IdAllocator {
    fn next_id(&mut self) -> ComponentId;
}

/// Random identifiers: the first 8 hex digits of a v4 uuid
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidAllocator;

impl IdAllocator for UuidAllocator {
    fn next_id(&mut self) -> ComponentId {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        ComponentId(uuid[..8].to_string())
    }
}

/// Deterministic identifiers (`<prefix><n>`), mostly useful in tests and tools
/// that need reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("p")
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> ComponentId {
        let id = ComponentId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
