pub mod editing;
pub mod models;
pub mod render;

// Re-export key types for easier usage
pub use editing::{
    Cmd, EditError, Format, FormatIndex, Op, OpPair, OverlapPolicy, Paragraph, Section,
};
pub use models::{ComponentId, ParagraphKind, ParagraphRecord};
pub use render::{HtmlRenderer, Renderer};
