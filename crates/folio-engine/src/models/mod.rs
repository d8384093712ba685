pub mod ids;
pub mod kind;
pub mod record;

pub use ids::{ComponentId, IdAllocator, SequentialIds, UuidAllocator};
pub use kind::{ParagraphKind, UnknownParagraphKind};
pub use record::ParagraphRecord;
