/*!
 * # Editing Core
 *
 * A paragraph is a run of text plus a set of inline formats (bold, italic,
 * links, ...) laid over it. This module owns both and keeps them consistent.
 *
 * ## Layers
 *
 * - **`buffer`**: `TextBuffer`, an xi-rope buffer addressed in UTF-16 code
 *   units so offsets line up with what browser editors report
 * - **`format`** / **`format_index`**: `Format` ranges and the `FormatIndex`
 *   interval algebra (shift on edit, overlap queries, toggle/trim/split on
 *   apply, normalization)
 * - **`paragraph`**: the `Paragraph` facade, the only mutation path for a
 *   buffer and its formats
 * - **`ops`**: `Op`/`OpPair` descriptors returned by every mutation, each
 *   with its inverse
 * - **`section`**: an ordered run of paragraphs that can execute descriptors,
 *   which is how undo and redo are replayed
 * - **`segments`**: read-only runs of uniformly formatted text for renderers
 *
 * ## Usage Pattern
 *
 * ```rust
 * use folio_engine::editing::*;
 * use folio_engine::models::ComponentId;
 *
 * let mut section = Section::new("body");
 * let mut history = section
 *     .insert(0, Paragraph::with_id(ComponentId::from("p1"), "hello world"))
 *     .unwrap();
 *
 * let para = section.get_mut(&ComponentId::from("p1")).unwrap();
 * history.extend(para.apply_format(Format::new("b", 0, 5)).unwrap());
 * history.extend(para.insert_chars(11, "!").unwrap());
 *
 * section.undo(&history).unwrap();
 * assert!(section.is_empty());
 *
 * section.redo(&history).unwrap();
 * assert_eq!(section.paragraphs()[0].text(), "hello world!");
 * ```
 */

pub mod buffer;
pub mod commands;
pub mod error;
pub mod format;
pub mod format_index;
pub mod ops;
pub mod paragraph;
pub mod section;
pub mod segments;

pub use buffer::{TextBuffer, utf16_len};
pub use commands::Cmd;
pub use error::EditError;
pub use format::{Attrs, Format};
pub use format_index::{FormatIndex, Overlap};
pub use ops::{ComponentAttrs, Op, OpPair, SelectRange, UpdateAttrs, UpdateHints};
pub use paragraph::{OverlapPolicy, Paragraph};
pub use section::{ComponentLocator, Section};
pub use segments::Segment;
