//! Read-only views of paragraphs.
//!
//! Renderers consume a paragraph's text, kind, placeholder and segments.
//! They never mutate it.

pub mod html;

pub use html::HtmlRenderer;

use crate::editing::Paragraph;

/// Turns a paragraph into some presentation form
pub trait Renderer {
    type Output;

    fn render(&self, paragraph: &Paragraph) -> Self::Output;
}
