use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::editing::{Format, Paragraph, Segment};
use crate::render::Renderer;

/// Renders a paragraph as an HTML fragment.
///
/// The paragraph kind picks the outer element. Each segment is wrapped in
/// one element per active format, outermost first. Unknown format types
/// become a `span` carrying the type in `data-format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_segment(&self, segment: &Segment, out: &mut String) {
        for format in &segment.formats {
            open_tag(format, out);
        }
        out.push_str(&encode_text(&segment.text));
        for format in segment.formats.iter().rev() {
            close_tag(element_name(&format.tag), out);
        }
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&self, paragraph: &Paragraph) -> String {
        let element = paragraph.kind().tag_name();
        let mut out = String::new();

        out.push('<');
        out.push_str(element);
        if paragraph.is_empty() {
            if let Some(placeholder) = paragraph.placeholder_text() {
                push_attribute(&mut out, "data-placeholder", placeholder);
            }
            out.push('>');
        } else {
            out.push('>');
            for segment in paragraph.segments() {
                self.render_segment(segment, &mut out);
            }
        }
        close_tag(element, &mut out);
        out
    }
}

fn element_name(tag: &str) -> &'static str {
    match tag {
        "b" => "b",
        "i" => "i",
        "u" => "u",
        "s" => "s",
        "code" => "code",
        "a" => "a",
        _ => "span",
    }
}

fn open_tag(format: &Format, out: &mut String) {
    let element = element_name(&format.tag);
    out.push('<');
    out.push_str(element);

    if element == "span" {
        push_attribute(out, "data-format", &format.tag);
    }
    if element == "a"
        && let Some(href) = format.attrs.as_ref().and_then(|attrs| attrs.get("href"))
    {
        push_attribute(out, "href", href);
    }
    out.push('>');
}

fn close_tag(element: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(element);
    out.push('>');
}

/// Append ` name="value"` with the value escaped
fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}
