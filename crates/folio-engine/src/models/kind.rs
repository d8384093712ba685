use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presentation hint for a paragraph. Carries no formatting logic.
///
/// The serialized form is the element name a renderer would use, which is
/// also the `paragraphType` value of a paragraph record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParagraphKind {
    #[default]
    #[serde(rename = "p")]
    Paragraph,
    #[serde(rename = "h1")]
    MainHeader,
    #[serde(rename = "h2")]
    SecondaryHeader,
    #[serde(rename = "h3")]
    ThirdHeader,
    #[serde(rename = "blockquote")]
    Quote,
    #[serde(rename = "pre")]
    Code,
    #[serde(rename = "figcaption")]
    Caption,
    #[serde(rename = "li")]
    ListItem,
}

impl ParagraphKind {
    pub const ALL: [ParagraphKind; 8] = [
        ParagraphKind::Paragraph,
        ParagraphKind::MainHeader,
        ParagraphKind::SecondaryHeader,
        ParagraphKind::ThirdHeader,
        ParagraphKind::Quote,
        ParagraphKind::Code,
        ParagraphKind::Caption,
        ParagraphKind::ListItem,
    ];

    /// Element name, e.g. `h2` for [`ParagraphKind::SecondaryHeader`]
    pub fn tag_name(self) -> &'static str {
        match self {
            ParagraphKind::Paragraph => "p",
            ParagraphKind::MainHeader => "h1",
            ParagraphKind::SecondaryHeader => "h2",
            ParagraphKind::ThirdHeader => "h3",
            ParagraphKind::Quote => "blockquote",
            ParagraphKind::Code => "pre",
            ParagraphKind::Caption => "figcaption",
            ParagraphKind::ListItem => "li",
        }
    }

    pub fn is_header(self) -> bool {
        matches!(
            self,
            ParagraphKind::MainHeader | ParagraphKind::SecondaryHeader | ParagraphKind::ThirdHeader
        )
    }
}

impl fmt::Display for ParagraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown paragraph type: {0}")]
pub struct UnknownParagraphKind(pub String);

impl FromStr for ParagraphKind {
    type Err = UnknownParagraphKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParagraphKind::ALL
            .into_iter()
            .find(|kind| kind.tag_name() == s)
            .ok_or_else(|| UnknownParagraphKind(s.to_string()))
    }
}
