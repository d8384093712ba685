use crate::editing::{Format, FormatIndex, TextBuffer};

/// A maximal run of text sharing one set of active formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub text: String,
    /// Formats covering the whole run, in index order
    pub formats: Vec<Format>,
}

impl Segment {
    pub fn has(&self, tag: &str) -> bool {
        self.formats.iter().any(|f| f.tag == tag)
    }
}

/// Cut `text` at every format boundary and attach the covering formats
pub(crate) fn derive_segments(text: &TextBuffer, formats: &FormatIndex) -> Vec<Segment> {
    let len = text.len();
    if len == 0 {
        return Vec::new();
    }

    let mut cuts: Vec<usize> = formats
        .iter()
        .flat_map(|f| [f.from, f.to])
        .filter(|&offset| offset < len)
        .chain([0, len])
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    cuts.windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            Segment {
                from,
                to,
                text: text.slice(from, to).unwrap_or_default(),
                formats: formats
                    .iter()
                    .filter(|f| f.from <= from && to <= f.to)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
