// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use folio_engine::editing::Format;

#[allow(dead_code)]
pub fn generate_text(words: usize) -> String {
    let base = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur"];
    (0..words)
        .map(|i| base[i % base.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-overlapping bold runs and overlapping italic runs every `step` units
#[allow(dead_code)]
pub fn generate_formats(len: usize, step: usize) -> Vec<Format> {
    let mut formats = Vec::new();
    let mut at = 0;
    while at + step < len {
        formats.push(Format::new("b", at, at + step / 2));
        formats.push(Format::new("i", at + step / 4, at + step - 1));
        at += step;
    }
    formats
}
