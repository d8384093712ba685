use folio_engine::editing::{
    Format, OpPair, Paragraph, Section, UpdateAttrs, UpdateHints,
};
use folio_engine::models::{ComponentId, ParagraphKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A section holding one formatted paragraph, as edits start from
fn fixture() -> Section {
    let mut section = Section::new("main");
    let p = Paragraph::with_id(ComponentId::from("p1"), "The quick brown fox")
        .with_kind(ParagraphKind::Quote)
        .with_placeholder(Some("Quote".to_string()))
        .with_formats(vec![
            Format::new("b", 4, 9),
            Format::new("a", 10, 15).with_attr("href", "https://example.com"),
        ])
        .unwrap();
    section.insert(0, p).unwrap();
    section
        .insert(
            1,
            Paragraph::with_id(ComponentId::from("p2"), "jumps over")
                .with_formats(vec![
                    Format::new("b", 0, 6),
                    Format::new("i", 2, 3),
                    Format::new("u", 8, 10),
                ])
                .unwrap(),
        )
        .unwrap();
    section
}

fn records(section: &Section) -> Vec<folio_engine::ParagraphRecord> {
    section.paragraphs().iter().map(Paragraph::to_record).collect()
}

/// Serialize and parse back, as an external op log would
fn through_json(ops: &[OpPair]) -> Vec<OpPair> {
    let json = serde_json::to_string(ops).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn edit(name: &str, section: &mut Section) -> Vec<OpPair> {
    // Bold over a span that also holds italic or underline
    let mixed = match name {
        "bold_mixed_equal" => Some(Format::new("b", 0, 6)),
        "bold_mixed_interior" => Some(Format::new("b", 1, 4)),
        "bold_mixed_edge" => Some(Format::new("b", 0, 3)),
        "bold_mixed_partial" => Some(Format::new("b", 4, 9)),
        _ => None,
    };
    if let Some(format) = mixed {
        let p = section.get_mut(&ComponentId::from("p2")).unwrap();
        return p.apply_format(format).unwrap();
    }

    let id = ComponentId::from("p1");
    if name == "delete" {
        return section.remove(&id).unwrap().1;
    }

    let p = section.get_mut(&id).unwrap();
    match name {
        "insert" => p.insert_chars(4, "very ").unwrap(),
        "remove_inside" => p.remove_chars(5, 2).unwrap(),
        "remove_across" => p.remove_chars(8, 4).unwrap(),
        "bold" => p.apply_format(Format::new("b", 0, 3)).unwrap(),
        "unbold" => p.apply_format(Format::new("b", 4, 9)).unwrap(),
        "split" => p.apply_format(Format::new("b", 5, 7)).unwrap(),
        "mixed" => p.apply_format(Format::new("i", 2, 12)).unwrap(),
        "relink" => p
            .apply_format(Format::new("a", 10, 15).with_attr("href", "/elsewhere"))
            .unwrap(),
        "kind" => p
            .update(
                UpdateAttrs::paragraph_type(ParagraphKind::MainHeader),
                UpdateHints::default(),
            )
            .unwrap(),
        "placeholder" => p
            .update(UpdateAttrs::placeholder_text(None), UpdateHints::default())
            .unwrap(),
        other => panic!("unknown edit {other}"),
    }
}

#[rstest]
#[case("insert")]
#[case("remove_inside")]
#[case("remove_across")]
#[case("bold")]
#[case("unbold")]
#[case("split")]
#[case("mixed")]
#[case("bold_mixed_equal")]
#[case("bold_mixed_interior")]
#[case("bold_mixed_edge")]
#[case("bold_mixed_partial")]
#[case("relink")]
#[case("kind")]
#[case("placeholder")]
#[case("delete")]
fn undo_restores_and_redo_reapplies(#[case] name: &str) {
    let mut section = fixture();
    let before = records(&section);

    let ops = edit(name, &mut section);
    let after = records(&section);
    let ops = through_json(&ops);

    section.undo(&ops).unwrap();
    assert_eq!(records(&section), before);

    section.redo(&ops).unwrap();
    assert_eq!(records(&section), after);
}

#[test]
fn placeholder_is_restored_by_undo() {
    let mut section = fixture();
    let ops = edit("placeholder", &mut section);
    let id = ComponentId::from("p1");
    assert_eq!(section.get(&id).unwrap().placeholder_text(), None);

    section.undo(&through_json(&ops)).unwrap();
    assert_eq!(section.get(&id).unwrap().placeholder_text(), Some("Quote"));
}

#[test]
fn long_history_unwinds_to_the_start() {
    let mut section = fixture();
    let before = records(&section);

    let mut history = Vec::new();
    for name in ["insert", "bold", "remove_across", "mixed", "kind"] {
        history.extend(edit(name, &mut section));
    }
    let (_, deleted) = section.remove(&ComponentId::from("p2")).unwrap();
    history.extend(deleted);

    section.undo(&history).unwrap();
    assert_eq!(records(&section), before);
}

#[rstest]
#[case("bold_mixed_equal", vec![Format::new("b", 0, 6), Format::new("i", 2, 3), Format::new("u", 8, 10)])]
#[case("bold_mixed_interior", vec![Format::new("b", 0, 6), Format::new("i", 2, 3), Format::new("u", 8, 10)])]
#[case("bold_mixed_edge", vec![Format::new("b", 0, 6), Format::new("i", 2, 3), Format::new("u", 8, 10)])]
#[case("bold_mixed_partial", vec![Format::new("i", 2, 3), Format::new("b", 4, 9), Format::new("u", 8, 10)])]
fn bold_over_mixed_span_is_cleared_and_reapplied(
    #[case] name: &str,
    #[case] expected: Vec<Format>,
) {
    let mut section = fixture();
    edit(name, &mut section);
    let p2 = section.get(&ComponentId::from("p2")).unwrap();
    assert_eq!(p2.formats().to_vec(), expected);
}
