use super::*;

#[test]
fn referenced_footnote_is_hoisted_and_linked_by_id() {
    let result = convert_default("See the note.[^1]\n\n[^1]: This is the note.\n");
    assert!(result.warnings.is_empty());

    let xml = section0_xml(&result.bytes);
    assert!(xml.contains("footNoteIDRef=\"0\""));
    assert!(xml.contains("<hp:footNote id=\"0\""));
    assert!(xml.contains("This is the note."));
}

#[test]
fn unreferenced_footnote_definition_renders_as_body_text() {
    let result = convert_default("A paragraph with no references.\n\n[^orphan]: Never linked.\n");
    assert!(!result.bytes.is_empty());

    let xml = section0_xml(&result.bytes);
    assert!(!xml.contains("hp:footNote"));
    assert!(xml.contains("Never linked."));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == crate::WarningKind::UnreferencedFootnoteDefinition));
}

#[test]
fn unresolved_reference_falls_back_to_literal_text() {
    let result = convert_default("See[^missing] this.\n");
    let xml = section0_xml(&result.bytes);
    assert!(xml.contains("[^missing]"));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == crate::WarningKind::UnresolvedFootnoteReference));
}
