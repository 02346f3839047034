use super::*;

#[test]
fn empty_input_has_exactly_one_empty_body_paragraph_and_no_warnings() {
    let result = convert_default("");
    assert!(result.warnings.is_empty());

    let xml = section0_xml(&result.bytes);
    assert_eq!(xml.matches("<hp:p ").count(), 1);
    assert!(xml.contains("<hp:p id=\"0\""));
}
