use super::*;
use crate::style;

#[test]
fn each_heading_level_gets_its_own_paragraph_style() {
    let result = convert_default("# One\n## Two\n### Three\n#### Four\n##### Five\n###### Six\n");
    let xml = section0_xml(&result.bytes);
    let catalog = style::resolve("default").unwrap();

    for role in [
        style::ParaRole::H1,
        style::ParaRole::H2,
        style::ParaRole::H3,
        style::ParaRole::H4,
        style::ParaRole::H5,
        style::ParaRole::H6,
    ] {
        let needle = format!("paraPrIDRef=\"{}\"", catalog.para_id(role));
        assert!(xml.contains(&needle), "missing paragraph style for {role:?}");
    }
    assert_eq!(xml.matches("<hp:p ").count(), 6);
}

#[test]
fn setext_headings_promote_to_level_one_and_two() {
    let result = convert_default("Title\n=====\n\nSubtitle\n--------\n");
    let xml = section0_xml(&result.bytes);
    let catalog = style::resolve("default").unwrap();
    assert!(xml.contains(&format!("paraPrIDRef=\"{}\"", catalog.para_id(style::ParaRole::H1))));
    assert!(xml.contains(&format!("paraPrIDRef=\"{}\"", catalog.para_id(style::ParaRole::H2))));
}
