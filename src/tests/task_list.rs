use super::*;
use crate::style::{self, NumberingRole};

#[test]
fn task_list_items_get_checked_and_unchecked_numbering() {
    let result = convert_default("- [x] Done\n- [ ] Not done\n- Plain bullet\n");
    let xml = section0_xml(&result.bytes);
    let catalog = style::resolve("default").unwrap();

    assert!(xml.contains(&format!(
        "numberingIDRef=\"{}\"",
        catalog.numbering_id(NumberingRole::TaskChecked)
    )));
    assert!(xml.contains(&format!(
        "numberingIDRef=\"{}\"",
        catalog.numbering_id(NumberingRole::TaskUnchecked)
    )));
    assert!(xml.contains(&format!(
        "numberingIDRef=\"{}\"",
        catalog.numbering_id(NumberingRole::Bullet)
    )));
}

#[test]
fn ordered_list_items_share_one_numbering_role() {
    let result = convert_default("1. First\n2. Second\n3. Third\n");
    let xml = section0_xml(&result.bytes);
    let catalog = style::resolve("default").unwrap();
    let needle = format!("numberingIDRef=\"{}\"", catalog.numbering_id(NumberingRole::Ordered));
    assert_eq!(xml.matches(&needle as &str).count(), 3);
}
