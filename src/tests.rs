//! End-to-end conversion scenarios, one file per feature area under `src/tests/`. Each test
//! drives the full [`crate::convert`] pipeline and inspects the resulting archive, rather than
//! any one stage in isolation — the per-module unit tests already cover those.

mod empty;
mod footnote;
mod headings;
mod task_list;

use std::io::{Cursor, Read};

use crate::{convert, ConvertOptions, ConvertResult};

/// Converts with the default preset and no options, panicking on failure — every scenario here
/// is expected to succeed.
pub(crate) fn convert_default(src: &str) -> ConvertResult {
    convert(src.as_bytes(), "default", ConvertOptions::default()).expect("conversion should succeed")
}

/// Pulls `Contents/section0.xml` back out of a produced archive as a `String`, for assertions
/// against the rendered body.
pub(crate) fn section0_xml(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    let mut file = archive.by_name("Contents/section0.xml").expect("section0.xml present");
    let mut out = String::new();
    file.read_to_string(&mut out).expect("section0.xml is valid UTF-8");
    out
}

pub(crate) fn member_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("archive entry readable").name().to_string())
        .collect()
}

#[test]
fn archive_member_order_matches_layout() {
    let result = convert_default("# Hi\n");
    let names = member_names(&result.bytes);
    assert_eq!(names[0], "mimetype");
    assert_eq!(names[1], "META-INF/container.xml");
    assert_eq!(names[2], "META-INF/manifest.xml");
}
