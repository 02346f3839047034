//! The packager (C5): assembles the rendered XML parts and any resolved images into an
//! in-memory ZIP-based `.hwpx` archive, in the exact member order the format requires —
//! `mimetype` stored uncompressed first, everything else deflated.

mod parts;

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ConversionError;

const MIMETYPE: &str = "application/hwp+zip";

pub struct PackageInput<'a> {
    pub header_xml: &'a str,
    pub section0_xml: &'a str,
    pub binaries: &'a [(u32, Vec<u8>)],
    pub preview_text: Option<&'a str>,
    pub title: &'a str,
    pub author: &'a str,
}

pub fn package(input: PackageInput) -> Result<Vec<u8>, ConversionError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    write_entry(&mut zip, "mimetype", MIMETYPE.as_bytes(), stored)?;
    write_entry(&mut zip, "META-INF/container.xml", parts::container_xml().as_bytes(), deflated)?;
    write_entry(
        &mut zip,
        "META-INF/manifest.xml",
        manifest_for(&input).as_bytes(),
        deflated,
    )?;
    write_entry(
        &mut zip,
        "Contents/content.hpf",
        parts::content_hpf(input.title, input.author).as_bytes(),
        deflated,
    )?;
    write_entry(&mut zip, "Contents/header.xml", input.header_xml.as_bytes(), deflated)?;
    write_entry(&mut zip, "Contents/section0.xml", input.section0_xml.as_bytes(), deflated)?;

    for (id, bytes) in input.binaries {
        write_entry(&mut zip, &format!("BinData/image{id}.bin"), bytes, deflated)?;
    }

    if let Some(text) = input.preview_text {
        write_entry(&mut zip, "Preview/PrvText.txt", text.as_bytes(), deflated)?;
    }

    write_entry(&mut zip, "settings.xml", parts::settings_xml().as_bytes(), deflated)?;
    write_entry(&mut zip, "scripts.xml", parts::scripts_xml().as_bytes(), deflated)?;

    let cursor = zip
        .finish()
        .map_err(|e| ConversionError::InternalError(format!("failed to finalize archive: {e}")))?;
    Ok(cursor.into_inner())
}

fn manifest_for(input: &PackageInput) -> String {
    let mut entries = vec![
        parts::ManifestEntry {
            path: "Contents/content.hpf".to_string(),
            media_type: "application/hwpml-package+xml",
        },
        parts::ManifestEntry {
            path: "Contents/header.xml".to_string(),
            media_type: "application/xml",
        },
        parts::ManifestEntry {
            path: "Contents/section0.xml".to_string(),
            media_type: "application/xml",
        },
    ];
    for (id, _) in input.binaries {
        entries.push(parts::ManifestEntry {
            path: format!("BinData/image{id}.bin"),
            media_type: "application/octet-stream",
        });
    }
    if input.preview_text.is_some() {
        entries.push(parts::ManifestEntry {
            path: "Preview/PrvText.txt".to_string(),
            media_type: "text/plain",
        });
    }
    entries.push(parts::ManifestEntry {
        path: "settings.xml".to_string(),
        media_type: "application/xml",
    });
    entries.push(parts::ManifestEntry {
        path: "scripts.xml".to_string(),
        media_type: "application/xml",
    });
    parts::manifest_xml(&entries)
}

fn write_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
    opts: SimpleFileOptions,
) -> Result<(), ConversionError> {
    zip.start_file(name, opts)
        .map_err(|e| ConversionError::InternalError(format!("failed to start archive entry '{name}': {e}")))?;
    zip.write_all(bytes)
        .map_err(|e| ConversionError::InternalError(format!("failed to write archive entry '{name}': {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(binaries: &[(u32, Vec<u8>)], preview_text: Option<&str>) -> Vec<u8> {
        package(PackageInput {
            header_xml: "<hh:head/>",
            section0_xml: "<hs:sec/>",
            binaries,
            preview_text,
            title: "t",
            author: "a",
        })
        .unwrap()
    }

    #[test]
    fn mimetype_is_first_entry_stored_uncompressed() {
        let bytes = sample(&[], None);
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mimetype = archive.by_index(0).unwrap();
        assert_eq!(mimetype.name(), "mimetype");
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn archive_contains_every_fixed_member() {
        let bytes = sample(&[(1, vec![0u8, 1, 2])], Some("hello"));
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        for expected in [
            "mimetype",
            "META-INF/container.xml",
            "META-INF/manifest.xml",
            "Contents/content.hpf",
            "Contents/header.xml",
            "Contents/section0.xml",
            "BinData/image1.bin",
            "Preview/PrvText.txt",
            "settings.xml",
            "scripts.xml",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn preview_omitted_when_absent() {
        let bytes = sample(&[], None);
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(!names.iter().any(|n| n.starts_with("Preview/")));
    }
}
