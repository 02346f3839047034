//! Static OWPML/OCF template parts: the container manifest, the package manifest, the OPF-style
//! content document, and the two minimal stubs HWPX expects even when a document uses neither
//! feature.

use crate::xmltree::Element;

pub(super) fn container_xml() -> String {
    Element::new("ocf:container")
        .attr("xmlns:ocf", "urn:oasis:names:tc:opendocument:xmlns:container")
        .attr("version", "1.0")
        .child(
            Element::new("ocf:rootfiles").child(
                Element::new("ocf:rootfile")
                    .attr("full-path", "Contents/content.hpf")
                    .attr("media-type", "application/hwpml-package+xml"),
            ),
        )
        .to_document_string()
}

pub(super) struct ManifestEntry {
    pub path: String,
    pub media_type: &'static str,
}

pub(super) fn manifest_xml(entries: &[ManifestEntry]) -> String {
    let mut el = Element::new("odf:manifest").attr("xmlns:odf", "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0");
    for entry in entries {
        el.push_child(
            Element::new("odf:file-entry")
                .attr("full-path", entry.path.clone())
                .attr("media-type", entry.media_type),
        );
    }
    el.to_document_string()
}

pub(super) fn content_hpf(title: &str, author: &str) -> String {
    Element::new("op:package")
        .attr("xmlns:op", "http://www.idpf.org/2007/opf")
        .attr("version", "1.0")
        .child(
            Element::new("op:metadata")
                .child(Element::new("op:Title").text(title.to_string()))
                .child(Element::new("op:Creator").text(author.to_string()))
                .child(Element::new("op:Subject").text(title.to_string())),
        )
        .child(Element::new("op:spine").child(Element::new("op:itemref").attr("idref", "section0")))
        .to_document_string()
}

pub(super) fn settings_xml() -> String {
    Element::new("ha:settings")
        .attr("xmlns:ha", "http://www.hancom.co.kr/hwpml/2011/app")
        .to_document_string()
}

pub(super) fn scripts_xml() -> String {
    Element::new("hp:scripts")
        .attr("xmlns:hp", "http://www.hancom.co.kr/hwpml/2011/paragraph")
        .to_document_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_references_content_hpf() {
        assert!(container_xml().contains("Contents/content.hpf"));
    }

    #[test]
    fn manifest_lists_every_entry() {
        let entries = vec![
            ManifestEntry {
                path: "Contents/header.xml".to_string(),
                media_type: "application/xml",
            },
            ManifestEntry {
                path: "BinData/image1.bin".to_string(),
                media_type: "application/octet-stream",
            },
        ];
        let xml = manifest_xml(&entries);
        assert_eq!(xml.matches("<odf:file-entry ").count(), 2);
    }

    #[test]
    fn content_hpf_carries_title_and_author() {
        let xml = content_hpf("My Title", "Jane Doe");
        assert!(xml.contains("<op:Title>My Title</op:Title>"));
        assert!(xml.contains("<op:Creator>Jane Doe</op:Creator>"));
    }
}
