//! The converter façade (C6): the one public entry point, orchestrating parse → render →
//! package for a single document. `ConvertOptions` is a typed struct rather than a stringly-keyed
//! map — a collaborator (CLI, HTTP service) sitting on a looser boundary is responsible for
//! translating unrecognized option keys into a [`ConversionError::ConfigError`] before it ever
//! reaches here.

use crate::ast::{Document, Inline};
use crate::error::{ConversionError, Warning};
use crate::package::{self, PackageInput};
use crate::parser;
use crate::render;
use crate::style;

/// How deeply a preview snippet is allowed to run before being cut off; matters only for
/// `Preview/PrvText.txt`, which is a convenience for file managers, not the document itself.
const PREVIEW_MAX_CHARS: usize = 500;

/// An image source resolver: given an `Image` node's `src`, returns the bytes to embed under
/// `BinData/`, or `None` to fall back to the alt-text placeholder.
pub type ImageResolver<'a> = dyn Fn(&str) -> Option<Vec<u8>> + 'a;

pub struct ConvertOptions<'a> {
    pub title: Option<String>,
    pub author: Option<String>,
    pub image_resolver: Option<&'a ImageResolver<'a>>,
    pub base_indent: u32,
}

impl<'a> Default for ConvertOptions<'a> {
    fn default() -> Self {
        ConvertOptions {
            title: None,
            author: None,
            image_resolver: None,
            base_indent: 1_000,
        }
    }
}

pub struct ConvertResult {
    pub bytes: Vec<u8>,
    pub warnings: Vec<Warning>,
}

pub fn convert(source: &[u8], preset_name: &str, options: ConvertOptions) -> Result<ConvertResult, ConversionError> {
    let text = std::str::from_utf8(source)?;
    let catalog = style::resolve(preset_name)?;

    let outcome = parser::parse(text);
    let mut warnings = outcome.warnings;

    let render_output = render::render(
        &outcome.document,
        &catalog,
        options.base_indent,
        options.image_resolver,
        &mut warnings,
    );
    let header_xml = catalog.to_header_xml(&render_output.binaries);

    let preview = preview_text(&outcome.document);
    let preview_text = if preview.is_empty() { None } else { Some(preview.as_str()) };

    let title = options.title.as_deref().unwrap_or("Untitled");
    let author = options.author.as_deref().unwrap_or("");

    let bytes = package::package(PackageInput {
        header_xml: &header_xml,
        section0_xml: &render_output.section0_xml,
        binaries: &render_output.binaries,
        preview_text,
        title,
        author,
    })?;

    Ok(ConvertResult { bytes, warnings })
}

/// A flattened plain-text snippet of the document's first visible characters, for
/// `Preview/PrvText.txt`. Pulled straight from the AST rather than the rendered XML, since it
/// only needs visible text, not markup.
fn preview_text(document: &Document) -> String {
    let mut out = String::new();
    collect_preview_text(&document.blocks, &mut out);
    out.truncate(nearest_char_boundary(&out, PREVIEW_MAX_CHARS));
    out
}

fn nearest_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn collect_preview_text(blocks: &[crate::ast::Block], out: &mut String) {
    use crate::ast::Block;
    for block in blocks {
        if out.len() >= PREVIEW_MAX_CHARS {
            return;
        }
        match block {
            Block::Heading(h) => collect_preview_inlines(&h.content, out),
            Block::Paragraph(inlines) => collect_preview_inlines(inlines, out),
            Block::BulletList(list) => {
                for item in &list.items {
                    collect_preview_text(&item.children, out);
                }
            }
            Block::OrderedList(list) => {
                for item in &list.items {
                    collect_preview_text(&item.children, out);
                }
            }
            Block::BlockQuote(children) => collect_preview_text(children, out),
            Block::CodeBlock(code) => {
                out.push_str(&code.literal);
                out.push(' ');
            }
            Block::Table(_) | Block::ThematicBreak | Block::FootnoteDefinition(_) => {}
        }
    }
}

fn collect_preview_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::InlineCode(t) => {
                out.push_str(t);
                out.push(' ');
            }
            Inline::Emphasis(e) => collect_preview_inlines(&e.children, out),
            Inline::Strikethrough(children) => collect_preview_inlines(children, out),
            Inline::Link(link) => collect_preview_inlines(&link.children, out),
            Inline::Image(image) => {
                out.push_str(&image.alt);
                out.push(' ');
            }
            Inline::FootnoteReference(_) | Inline::HardBreak | Inline::SoftBreak => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_archive_with_no_warnings() {
        let result = convert(b"", "default", ConvertOptions::default()).unwrap();
        assert!(!result.bytes.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unknown_preset_surfaces_config_error() {
        let err = convert(b"# hi", "nonexistent", ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConversionError::ConfigError(_)));
    }

    #[test]
    fn invalid_utf8_surfaces_encoding_error() {
        let err = convert(&[0xff, 0xfe], "default", ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConversionError::EncodingError(_)));
    }

    #[test]
    fn image_resolver_is_consulted_and_embedded() {
        let resolver = |src: &str| -> Option<Vec<u8>> {
            if src == "pic.png" {
                Some(vec![1, 2, 3])
            } else {
                None
            }
        };
        let options = ConvertOptions {
            image_resolver: Some(&resolver),
            ..ConvertOptions::default()
        };
        let result = convert(b"![alt](pic.png)", "default", options).unwrap();
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn preview_text_pulls_from_first_paragraph() {
        let text = preview_text(&parser::parse("hello world").document);
        assert!(text.contains("hello"));
    }
}
