//! Inline-to-XML rendering: tracks the active emphasis/strikethrough capability set while
//! descending the inline tree and resolves it to a single character-property role per run,
//! rather than nesting one run inside another per markup layer the way the source marks it up.

use crate::ast::{EmphasisKind, Image, Inline, Link};
use crate::error::WarningKind;
use crate::style::{compose_char_role, CharRole};
use crate::xmltree::Element;

use super::Renderer;

/// The set of active overlays at some point in the inline tree. `forced`, when set, overrides
/// composition entirely — used for link text and footnote markers, which have their own
/// dedicated roles in the catalog rather than composing with surrounding emphasis.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Capability {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub forced: Option<CharRole>,
}

impl Capability {
    fn char_role(self) -> CharRole {
        self.forced.unwrap_or_else(|| compose_char_role(self.bold, self.italic, self.strike))
    }
}

pub(super) fn render_inline_list(r: &mut Renderer, inlines: &[Inline], cap: Capability) -> Vec<Element> {
    let mut out = Vec::new();
    for node in inlines {
        match node {
            Inline::Text(t) => out.push(text_run(r, t, cap.char_role())),
            Inline::InlineCode(t) => out.push(text_run(r, t, CharRole::InlineCode)),
            Inline::Emphasis(e) => {
                let mut next = cap;
                match e.kind {
                    EmphasisKind::Italic => next.italic = true,
                    EmphasisKind::Bold => next.bold = true,
                    EmphasisKind::BoldItalic => {
                        next.bold = true;
                        next.italic = true;
                    }
                }
                out.extend(render_inline_list(r, &e.children, next));
            }
            Inline::Strikethrough(children) => {
                let mut next = cap;
                next.strike = true;
                out.extend(render_inline_list(r, children, next));
            }
            Inline::Link(link) => out.push(render_link(r, link)),
            Inline::Image(image) => out.push(render_image(r, image)),
            Inline::FootnoteReference(label) => out.push(render_footnote_reference(r, label)),
            Inline::HardBreak => out.push(Element::new("hp:lineBreak")),
            Inline::SoftBreak => out.push(text_run(r, " ", cap.char_role())),
        }
    }
    out
}

fn text_run(r: &Renderer, text: &str, role: CharRole) -> Element {
    Element::new("hp:t")
        .attr("charPrIDRef", r.catalog.char_id(role).to_string())
        .text(text.to_string())
}

/// A link renders as a field run group rather than a bare styled text run, so that the href
/// survives into the document independent of how the viewer chooses to display link text.
fn render_link(r: &mut Renderer, link: &Link) -> Element {
    let mut field_begin = Element::new("hp:fieldBegin")
        .attr("type", "HYPERLINK")
        .attr("href", link.href.clone());
    if let Some(title) = &link.title {
        field_begin = field_begin.attr("tooltip", title.clone());
    }

    let mut run = Element::new("hp:run").child(field_begin);
    let cap = Capability {
        forced: Some(CharRole::Link),
        ..Capability::default()
    };
    for child in render_inline_list(r, &link.children, cap) {
        run.push_child(child);
    }
    run.push_child(Element::new("hp:fieldEnd"));
    run
}

/// Without an image resolver, or when the resolver can't find the referenced source, the image
/// is rendered as a placeholder carrying `binaryItemIDRef="0"` plus its alt text as a fallback
/// `<hp:t>`, so the document still reads sensibly in a viewer with no binary data attached.
fn render_image(r: &mut Renderer, image: &Image) -> Element {
    let binary_id = r.resolve_image(&image.src);
    let mut el = Element::new("hp:pic").attr("binaryItemIDRef", binary_id.to_string());
    if let Some(title) = &image.title {
        el = el.attr("tooltip", title.clone());
    }
    el.child(Element::new("hp:t").text(image.alt.clone()))
}

fn render_footnote_reference(r: &mut Renderer, label: &str) -> Element {
    if let Some(&id) = r.footnote_ids.get(label) {
        Element::new("hp:footNoteRef")
            .attr("footNoteIDRef", id.to_string())
            .attr("charPrIDRef", r.catalog.char_id(CharRole::FootnoteRef).to_string())
    } else {
        r.push_warning(
            WarningKind::UnresolvedFootnoteReference,
            format!("footnote reference [^{label}] has no matching definition"),
        );
        Element::new("hp:t").text(format!("[^{label}]"))
    }
}
