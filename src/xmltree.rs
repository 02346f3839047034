//! A minimal, generic XML element tree with deterministic serialization.
//!
//! Every OWPML part this crate emits (`header.xml`, `section0.xml`, `content.hpf`, and the
//! static template parts) is built as one of these trees and serialized through
//! [`Element::to_document_string`]. Attributes are sorted by name at serialization time — not at
//! construction time, so callers can still push them in whatever order reads best — which is
//! what makes byte-identical output a property of the writer rather than something callers have
//! to maintain by convention.

/// An XML element: a tag name, an unordered bag of attributes, and ordered children.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Node {
        Node::Element(e)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(mut self, s: impl Into<String>) -> Self {
        self.children.push(Node::Text(s.into()));
        self
    }

    pub fn push_child(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn serialize(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);

        let mut sorted_attrs = self.attrs.clone();
        sorted_attrs.sort_by(|a, b| a.0.cmp(&b.0));
        for (k, v) in &sorted_attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(e) => e.serialize(out),
                Node::Text(t) => out.push_str(&escape(t)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serializes with the standard OWPML XML declaration prefixed.
    pub fn to_document_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        self.serialize(&mut out);
        out
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_attributes_regardless_of_push_order() {
        let el = Element::new("x").attr("zeta", "1").attr("alpha", "2");
        let mut out = String::new();
        el.serialize(&mut out);
        assert_eq!(out, "<x alpha=\"2\" zeta=\"1\"/>");
    }

    #[test]
    fn self_closes_childless_elements() {
        let el = Element::new("hp:lineBreak");
        let mut out = String::new();
        el.serialize(&mut out);
        assert_eq!(out, "<hp:lineBreak/>");
    }

    #[test]
    fn escapes_text_and_attributes() {
        let el = Element::new("hp:t").attr("k", "a<b").text("x & y");
        let mut out = String::new();
        el.serialize(&mut out);
        assert_eq!(out, "<hp:t k=\"a&lt;b\">x &amp; y</hp:t>");
    }

    #[test]
    fn document_string_has_declaration() {
        let doc = Element::new("root").to_document_string();
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n"));
    }
}
