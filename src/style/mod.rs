//! The Style Catalog: resolves a named preset to a fixed palette of character, paragraph,
//! style, border-fill, and numbering IDs, and can render itself out as `header.xml`.
//!
//! IDs are assigned in role-declaration order, per table, starting at 0 — each table is its own
//! ID space (OWPML references character properties, paragraph properties, styles, border-fills,
//! and numberings through distinct `*IDRef` attributes), matching how the format's own element
//! types partition their ID spaces.

use rustc_hash::FxHashMap;

use crate::error::ConversionError;
use crate::xmltree::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharRole {
    Default,
    Bold,
    Italic,
    BoldItalic,
    Strike,
    InlineCode,
    Link,
    FootnoteRef,
}

pub const CHAR_ROLES: [CharRole; 8] = [
    CharRole::Default,
    CharRole::Bold,
    CharRole::Italic,
    CharRole::BoldItalic,
    CharRole::Strike,
    CharRole::InlineCode,
    CharRole::Link,
    CharRole::FootnoteRef,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParaRole {
    Body,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    CodeBlock,
    BlockQuote,
    ListItem,
    TableCell,
    FootnoteDef,
    Hr,
}

pub const PARA_ROLES: [ParaRole; 13] = [
    ParaRole::Body,
    ParaRole::H1,
    ParaRole::H2,
    ParaRole::H3,
    ParaRole::H4,
    ParaRole::H5,
    ParaRole::H6,
    ParaRole::CodeBlock,
    ParaRole::BlockQuote,
    ParaRole::ListItem,
    ParaRole::TableCell,
    ParaRole::FootnoteDef,
    ParaRole::Hr,
];

impl ParaRole {
    pub fn heading(level: u8) -> ParaRole {
        match level {
            1 => ParaRole::H1,
            2 => ParaRole::H2,
            3 => ParaRole::H3,
            4 => ParaRole::H4,
            5 => ParaRole::H5,
            _ => ParaRole::H6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderFillRole {
    HrBorder,
    TableBorder,
}

pub const BORDER_FILL_ROLES: [BorderFillRole; 2] = [BorderFillRole::HrBorder, BorderFillRole::TableBorder];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberingRole {
    Ordered,
    Bullet,
    TaskChecked,
    TaskUnchecked,
}

pub const NUMBERING_ROLES: [NumberingRole; 4] = [
    NumberingRole::Ordered,
    NumberingRole::Bullet,
    NumberingRole::TaskChecked,
    NumberingRole::TaskUnchecked,
];

/// Resolves a capability set (the union of active character styles at a point in the inline
/// tree) to the single role that represents it. Nested emphasis composes here rather than by
/// nesting run nodes: bold containing italic and italic containing bold both resolve to the
/// same `BoldItalic` role.
pub fn compose_char_role(bold: bool, italic: bool, strike: bool) -> CharRole {
    match (bold, italic, strike) {
        (_, _, true) => CharRole::Strike,
        (true, true, false) => CharRole::BoldItalic,
        (true, false, false) => CharRole::Bold,
        (false, true, false) => CharRole::Italic,
        (false, false, false) => CharRole::Default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    Academic,
    Business,
    Minimal,
}

impl Preset {
    pub fn parse(name: &str) -> Result<Preset, ConversionError> {
        match name {
            "default" => Ok(Preset::Default),
            "academic" => Ok(Preset::Academic),
            "business" => Ok(Preset::Business),
            "minimal" => Ok(Preset::Minimal),
            other => Err(ConversionError::ConfigError(format!("unknown style preset '{other}'"))),
        }
    }

    fn typography(self) -> Typography {
        match self {
            Preset::Default => Typography {
                font_family: "Malgun Gothic",
                font_size_pt: 10,
                line_spacing_pct: 160,
            },
            Preset::Academic => Typography {
                font_family: "Batang",
                font_size_pt: 11,
                line_spacing_pct: 180,
            },
            Preset::Business => Typography {
                font_family: "Gulim",
                font_size_pt: 10,
                line_spacing_pct: 150,
            },
            Preset::Minimal => Typography {
                font_family: "Noto Sans CJK KR",
                font_size_pt: 9,
                line_spacing_pct: 130,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Typography {
    font_family: &'static str,
    font_size_pt: u32,
    line_spacing_pct: u32,
}

/// A resolved, immutable style palette for one conversion.
pub struct Catalog {
    preset: Preset,
    typography: Typography,
    char_ids: FxHashMap<CharRole, u32>,
    para_ids: FxHashMap<ParaRole, u32>,
    style_ids: FxHashMap<ParaRole, u32>,
    border_fill_ids: FxHashMap<BorderFillRole, u32>,
    numbering_ids: FxHashMap<NumberingRole, u32>,
}

fn index_roles<R: Copy + Eq + std::hash::Hash>(roles: &[R]) -> FxHashMap<R, u32> {
    roles.iter().enumerate().map(|(i, &r)| (r, i as u32)).collect()
}

pub fn resolve(preset_name: &str) -> Result<Catalog, ConversionError> {
    let preset = Preset::parse(preset_name)?;
    Ok(Catalog {
        preset,
        typography: preset.typography(),
        char_ids: index_roles(&CHAR_ROLES),
        para_ids: index_roles(&PARA_ROLES),
        style_ids: index_roles(&PARA_ROLES),
        border_fill_ids: index_roles(&BORDER_FILL_ROLES),
        numbering_ids: index_roles(&NUMBERING_ROLES),
    })
}

impl Catalog {
    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn char_id(&self, role: CharRole) -> u32 {
        self.char_ids[&role]
    }

    pub fn para_id(&self, role: ParaRole) -> u32 {
        self.para_ids[&role]
    }

    pub fn style_id(&self, role: ParaRole) -> u32 {
        self.style_ids[&role]
    }

    pub fn border_fill_id(&self, role: BorderFillRole) -> u32 {
        self.border_fill_ids[&role]
    }

    pub fn numbering_id(&self, role: NumberingRole) -> u32 {
        self.numbering_ids[&role]
    }

    /// Renders this catalog's full palette as `Contents/header.xml`. `binaries` lists the
    /// binary items (by allocated ID) the renderer collected from resolved images, so the
    /// `binDataList` enumerates exactly what `BinData/` holds — nothing more, nothing less.
    pub fn to_header_xml(&self, binaries: &[(u32, Vec<u8>)]) -> String {
        Element::new("hh:head")
            .attr("xmlns:hh", "http://www.hancom.co.kr/hwpml/2011/head")
            .attr("xmlns:hp", "http://www.hancom.co.kr/hwpml/2011/paragraph")
            .attr("version", "1.0")
            .attr("secCnt", "1")
            .child(self.fontfaces_element())
            .child(self.border_fills_element())
            .child(self.char_properties_element())
            .child(self.para_properties_element())
            .child(self.styles_element())
            .child(self.numberings_element())
            .child(self.bin_data_list_element(binaries))
            .to_document_string()
    }

    fn bin_data_list_element(&self, binaries: &[(u32, Vec<u8>)]) -> Element {
        let mut el = Element::new("hh:binDataList");
        for (id, _) in binaries {
            el.push_child(
                Element::new("hh:binData")
                    .attr("id", id.to_string())
                    .attr("path", format!("BinData/image{id}.bin")),
            );
        }
        el
    }

    fn fontfaces_element(&self) -> Element {
        Element::new("hh:fontfaces").child(
            Element::new("hh:fontface")
                .attr("id", "0")
                .attr("name", self.typography.font_family),
        )
    }

    fn border_fills_element(&self) -> Element {
        let mut el = Element::new("hh:borderFills");
        for role in BORDER_FILL_ROLES {
            el.push_child(
                Element::new("hh:borderFill")
                    .attr("id", self.border_fill_ids[&role].to_string())
                    .attr("role", format!("{role:?}")),
            );
        }
        el
    }

    fn char_properties_element(&self) -> Element {
        let mut el = Element::new("hh:charProperties");
        let height = self.typography.font_size_pt * 100;
        for role in CHAR_ROLES {
            el.push_child(
                Element::new("hh:charPr")
                    .attr("id", self.char_ids[&role].to_string())
                    .attr("height", height.to_string())
                    .attr("textColor", "#000000")
                    .attr("fontRef", "0")
                    .attr("bold", bool_attr(matches!(role, CharRole::Bold | CharRole::BoldItalic)))
                    .attr("italic", bool_attr(matches!(role, CharRole::Italic | CharRole::BoldItalic)))
                    .attr("strikeout", bool_attr(matches!(role, CharRole::Strike)))
                    .attr("underline", bool_attr(matches!(role, CharRole::Link))),
            );
        }
        el
    }

    fn para_properties_element(&self) -> Element {
        let mut el = Element::new("hh:paraProperties");
        for role in PARA_ROLES {
            let align = if role == ParaRole::Hr { "center" } else { "left" };
            let mut pp = Element::new("hh:paraPr")
                .attr("id", self.para_ids[&role].to_string())
                .attr("align", align)
                .attr("lineSpacing", self.typography.line_spacing_pct.to_string());
            if role == ParaRole::Hr {
                pp = pp.attr(
                    "borderFillIDRef",
                    self.border_fill_ids[&BorderFillRole::HrBorder].to_string(),
                );
            }
            el.push_child(pp);
        }
        el
    }

    fn styles_element(&self) -> Element {
        let mut el = Element::new("hh:styles");
        for role in PARA_ROLES {
            el.push_child(
                Element::new("hh:style")
                    .attr("id", self.style_ids[&role].to_string())
                    .attr("name", format!("{role:?}"))
                    .attr("paraPrIDRef", self.para_ids[&role].to_string())
                    .attr("charPrIDRef", self.char_ids[&CharRole::Default].to_string()),
            );
        }
        el
    }

    fn numberings_element(&self) -> Element {
        let mut el = Element::new("hh:numberings");
        for role in NUMBERING_ROLES {
            let format = match role {
                NumberingRole::Ordered => "DIGIT",
                _ => "BULLET",
            };
            let bullet_char = match role {
                NumberingRole::Bullet => Some("\u{2022}"),
                NumberingRole::TaskChecked => Some("\u{2611}"),
                NumberingRole::TaskUnchecked => Some("\u{2610}"),
                NumberingRole::Ordered => None,
            };
            let mut para_head = Element::new("hh:paraHead").attr("level", "1").attr("numFormat", format);
            if let Some(c) = bullet_char {
                para_head = para_head.attr("char", c);
            }
            el.push_child(
                Element::new("hh:numbering")
                    .attr("id", self.numbering_ids[&role].to_string())
                    .child(para_head),
            );
        }
        el
    }
}

fn bool_attr(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preset_is_config_error() {
        assert!(matches!(resolve("nonexistent"), Err(ConversionError::ConfigError(_))));
    }

    #[test]
    fn role_ids_are_declaration_ordered() {
        let catalog = resolve("default").unwrap();
        assert_eq!(catalog.char_id(CharRole::Default), 0);
        assert_eq!(catalog.char_id(CharRole::Bold), 1);
        assert_eq!(catalog.para_id(ParaRole::Body), 0);
        assert_eq!(catalog.para_id(ParaRole::H1), 1);
    }

    #[test]
    fn emphasis_composition() {
        assert_eq!(compose_char_role(true, true, false), CharRole::BoldItalic);
        assert_eq!(compose_char_role(true, false, false), CharRole::Bold);
        assert_eq!(compose_char_role(false, false, true), CharRole::Strike);
        assert_eq!(compose_char_role(false, false, false), CharRole::Default);
    }

    #[test]
    fn header_xml_declares_every_role_once() {
        let catalog = resolve("academic").unwrap();
        let xml = catalog.to_header_xml(&[(1, vec![0u8])]);
        assert_eq!(xml.matches("<hh:charPr ").count(), CHAR_ROLES.len());
        assert_eq!(xml.matches("<hh:paraPr ").count(), PARA_ROLES.len());
        assert_eq!(xml.matches("<hh:style ").count(), PARA_ROLES.len());
        assert_eq!(xml.matches("<hh:numbering ").count(), NUMBERING_ROLES.len());
        assert_eq!(xml.matches("<hh:binData ").count(), 1);
    }

    #[test]
    fn heading_role_mapping() {
        assert_eq!(ParaRole::heading(1), ParaRole::H1);
        assert_eq!(ParaRole::heading(6), ParaRole::H6);
        assert_eq!(ParaRole::heading(9), ParaRole::H6);
    }
}
