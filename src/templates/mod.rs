// src/templates/mod.rs
//! Built-in résumé templates.
//!
//! Each template turns a [`Resume`] into a render tree of layout elements
//! whose style names refer to the template's stylesheet bundle. The section
//! strings match the interactive app's output (Spanish headings, template
//! specific "current" labels and link captions).

pub mod ats;
pub mod harvard;

use crate::layout_engine::{LayoutElement, RectElement, TextElement};
use std::fmt;
use std::str::FromStr;
use vitae_types::Resume;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Ats,
    Harvard,
}

impl TemplateKind {
    /// Canonical identifier, as accepted on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            TemplateKind::Ats => "ATS",
            TemplateKind::Harvard => "Harvard",
        }
    }

    /// File-system slug used for the stylesheet bundle and default output
    /// name.
    pub fn slug(&self) -> &'static str {
        match self {
            TemplateKind::Ats => "ats",
            TemplateKind::Harvard => "harvard",
        }
    }

    pub fn all() -> [TemplateKind; 2] {
        [TemplateKind::Ats, TemplateKind::Harvard]
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ats" => Ok(TemplateKind::Ats),
            "harvard" => Ok(TemplateKind::Harvard),
            _ => Err(r#"template must be "ATS" or "Harvard""#.to_string()),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Registry metadata describing a template to UI layers.
pub struct TemplateInfo {
    pub kind: TemplateKind,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub ideal_for: &'static [&'static str],
}

pub fn registry() -> &'static [TemplateInfo] {
    const REGISTRY: &[TemplateInfo] = &[
        TemplateInfo {
            kind: TemplateKind::Ats,
            name: "ATS-Friendly",
            description: "Diseño limpio y simple optimizado para sistemas de seguimiento de \
                          candidatos. Sin elementos que puedan confundir los parsers.",
            tags: &["ats", "minimalista", "corporativo", "parser-friendly"],
            ideal_for: &[
                "Aplicaciones a grandes corporaciones",
                "Sector público",
                "Posiciones donde el ATS filtra primero",
            ],
        },
        TemplateInfo {
            kind: TemplateKind::Harvard,
            name: "Harvard Style",
            description: "Diseño elegante inspirado en el formato de Harvard Business School. \
                          Tipografía serif sofisticada y énfasis en logros.",
            tags: &["elegante", "ejecutivo", "consultoría", "mba"],
            ideal_for: &[
                "Sector financiero y consultoría",
                "Posiciones ejecutivas",
                "Mercado anglosajón",
            ],
        },
    ];
    REGISTRY
}

pub fn info(kind: TemplateKind) -> &'static TemplateInfo {
    registry()
        .iter()
        .find(|t| t.kind == kind)
        .expect("every template kind is registered")
}

/// Build the render tree for a résumé with the given template.
pub fn build_elements(kind: TemplateKind, resume: &Resume) -> Vec<LayoutElement> {
    match kind {
        TemplateKind::Ats => ats::build(resume),
        TemplateKind::Harvard => harvard::build(resume),
    }
}

pub(crate) fn text(content: impl AsRef<str>, style: &str) -> LayoutElement {
    LayoutElement::Text(TextElement {
        style_name: Some(style.to_string()),
        content: content.as_ref().to_string(),
        lines: Vec::new(),
    })
}

pub(crate) fn rule(style: &str) -> LayoutElement {
    LayoutElement::Rectangle(RectElement { style_name: Some(style.to_string()) })
}
