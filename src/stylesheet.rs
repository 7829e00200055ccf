// src/stylesheet.rs
//! Template stylesheets.
//!
//! A template ships as a compiled JSON bundle (one file per template under
//! the build directory) holding the page setup and the named styles its
//! render tree refers to. All lengths are PostScript points unless a field
//! says otherwise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vitae_types::{Color, Margins, PageFormat};

pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stylesheet {
    pub page: PageLayout,
    #[serde(default)]
    pub styles: HashMap<String, ElementStyle>,
}

impl Stylesheet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Stylesheet { page: PageLayout::default(), styles: HashMap::new() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub title: Option<String>,
    /// Page format declared by the template. When present it is preferred
    /// over the format configured on the export invocation.
    #[serde(default)]
    pub size: Option<PageFormat>,
    /// Page margins in points. When absent, the invocation's margins apply.
    #[serde(default)]
    pub margins: Option<Margins>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub line_height: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub color: Option<Color>,
    pub margin: Option<Margins>,
    pub padding: Option<Margins>,
    pub height: Option<f32>,
    pub background_color: Option<Color>,
    pub border: Option<Border>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Border {
    pub width: f32,
    #[serde(default)]
    pub style: BorderStyle,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_bundle() {
        let sheet = Stylesheet::from_json(
            r##"{
                "page": { "title": "Currículum", "size": "A4" },
                "styles": {
                    "name": { "font_size": 24.0, "font_weight": "Bold" },
                    "rule": { "height": 2.0, "background_color": "#8b0000" }
                }
            }"##,
        )
        .unwrap();
        assert_eq!(sheet.page.size, Some(PageFormat::A4));
        assert_eq!(sheet.styles["name"].font_weight, Some(FontWeight::Bold));
    }

    #[test]
    fn page_size_is_optional() {
        let sheet = Stylesheet::from_json(r#"{ "page": {} }"#).unwrap();
        assert!(sheet.page.size.is_none());
        assert!(sheet.page.margins.is_none());
    }
}
