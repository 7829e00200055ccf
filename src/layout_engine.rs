// src/layout_engine.rs
//! Positions a template's render tree onto pages (or onto one unbounded
//! surface for raster capture).
//!
//! Text measurement uses an approximate character-width model rather than
//! shaped glyph metrics; both renderers use the same model, so line breaks
//! agree between the preview surface and the vector output.

use crate::stylesheet::{Border, ElementStyle, FontStyle, FontWeight, Stylesheet, TextAlign};
use std::collections::HashMap;
use vitae_types::{Color, Margins};

/// Width of an average glyph relative to the font size.
pub const CHAR_WIDTH_RATIO: f32 = 0.6;

pub struct LayoutEngine {
    styles: HashMap<String, ElementStyle>,
    page_width: f32,
    page_height: f32,
    margins: Margins,
    continuous: bool,
    current_page: usize,
    current_y: f32,
    pages: Vec<Page>,
}

#[derive(Debug)]
pub struct Page {
    pub number: usize,
    pub elements: Vec<PositionedElement>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Page { number, elements: Vec::new() }
    }
}

#[derive(Clone, Debug)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
    pub style: ComputedStyle,
}

#[derive(Clone, Debug)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
}

#[derive(Clone, Debug)]
pub struct TextElement {
    pub style_name: Option<String>,
    pub content: String,
    pub lines: Vec<TextLine>,
}

#[derive(Clone, Debug)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct RectElement {
    pub style_name: Option<String>,
}

/// Computed style after cascading a named style onto the defaults.
#[derive(Clone, Debug)]
pub struct ComputedStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub color: Color,
    pub margin: Margins,
    pub padding: Margins,
    pub height: Option<f32>,
    pub background_color: Option<Color>,
    pub border: Option<Border>,
}

impl LayoutEngine {
    /// Engine for paged output (the vector pipeline).
    pub fn new(stylesheet: &Stylesheet, page_size_pt: (f32, f32), margins_pt: Margins) -> Self {
        LayoutEngine {
            styles: stylesheet.styles.clone(),
            page_width: page_size_pt.0,
            page_height: page_size_pt.1,
            margins: margins_pt,
            continuous: false,
            current_page: 0,
            current_y: margins_pt.top,
            pages: vec![Page::new(0)],
        }
    }

    /// Engine for a single unbounded surface (the raster capture target).
    pub fn new_continuous(stylesheet: &Stylesheet, width_pt: f32, margins_pt: Margins) -> Self {
        LayoutEngine {
            styles: stylesheet.styles.clone(),
            page_width: width_pt,
            page_height: f32::MAX,
            margins: margins_pt,
            continuous: true,
            current_page: 0,
            current_y: margins_pt.top,
            pages: vec![Page::new(0)],
        }
    }

    pub fn layout_elements(&mut self, elements: Vec<LayoutElement>) {
        for element in elements {
            self.layout_element(element);
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Natural height of the laid-out content (meaningful in continuous
    /// mode, where everything lands on one surface).
    pub fn content_height(&self) -> f32 {
        self.current_y + self.margins.bottom
    }

    fn layout_element(&mut self, element: LayoutElement) {
        let style_name = match &element {
            LayoutElement::Text(e) => e.style_name.as_deref(),
            LayoutElement::Rectangle(e) => e.style_name.as_deref(),
        };
        let style = self.compute_style(style_name);
        let available_width = self.available_width() - style.margin.left - style.margin.right;

        match element {
            LayoutElement::Text(text) => self.layout_text(text, style, available_width),
            LayoutElement::Rectangle(rect) => self.layout_rectangle(rect, style, available_width),
        }
    }

    fn layout_text(&mut self, text: TextElement, style: ComputedStyle, max_width: f32) {
        let content_width = max_width - style.padding.left - style.padding.right;
        let lines = self.wrap_text(&text.content, &style, content_width);
        let mut line_cursor = 0;

        while line_cursor < lines.len() {
            let first_line_height = style.margin.top
                + style.padding.top
                + style.line_height
                + style.padding.bottom
                + style.margin.bottom;
            if self.needs_page_break(first_line_height) {
                self.new_page();
                continue;
            }

            let available_space = self.page_height - self.current_y - self.margins.bottom;
            let space_for_lines = available_space
                - style.margin.top
                - style.padding.top
                - style.padding.bottom
                - style.margin.bottom;
            let lines_that_fit = if self.continuous {
                lines.len() - line_cursor
            } else {
                (((space_for_lines + 0.001) / style.line_height).floor() as usize).max(1)
            };
            let line_count = (lines.len() - line_cursor).min(lines_that_fit);

            let chunk = &lines[line_cursor..line_cursor + line_count];
            let text_height = chunk.len() as f32 * style.line_height;
            let total_height = text_height + style.padding.top + style.padding.bottom;

            let x = self.margins.left + style.margin.left;
            let y = self.current_y + style.margin.top;

            let positioned = PositionedElement {
                x,
                y,
                width: max_width,
                height: total_height,
                element: LayoutElement::Text(TextElement {
                    style_name: text.style_name.clone(),
                    content: chunk.join("\n"),
                    lines: chunk
                        .iter()
                        .enumerate()
                        .map(|(i, line)| TextLine {
                            text: line.clone(),
                            x: x + style.padding.left,
                            y: y + style.padding.top + (i as f32 * style.line_height),
                            width: content_width,
                            height: style.line_height,
                        })
                        .collect(),
                }),
                style: style.clone(),
            };

            self.add_element(positioned);
            self.current_y += total_height + style.margin.top + style.margin.bottom;
            line_cursor += line_count;

            if line_cursor < lines.len() {
                self.new_page();
            }
        }
    }

    fn layout_rectangle(&mut self, rect: RectElement, style: ComputedStyle, max_width: f32) {
        // Default to a 1pt high rule.
        let height = style.height.unwrap_or(1.0);

        if self.needs_page_break(height + style.margin.top + style.margin.bottom) {
            self.new_page();
        }

        let positioned = PositionedElement {
            x: self.margins.left + style.margin.left,
            y: self.current_y + style.margin.top,
            width: max_width,
            height,
            element: LayoutElement::Rectangle(rect),
            style: style.clone(),
        };

        self.add_element(positioned);
        self.current_y += height + style.margin.top + style.margin.bottom;
    }

    pub fn wrap_text(&self, text: &str, style: &ComputedStyle, max_width: f32) -> Vec<String> {
        if max_width <= 0.0 {
            return text.lines().map(|s| s.to_string()).collect();
        }
        let char_width = style.font_size * CHAR_WIDTH_RATIO;
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut current_line = String::new();
            for word in paragraph.split_whitespace() {
                let test_line = if current_line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current_line, word)
                };
                let line_width = test_line.chars().count() as f32 * char_width;
                if line_width > max_width && !current_line.is_empty() {
                    lines.push(current_line);
                    current_line = word.to_string();
                } else {
                    current_line = test_line;
                }
            }
            if !current_line.is_empty() {
                lines.push(current_line);
            }
        }
        lines
    }

    fn needs_page_break(&self, required_height: f32) -> bool {
        if self.continuous {
            return false;
        }
        let available = self.page_height - self.current_y - self.margins.bottom;
        available < required_height
    }

    fn new_page(&mut self) {
        self.current_page += 1;
        self.pages.push(Page::new(self.current_page));
        self.current_y = self.margins.top;
    }

    fn add_element(&mut self, element: PositionedElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn available_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    pub fn compute_style(&self, style_name: Option<&str>) -> ComputedStyle {
        let mut computed = ComputedStyle {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            line_height: 14.4,
            text_align: TextAlign::Left,
            color: Color::BLACK,
            margin: Margins { top: 0.0, right: 0.0, bottom: 10.0, left: 0.0 },
            padding: Margins::default(),
            height: None,
            background_color: None,
            border: None,
        };

        if let Some(name) = style_name
            && let Some(def) = self.styles.get(name)
        {
            if let Some(ff) = &def.font_family {
                computed.font_family = ff.clone();
            }
            if let Some(fs) = def.font_size {
                computed.font_size = fs;
                if def.line_height.is_none() {
                    computed.line_height = fs * 1.2;
                }
            }
            if let Some(fw) = def.font_weight {
                computed.font_weight = fw;
            }
            if let Some(fs) = def.font_style {
                computed.font_style = fs;
            }
            if let Some(lh) = def.line_height {
                computed.line_height = lh;
            }
            if let Some(ta) = def.text_align {
                computed.text_align = ta;
            }
            if let Some(c) = def.color {
                computed.color = c;
            }
            if let Some(m) = def.margin {
                computed.margin = m;
            }
            if let Some(p) = def.padding {
                computed.padding = p;
            }
            if let Some(h) = def.height {
                computed.height = Some(h);
            }
            if let Some(bg) = def.background_color {
                computed.background_color = Some(bg);
            }
            if let Some(b) = &def.border {
                computed.border = Some(b.clone());
            }
        }
        computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Stylesheet;

    fn text(content: &str) -> LayoutElement {
        LayoutElement::Text(TextElement {
            style_name: None,
            content: content.to_string(),
            lines: Vec::new(),
        })
    }

    #[test]
    fn continuous_mode_never_breaks_pages() {
        let sheet = Stylesheet::default();
        let mut engine = LayoutEngine::new_continuous(&sheet, 500.0, Margins::uniform(10.0));
        let long = "palabra ".repeat(2000);
        engine.layout_elements(vec![text(&long)]);
        assert_eq!(engine.pages().len(), 1);
        assert!(engine.content_height() > 500.0);
    }

    #[test]
    fn paged_mode_overflows_onto_new_pages() {
        let sheet = Stylesheet::default();
        let mut engine = LayoutEngine::new(&sheet, (595.0, 842.0), Margins::uniform(28.0));
        let paragraphs: Vec<LayoutElement> = (0..120)
            .map(|i| text(&format!("Párrafo {} con contenido suficiente para ocupar espacio.", i)))
            .collect();
        engine.layout_elements(paragraphs);
        assert!(engine.pages().len() > 1, "expected overflow, got {} pages", engine.pages().len());
    }

    #[test]
    fn wrap_respects_the_max_width() {
        let sheet = Stylesheet::default();
        let engine = LayoutEngine::new(&sheet, (595.0, 842.0), Margins::default());
        let style = engine.compute_style(None);
        let lines = engine.wrap_text("uno dos tres cuatro cinco seis siete ocho", &style, 80.0);
        assert!(lines.len() > 1);
        let max_chars = (80.0 / (style.font_size * CHAR_WIDTH_RATIO)).floor() as usize;
        for line in &lines {
            assert!(line.chars().count() <= max_chars.max(1), "line too wide: {}", line);
        }
    }
}
