// src/pdf_renderer.rs
//! Vector PDF assembly: draws laid-out pages as native text and graphics
//! operations, so the batch exporter's output stays selectable and sharp at
//! any zoom. Backgrounds are always painted (the equivalent of printing with
//! background graphics enabled).

use crate::error::ExportError;
use crate::fonts::{FontError, FontLibrary};
use crate::layout_engine::{CHAR_WIDTH_RATIO, LayoutElement, Page, PositionedElement, TextElement};
use crate::stylesheet::{Border, BorderStyle, FontStyle, FontWeight, TextAlign};
use printpdf::font::ParsedFont;
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::{
    FontId, Layer, LineDashPattern, PdfConformance, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb,
};
use std::collections::HashMap;
use vitae_types::Color;

pub struct PdfRenderer<'a> {
    document: PdfDocument,
    library: &'a FontLibrary,
    fonts: HashMap<(String, FontWeight, FontStyle), FontId>,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(title: &str, library: &'a FontLibrary) -> Self {
        let mut document = PdfDocument::new(title);
        document.metadata.info.conformance = PdfConformance::X3_2002_PDF_1_3;
        PdfRenderer { document, library, fonts: HashMap::new() }
    }

    /// Render every page and serialize the document.
    pub fn render(mut self, pages: &[Page], page_size_pt: (f32, f32)) -> Result<Vec<u8>, ExportError> {
        for (idx, page) in pages.iter().enumerate() {
            self.render_page(page, page_size_pt, idx)?;
        }
        let mut warnings = Vec::new();
        Ok(self.document.save(&PdfSaveOptions::default(), &mut warnings))
    }

    fn render_page(
        &mut self,
        page: &Page,
        (width_pt, height_pt): (f32, f32),
        page_idx: usize,
    ) -> Result<(), ExportError> {
        let layer_name = format!("Page {} Layer 1", page_idx + 1);
        let layer_id = self.document.add_layer(&Layer::new(&layer_name));

        let mut ops: Vec<Op> = vec![Op::BeginLayer { layer_id }];
        for element in &page.elements {
            ops.extend(self.render_element(element, height_pt)?);
        }

        let pdf_page = PdfPage::new(Pt(width_pt).into(), Pt(height_pt).into(), ops);
        self.document.pages.push(pdf_page);
        Ok(())
    }

    fn render_element(
        &mut self,
        element: &PositionedElement,
        page_height: f32,
    ) -> Result<Vec<Op>, ExportError> {
        let mut ops = Vec::new();
        if let Some(bg) = &element.style.background_color {
            ops.extend(draw_rectangle(
                element.x,
                element.y,
                element.width,
                element.height,
                Some(bg),
                None,
                page_height,
            ));
        }

        if let LayoutElement::Text(text) = &element.element {
            ops.extend(self.render_text(text, element, page_height)?);
        }

        // Border goes on top of content.
        if let Some(border) = &element.style.border {
            ops.extend(draw_rectangle(
                element.x,
                element.y,
                element.width,
                element.height,
                None,
                Some(border),
                page_height,
            ));
        }
        Ok(ops)
    }

    fn render_text(
        &mut self,
        text: &TextElement,
        positioned: &PositionedElement,
        page_height: f32,
    ) -> Result<Vec<Op>, ExportError> {
        let style = &positioned.style;
        let font_id = self.ensure_font(&style.font_family, style.font_weight, style.font_style)?;

        let mut ops = Vec::new();
        ops.push(Op::SetFillColor { col: pdf_color(&style.color) });
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFontSize { size: Pt(style.font_size), font: font_id.clone() });

        for line in &text.lines {
            let mut x = line.x;
            if style.text_align != TextAlign::Left {
                let approx_width =
                    line.text.chars().count() as f32 * style.font_size * CHAR_WIDTH_RATIO;
                match style.text_align {
                    TextAlign::Right => x = line.x + line.width - approx_width,
                    TextAlign::Center => x = line.x + (line.width - approx_width) / 2.0,
                    TextAlign::Left => {}
                }
            }

            let pdf_y = page_height - line.y - style.font_size;
            ops.push(Op::SetTextMatrix { matrix: TextMatrix::Translate(Pt(x), Pt(pdf_y)) });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(line.text.clone())],
                font: font_id.clone(),
            });
        }
        ops.push(Op::EndTextSection);
        Ok(ops)
    }

    fn ensure_font(
        &mut self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<FontId, ExportError> {
        let key = (family.to_lowercase(), weight, style);
        if let Some(id) = self.fonts.get(&key) {
            return Ok(id.clone());
        }

        let asset = self.library.resolve(family, weight, style)?;
        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(asset.data.as_slice(), asset.index as usize, &mut warnings)
            .ok_or_else(|| {
                ExportError::Font(FontError::Unparseable { family: family.to_string() })
            })?;
        let id = self.document.add_font(&parsed);
        self.fonts.insert(key, id.clone());
        Ok(id)
    }
}

fn pdf_color(color: &Color) -> printpdf::color::Color {
    let (r, g, b) = color.to_rgb8();
    printpdf::color::Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn draw_rectangle(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    fill: Option<&Color>,
    border: Option<&Border>,
    page_height: f32,
) -> Vec<Op> {
    let has_fill = fill.is_some();
    let has_stroke = border.is_some();
    if !has_fill && !has_stroke {
        return Vec::new();
    }

    let mut ops = Vec::new();
    let pdf_y = page_height - y - height;

    let points = vec![
        LinePoint { p: Point { x: Pt(x), y: Pt(pdf_y) }, bezier: false },
        LinePoint { p: Point { x: Pt(x + width), y: Pt(pdf_y) }, bezier: false },
        LinePoint { p: Point { x: Pt(x + width), y: Pt(pdf_y + height) }, bezier: false },
        LinePoint { p: Point { x: Pt(x), y: Pt(pdf_y + height) }, bezier: false },
    ];

    if let Some(fill_color) = fill {
        ops.push(Op::SetFillColor { col: pdf_color(fill_color) });
    }

    if let Some(border) = border {
        ops.push(Op::SetOutlineColor { col: pdf_color(&border.color) });
        ops.push(Op::SetOutlineThickness { pt: Pt(border.width) });
        if border.style == BorderStyle::Dashed {
            ops.push(Op::SetLineDashPattern {
                dash: LineDashPattern {
                    dash_1: Some(3),
                    gap_1: Some(3),
                    dash_2: None,
                    gap_2: None,
                    dash_3: None,
                    gap_3: None,
                    offset: 0,
                },
            });
        }
    }

    let paint_mode = match (has_fill, has_stroke) {
        (true, true) => PaintMode::FillStroke,
        (false, true) => PaintMode::Stroke,
        _ => PaintMode::Fill,
    };

    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: paint_mode,
            winding_order: WindingOrder::NonZero,
        },
    });

    if let Some(border) = border
        && border.style == BorderStyle::Dashed
    {
        ops.push(Op::SetLineDashPattern { dash: LineDashPattern::default() });
    }
    ops
}
