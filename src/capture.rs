// src/capture.rs
//! Raster capture of a laid-out preview subtree.
//!
//! The [`CaptureTarget`] is the live preview surface the interactive layer
//! owns. Exports never touch it: the exporter deep-clones the target, mounts
//! the clone off-screen on the [`Stage`] (the shared surface playing the role
//! of the document body), normalizes its colors, rasterizes it, and unmounts.
//! Mounting is guarded — the clone is detached on every exit path, including
//! panics, so the stage is empty again after any export.

use crate::fonts::{FontError, FontLibrary};
use crate::layout_engine::{
    CHAR_WIDTH_RATIO, LayoutElement, LayoutEngine, PositionedElement, TextElement,
};
use crate::stylesheet::{FontStyle, FontWeight, Stylesheet, TextAlign};
use crate::templates::{self, TemplateKind};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use std::cell::Cell;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use thiserror::Error;
use vitae_types::{Color, Margins, Resume};

/// Horizontal offset applied to mounted clones so they never overlap the
/// visible surface.
pub const OFFSCREEN_X: f32 = -9999.0;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture target has no measurable size")]
    EmptyTarget,

    /// The software rasterizer operates strictly on device RGB. Colors in a
    /// perceptual space must be normalized away before capture.
    #[error("the rasterizer cannot render {color_space} colors; normalize the clone first")]
    UnsupportedColorSpace { color_space: &'static str },

    #[error("invalid raster scale factor: {0}")]
    InvalidScale(f32),

    /// Backend-specific capture failure (tainted source, image load timeout).
    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Font(#[from] FontError),
}

/// A laid-out preview subtree: the unit the raster exporter captures.
#[derive(Clone, Debug)]
pub struct CaptureTarget {
    /// Natural width in layout points.
    pub width: f32,
    /// Natural height in layout points.
    pub height: f32,
    pub elements: Vec<PositionedElement>,
}

impl CaptureTarget {
    /// Collapse a continuous layout run into a capture target.
    pub fn from_continuous_layout(engine: LayoutEngine) -> Self {
        let width = engine.page_width();
        let height = engine.content_height();
        let elements = engine
            .into_pages()
            .into_iter()
            .next()
            .map(|page| page.elements)
            .unwrap_or_default();
        CaptureTarget { width, height, elements }
    }
}

/// Lay a résumé out the way the interactive preview does, producing the
/// subtree a session will capture.
pub fn render_preview(
    kind: TemplateKind,
    resume: &Resume,
    stylesheet: &Stylesheet,
    width_pt: f32,
    margins_pt: Margins,
) -> CaptureTarget {
    let mut engine = LayoutEngine::new_continuous(stylesheet, width_pt, margins_pt);
    engine.layout_elements(templates::build_elements(kind, resume));
    CaptureTarget::from_continuous_layout(engine)
}

/// The shared mutable surface export clones are temporarily attached to.
///
/// One stage exists per raster exporter; clones are mounted at
/// [`OFFSCREEN_X`] and detached when the [`MountedClone`] guard drops.
#[derive(Debug, Default)]
pub struct Stage {
    mounted: Cell<usize>,
}

impl Stage {
    pub fn new() -> Self {
        Stage::default()
    }

    pub fn mount(&self, clone: CaptureTarget) -> MountedClone<'_> {
        self.mounted.set(self.mounted.get() + 1);
        MountedClone { stage: self, offset_x: OFFSCREEN_X, clone }
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.get()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.get() == 0
    }
}

/// RAII handle to a clone attached to the stage.
pub struct MountedClone<'a> {
    stage: &'a Stage,
    pub offset_x: f32,
    clone: CaptureTarget,
}

impl Deref for MountedClone<'_> {
    type Target = CaptureTarget;

    fn deref(&self) -> &CaptureTarget {
        &self.clone
    }
}

impl DerefMut for MountedClone<'_> {
    fn deref_mut(&mut self) -> &mut CaptureTarget {
        &mut self.clone
    }
}

impl Drop for MountedClone<'_> {
    fn drop(&mut self) {
        self.stage.mounted.set(self.stage.mounted.get().saturating_sub(1));
    }
}

/// Force every color the rasterizer cannot handle to a safe fallback:
/// backgrounds go white, text black, borders black.
///
/// This is a lossy normalization, not a color transform — the nearest-safe
/// fallback mirrors what the interactive preview shows once its capture
/// library refuses a perceptual color.
pub fn normalize_colors(target: &mut CaptureTarget) {
    for element in &mut target.elements {
        let style = &mut element.style;
        if let Some(bg) = style.background_color
            && !bg.is_rgb()
        {
            style.background_color = Some(Color::WHITE);
        }
        if !style.color.is_rgb() {
            style.color = Color::BLACK;
        }
        if let Some(border) = &mut style.border
            && !border.color.is_rgb()
        {
            border.color = Color::BLACK;
        }
    }
}

/// The capture backend: turns a target into a bitmap at a scale factor.
pub trait Rasterizer {
    fn rasterize(&self, target: &CaptureTarget, scale: f32) -> Result<RgbaImage, CaptureError>;
}

/// Built-in software rasterizer drawing backgrounds, borders and
/// glyph-rasterized text onto an RGBA canvas.
pub struct SoftwareRasterizer {
    fonts: FontLibrary,
}

type FaceKey = (String, FontWeight, FontStyle);

impl SoftwareRasterizer {
    pub fn new(fonts: FontLibrary) -> Self {
        SoftwareRasterizer { fonts }
    }

    fn face_for<'m>(
        &self,
        faces: &'m mut HashMap<FaceKey, FontVec>,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<&'m FontVec, CaptureError> {
        let key = (family.to_lowercase(), weight, style);
        if !faces.contains_key(&key) {
            let asset = self.fonts.resolve(family, weight, style)?;
            let face = FontVec::try_from_vec_and_index(asset.data.as_ref().clone(), asset.index)
                .map_err(|_| FontError::Unparseable { family: family.to_string() })?;
            faces.insert(key.clone(), face);
        }
        Ok(&faces[&key])
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        faces: &mut HashMap<FaceKey, FontVec>,
        text: &TextElement,
        element: &PositionedElement,
        scale: f32,
    ) -> Result<(), CaptureError> {
        let style = &element.style;
        let color = device_rgb(&style.color)?;
        let face = self.face_for(faces, &style.font_family, style.font_weight, style.font_style)?;
        let px = PxScale::from(style.font_size * scale);
        let scaled_font = face.as_scaled(px);
        let ascent = scaled_font.ascent();

        for line in &text.lines {
            let approx_width = line.text.chars().count() as f32 * style.font_size * CHAR_WIDTH_RATIO;
            let start_x = match style.text_align {
                TextAlign::Left => line.x,
                TextAlign::Center => line.x + (line.width - approx_width) / 2.0,
                TextAlign::Right => line.x + line.width - approx_width,
            };

            let mut pen_x = start_x * scale;
            let baseline_y = line.y * scale + ascent;
            for ch in line.text.chars() {
                let glyph_id = face.glyph_id(ch);
                let glyph = glyph_id.with_scale_and_position(px, point(pen_x, baseline_y));
                if let Some(outlined) = face.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        blend_pixel(
                            canvas,
                            bounds.min.x as i32 + gx as i32,
                            bounds.min.y as i32 + gy as i32,
                            color,
                            coverage,
                        );
                    });
                }
                pen_x += scaled_font.h_advance(glyph_id);
            }
        }
        Ok(())
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, target: &CaptureTarget, scale: f32) -> Result<RgbaImage, CaptureError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptureError::InvalidScale(scale));
        }
        let width_px = (target.width * scale).round() as u32;
        let height_px = (target.height * scale).round() as u32;
        if width_px == 0 || height_px == 0 {
            return Err(CaptureError::EmptyTarget);
        }

        let mut canvas = RgbaImage::from_pixel(width_px, height_px, Rgba([255, 255, 255, 255]));
        let mut faces: HashMap<FaceKey, FontVec> = HashMap::new();

        for element in &target.elements {
            if let Some(bg) = &element.style.background_color {
                fill_rect(
                    &mut canvas,
                    element.x * scale,
                    element.y * scale,
                    element.width * scale,
                    element.height * scale,
                    device_rgb(bg)?,
                );
            }

            if let LayoutElement::Text(text) = &element.element {
                self.draw_text(&mut canvas, &mut faces, text, element, scale)?;
            }

            if let Some(border) = &element.style.border {
                stroke_rect(
                    &mut canvas,
                    element.x * scale,
                    element.y * scale,
                    element.width * scale,
                    element.height * scale,
                    (border.width * scale).max(1.0),
                    device_rgb(&border.color)?,
                );
            }
        }
        Ok(canvas)
    }
}

fn device_rgb(color: &Color) -> Result<[u8; 3], CaptureError> {
    match *color {
        Color::Rgb { r, g, b, .. } => Ok([r, g, b]),
        Color::Oklch { .. } => Err(CaptureError::UnsupportedColorSpace { color_space: "oklch" }),
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, color: [u8; 3]) {
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = ((x + width).max(0.0) as u32).min(canvas.width());
    let y1 = ((y + height).max(0.0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, Rgba([color[0], color[1], color[2], 255]));
        }
    }
}

fn stroke_rect(
    canvas: &mut RgbaImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    thickness: f32,
    color: [u8; 3],
) {
    // Four edge strips.
    fill_rect(canvas, x, y, width, thickness, color);
    fill_rect(canvas, x, y + height - thickness, width, thickness, color);
    fill_rect(canvas, x, y, thickness, height, color);
    fill_rect(canvas, x + width - thickness, y, thickness, height, color);
}

fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        let blended =
            color[channel] as f32 * coverage + pixel.0[channel] as f32 * (1.0 - coverage);
        pixel.0[channel] = blended.round() as u8;
    }
    pixel.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_engine::{ComputedStyle, RectElement};
    use crate::stylesheet::Border;

    fn style_with(color: Color, bg: Option<Color>) -> ComputedStyle {
        ComputedStyle {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            line_height: 14.4,
            text_align: TextAlign::Left,
            color,
            margin: Margins::default(),
            padding: Margins::default(),
            height: None,
            background_color: bg,
            border: None,
        }
    }

    fn rect_element(style: ComputedStyle) -> PositionedElement {
        PositionedElement {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            element: LayoutElement::Rectangle(RectElement { style_name: None }),
            style,
        }
    }

    #[test]
    fn stage_guard_unmounts_on_drop() {
        let stage = Stage::new();
        let target = CaptureTarget { width: 10.0, height: 10.0, elements: Vec::new() };
        {
            let mounted = stage.mount(target.clone());
            assert_eq!(stage.mounted_count(), 1);
            assert_eq!(mounted.offset_x, OFFSCREEN_X);
        }
        assert!(stage.is_empty());
    }

    #[test]
    fn stage_guard_unmounts_on_panic() {
        let stage = Stage::new();
        let target = CaptureTarget { width: 10.0, height: 10.0, elements: Vec::new() };
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _mounted = stage.mount(target);
            panic!("capture blew up");
        }));
        assert!(result.is_err());
        assert!(stage.is_empty());
    }

    #[test]
    fn normalization_forces_safe_fallbacks() {
        let oklch = Color::Oklch { l: 0.7, c: 0.1, h: 250.0, a: 1.0 };
        let mut style = style_with(oklch, Some(oklch));
        style.border = Some(Border {
            width: 1.0,
            style: crate::stylesheet::BorderStyle::Solid,
            color: oklch,
        });
        let mut target =
            CaptureTarget { width: 10.0, height: 10.0, elements: vec![rect_element(style)] };

        normalize_colors(&mut target);

        let style = &target.elements[0].style;
        assert_eq!(style.background_color, Some(Color::WHITE));
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.border.as_ref().unwrap().color, Color::BLACK);
    }

    #[test]
    fn normalization_leaves_rgb_untouched() {
        let red = Color::rgb(200, 0, 0);
        let mut target = CaptureTarget {
            width: 10.0,
            height: 10.0,
            elements: vec![rect_element(style_with(red, Some(red)))],
        };
        normalize_colors(&mut target);
        assert_eq!(target.elements[0].style.background_color, Some(red));
        assert_eq!(target.elements[0].style.color, red);
    }
}
