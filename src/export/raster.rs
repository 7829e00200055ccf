// src/export/raster.rs
//! Raster export: capture a preview subtree as a bitmap, paginate it, and
//! embed it into a PDF, entirely in-process.
//!
//! The fit ratio keeps the whole bitmap inside one page dimension without
//! distortion. When the scaled bitmap is taller than a page, the pagination
//! places the *same* full bitmap at decreasing offsets rather than cropping
//! per page; repeated-content artifacts on the overflow pages are a known,
//! intentional property of this tiling (see [`page_offsets`]).

use crate::capture::{CaptureTarget, Rasterizer, Stage, normalize_colors};
use crate::error::ExportError;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, XObjectId};
use std::path::Path;
use vitae_types::{Orientation, PageFormat};

/// Immutable per-invocation configuration of a raster export.
#[derive(Debug, Clone)]
pub struct RasterExportOptions {
    pub format: PageFormat,
    pub orientation: Orientation,
    /// Encoder effort, 1..=3 (1 = fastest, 3 = densest). Values outside the
    /// range are clamped.
    pub quality: u8,
    /// Supersampling factor for the capture bitmap. Higher is sharper and
    /// proportionally more expensive in memory and time.
    pub scale: f32,
}

impl Default for RasterExportOptions {
    fn default() -> Self {
        RasterExportOptions {
            format: PageFormat::A4,
            orientation: Orientation::Portrait,
            quality: 2,
            scale: 2.0,
        }
    }
}

pub struct RasterExporter<R: Rasterizer> {
    rasterizer: R,
    stage: Stage,
}

impl<R: Rasterizer> RasterExporter<R> {
    pub fn new(rasterizer: R) -> Self {
        RasterExporter { rasterizer, stage: Stage::new() }
    }

    /// The surface export clones are mounted on; empty whenever no export is
    /// in flight.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The "download" variant: writes the PDF next to the caller.
    pub fn export_to_file(
        &self,
        target: Option<&CaptureTarget>,
        path: &Path,
        options: &RasterExportOptions,
    ) -> Result<(), ExportError> {
        let bytes = self.capture_and_paginate(target, options)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// The blob variant: returns the PDF bytes for previewing or sending.
    pub fn export_to_blob(
        &self,
        target: Option<&CaptureTarget>,
        options: &RasterExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        self.capture_and_paginate(target, options)
    }

    fn capture_and_paginate(
        &self,
        target: Option<&CaptureTarget>,
        options: &RasterExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let target = target.ok_or(ExportError::MissingTarget)?;

        // Deep-clone so the live preview is never touched, then mount the
        // clone off-screen. The guard detaches it on every exit path.
        let mut mounted = self.stage.mount(target.clone());
        normalize_colors(&mut mounted);
        let bitmap = self.rasterizer.rasterize(&mounted, options.scale)?;
        drop(mounted);

        let png = encode_png(&bitmap, options.quality)?;
        assemble_document(&png, options)
    }
}

fn encode_png(bitmap: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let compression = match quality.clamp(1, 3) {
        1 => CompressionType::Fast,
        3 => CompressionType::Best,
        _ => CompressionType::Default,
    };
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut bytes, compression, FilterType::Adaptive);
    encoder
        .write_image(bitmap.as_raw(), bitmap.width(), bitmap.height(), ExtendedColorType::Rgba8)
        .map_err(|e| ExportError::Encoding(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Remaining heights below this are treated as fully consumed; absorbs the
/// fit-ratio rounding that would otherwise turn a height-limited capture
/// into a duplicate trailing page.
const FIT_EPSILON: f32 = 0.1;

/// Vertical offsets (from the page top, in page units) at which the full
/// bitmap is placed, one per emitted page.
///
/// `scaled_height <= page_height` yields a single offset; otherwise offsets
/// decrease by one page height each page until the remaining visible height
/// is gone, emitting exactly `ceil(scaled_height / page_height)` pages.
pub fn page_offsets(scaled_height: f32, page_height: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    let mut height_left = scaled_height - page_height;
    while height_left > FIT_EPSILON {
        offsets.push(height_left - scaled_height);
        height_left -= page_height;
    }
    offsets
}

fn assemble_document(png: &[u8], options: &RasterExportOptions) -> Result<Vec<u8>, ExportError> {
    let (page_w, page_h) = options.orientation.apply(options.format.dimensions_mm());

    let mut warnings = Vec::new();
    let raw = printpdf::image::RawImage::decode_from_bytes(png, &mut warnings)
        .map_err(|e| ExportError::Encoding(format!("failed to decode captured bitmap: {}", e)))?;
    let img_w = raw.width as f32;
    let img_h = raw.height as f32;

    // Uniform fit, horizontally centered (ratio is mm-per-pixel).
    let ratio = (page_w / img_w).min(page_h / img_h);
    let scaled_w = img_w * ratio;
    let scaled_h = img_h * ratio;
    let margin_x = (page_w - scaled_w) / 2.0;

    let mut document = PdfDocument::new("curriculum");
    let image_id = XObjectId::new();
    document.resources.xobjects.map.insert(image_id.clone(), XObject::Image(raw));

    for position in page_offsets(scaled_h, page_h) {
        let translate_y = page_h - (position + scaled_h);
        let ops = vec![Op::UseXobject {
            id: image_id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Mm(margin_x).into_pt()),
                translate_y: Some(Mm(translate_y).into_pt()),
                rotate: None,
                scale_x: Some(Mm(scaled_w).into_pt().0 / img_w),
                scale_y: Some(Mm(scaled_h).into_pt().0 / img_h),
                dpi: Some(72.0),
            },
        }];
        document.pages.push(PdfPage::new(Mm(page_w), Mm(page_h), ops));
    }

    let mut warnings = Vec::new();
    Ok(document.save(&PdfSaveOptions::default(), &mut warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_when_content_fits() {
        assert_eq!(page_offsets(200.0, 297.0), vec![0.0]);
        assert_eq!(page_offsets(297.0, 297.0), vec![0.0]);
    }

    #[test]
    fn exact_multiples_emit_exact_page_counts() {
        assert_eq!(page_offsets(594.0, 297.0).len(), 2);
        assert_eq!(page_offsets(891.0, 297.0).len(), 3);
    }

    #[test]
    fn page_count_is_ceil_of_height_ratio() {
        for (scaled, page) in [(300.0_f32, 297.0_f32), (600.0, 297.0), (1000.0, 250.0)] {
            let expected = (scaled / page).ceil() as usize;
            assert_eq!(page_offsets(scaled, page).len(), expected, "H={} P={}", scaled, page);
        }
    }

    #[test]
    fn offsets_step_back_by_one_page() {
        let offsets = page_offsets(891.0, 297.0);
        assert_eq!(offsets, vec![0.0, 594.0 - 891.0, 297.0 - 891.0]);
    }
}
