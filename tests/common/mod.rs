pub mod pdf_assertions;

use image::{Rgba, RgbaImage};
use lopdf::Document as LopdfDocument;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use vitae::capture::{CaptureError, CaptureTarget, Rasterizer};
use vitae::{FontLibrary, PrintSurface};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

/// System fonts are an environment dependency; tests that rasterize or embed
/// real text skip gracefully on hosts without any.
pub fn font_library_or_skip() -> Option<FontLibrary> {
    let library = FontLibrary::with_system_fonts();
    if library.is_empty() {
        eprintln!("skipping: no system fonts available on this host");
        None
    } else {
        Some(library)
    }
}

/// A capture backend producing a solid bitmap, with an optional injected
/// failure and a shared invocation counter.
pub struct MockRasterizer {
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockRasterizer {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { fail: false, calls: calls.clone() }, calls)
    }

    pub fn failing() -> Self {
        let (mut mock, _) = Self::new();
        mock.fail = true;
        mock
    }
}

impl Rasterizer for MockRasterizer {
    fn rasterize(&self, target: &CaptureTarget, scale: f32) -> Result<RgbaImage, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CaptureError::Backend("canvas tainted by cross-origin image".into()));
        }
        let width = ((target.width * scale).round() as u32).max(1);
        let height = ((target.height * scale).round() as u32).max(1);
        Ok(RgbaImage::from_pixel(width, height, Rgba([120, 120, 120, 255])))
    }
}

/// An empty capture target with the given natural size.
pub fn target(width: f32, height: f32) -> CaptureTarget {
    CaptureTarget { width, height, elements: Vec::new() }
}

/// Window stand-in that records what `print` does with the title.
pub struct RecordingSurface {
    pub title: String,
    pub titles_at_dialog: Vec<String>,
}

impl RecordingSurface {
    pub fn new(title: &str) -> Self {
        RecordingSurface { title: title.to_string(), titles_at_dialog: Vec::new() }
    }
}

impl PrintSurface for RecordingSurface {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn open_print_dialog(&mut self) {
        self.titles_at_dialog.push(self.title.clone());
    }
}
