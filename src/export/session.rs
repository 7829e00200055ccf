// src/export/session.rs
//! Export session: the state machine between UI actions and the raster
//! exporter.
//!
//! One session owns one capture target and serializes its exports — the
//! state is Idle or Exporting, and the flag is reset through a drop guard so
//! it can never be left set, whatever the exporter does. Errors surface as a
//! stored message the UI can show and dismiss.

use crate::capture::{CaptureTarget, Rasterizer, Stage};
use crate::error::ExportError;
use crate::export::raster::{RasterExportOptions, RasterExporter};
use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_FILENAME: &str = "curriculum.pdf";
const PRINT_TITLE_PREFIX: &str = "CV - ";

/// The window-like collaborator `print` talks to.
pub trait PrintSurface {
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
    fn open_print_dialog(&mut self);
}

pub struct ExportSession<R: Rasterizer> {
    exporter: RasterExporter<R>,
    options: RasterExportOptions,
    target: Option<Arc<CaptureTarget>>,
    exporting: Cell<bool>,
    last_error: Option<String>,
}

impl<R: Rasterizer> ExportSession<R> {
    pub fn new(exporter: RasterExporter<R>, options: RasterExportOptions) -> Self {
        ExportSession {
            exporter,
            options,
            target: None,
            exporting: Cell::new(false),
            last_error: None,
        }
    }

    /// Attach the preview subtree this session exports.
    pub fn set_target(&mut self, target: Arc<CaptureTarget>) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.get()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn stage(&self) -> &Stage {
        self.exporter.stage()
    }

    /// Export the target and write the file (the download action).
    ///
    /// A call while an export is in flight is a no-op. A missing target
    /// records the error without ever entering the Exporting state.
    pub fn export_pdf(&mut self, filename: Option<&str>) {
        if self.exporting.get() {
            return;
        }
        self.last_error = None;

        let Some(target) = self.target.clone() else {
            self.last_error = Some(ExportError::MissingTarget.to_string());
            return;
        };

        let _guard = ExportingGuard::arm(&self.exporting);
        let filename = filename.unwrap_or(DEFAULT_FILENAME);
        if let Err(e) =
            self.exporter.export_to_file(Some(target.as_ref()), Path::new(filename), &self.options)
        {
            self.last_error = Some(e.to_string());
        }
    }

    /// Export the target and return the PDF bytes (the preview/send action).
    pub fn export_blob(&mut self) -> Option<Vec<u8>> {
        if self.exporting.get() {
            return None;
        }
        self.last_error = None;

        let Some(target) = self.target.clone() else {
            self.last_error = Some(ExportError::MissingTarget.to_string());
            return None;
        };

        let _guard = ExportingGuard::arm(&self.exporting);
        match self.exporter.export_to_blob(Some(target.as_ref()), &self.options) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    /// Open the native print dialog, temporarily retitling the surface.
    /// Fire-and-forget: does not participate in the Exporting state.
    pub fn print(&self, surface: &mut dyn PrintSurface) {
        let original_title = surface.title();
        surface.set_title(&format!("{}{}", PRINT_TITLE_PREFIX, original_title));
        surface.open_print_dialog();
        surface.set_title(&original_title);
    }
}

/// Keeps the Exporting flag honest across early returns and panics.
struct ExportingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ExportingGuard<'a> {
    fn arm(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        ExportingGuard { flag }
    }
}

impl Drop for ExportingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
