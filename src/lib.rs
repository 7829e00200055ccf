//! vitae: a résumé-to-PDF export engine.
//!
//! Two independent pipelines share one document model:
//!
//! - the **raster exporter** captures a laid-out preview subtree as a
//!   bitmap and paginates it into a PDF ([`export::raster`]), mediated by an
//!   [`ExportSession`] state machine;
//! - the **vector exporter** renders a résumé data file straight to a
//!   native vector PDF as a batch job ([`export::vector`]), driven by the
//!   `export-pdf` binary.

pub mod capture;
pub mod error;
pub mod export;
pub mod fonts;
pub mod format;
pub mod layout_engine;
pub mod pdf_renderer;
pub mod stylesheet;
pub mod templates;

pub use capture::{CaptureTarget, Rasterizer, SoftwareRasterizer, Stage, render_preview};
pub use error::ExportError;
pub use export::raster::{RasterExportOptions, RasterExporter};
pub use export::session::{ExportSession, PrintSurface};
pub use export::vector::{ExportSummary, VectorExportConfig};
pub use fonts::FontLibrary;
pub use stylesheet::Stylesheet;
pub use templates::TemplateKind;

pub use vitae_types as types;
