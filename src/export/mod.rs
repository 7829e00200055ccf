//! The two export pipelines and the session state machine that mediates
//! between them and the interactive layer.

pub mod raster;
pub mod session;
pub mod vector;

pub use raster::{RasterExportOptions, RasterExporter};
pub use session::{ExportSession, PrintSurface};
pub use vector::{ExportSummary, VectorExportConfig};
