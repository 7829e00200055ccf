// src/export/vector.rs
//! Batch vector export: load a résumé data file, lay it out with the
//! selected template bundle, and print it as a native vector PDF.
//!
//! The interactive app's storage-event bridge has no equivalent here: the
//! document arrives as an explicit input file and is rendered directly,
//! which removes the event-ordering races of the original design. Rendering
//! runs on a worker that signals readiness over a channel once fonts are
//! resolved and layout is complete; the caller waits on that explicit signal
//! with a hard timeout instead of sleeping a settle delay.

use crate::error::ExportError;
use crate::fonts::FontLibrary;
use crate::layout_engine::LayoutEngine;
use crate::pdf_renderer::PdfRenderer;
use crate::stylesheet::{MM_TO_PT, Stylesheet};
use crate::templates::{self, TemplateKind};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use vitae_types::{Margins, PageFormat, Resume};

/// How long the render worker may take before the export is abandoned.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_MARGIN_MM: f32 = 20.0;
pub const DEFAULT_BUILD_DIR: &str = "assets/templates";

#[derive(Debug, Clone)]
pub struct VectorExportConfig {
    pub template: TemplateKind,
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub format: PageFormat,
    /// Page margins in millimetres; a margin declared by the template bundle
    /// takes precedence.
    pub margins: Margins,
    /// Directory holding the compiled template bundles.
    pub build_dir: PathBuf,
}

impl VectorExportConfig {
    pub fn new(
        template: TemplateKind,
        data_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        VectorExportConfig {
            template,
            data_path: data_path.into(),
            output_path: output_path.into(),
            format: PageFormat::A4,
            margins: Margins::uniform(DEFAULT_MARGIN_MM),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }
}

#[derive(Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Run the full batch export. On failure no output file is left behind: the
/// document is assembled in memory and written through a temp file that is
/// only persisted once complete.
pub fn export(config: &VectorExportConfig) -> Result<ExportSummary, ExportError> {
    let bundle_path = config.build_dir.join(format!("{}.json", config.template.slug()));
    if !bundle_path.is_file() {
        return Err(ExportError::Precondition(format!(
            "template build not found: {} (expected {}). Run the template build first.",
            config.build_dir.display(),
            bundle_path.display()
        )));
    }

    let raw = std::fs::read_to_string(&config.data_path).map_err(|e| {
        ExportError::Precondition(format!(
            "cannot read resume data file {}: {}",
            config.data_path.display(),
            e
        ))
    })?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    validate_document_shape(&value)?;
    let resume: Resume = serde_json::from_value(value)?;

    let stylesheet = Stylesheet::from_json(&std::fs::read_to_string(&bundle_path)?)?;

    log::info!(
        "rendering {} template for {}",
        config.template,
        resume.personal_info.full_name
    );
    let bytes = render_with_timeout(config, resume, stylesheet)?;

    let output_dir = match config.output_path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(output_dir)?;
    temp.write_all(&bytes)?;
    temp.persist(&config.output_path).map_err(|e| ExportError::Io(e.error))?;

    Ok(ExportSummary { path: config.output_path.clone(), bytes_written: bytes.len() as u64 })
}

/// Minimal structural check before full deserialization, so a clearly
/// malformed file fails with a message naming the missing field.
pub fn validate_document_shape(value: &serde_json::Value) -> Result<(), ExportError> {
    let object = value
        .as_object()
        .ok_or_else(|| ExportError::InvalidDocument("resume data must be a JSON object".into()))?;
    for key in ["personalInfo", "experience", "education"] {
        if !object.contains_key(key) {
            return Err(ExportError::InvalidDocument(format!(
                "resume data is missing the required '{}' field",
                key
            )));
        }
    }
    Ok(())
}

fn render_with_timeout(
    config: &VectorExportConfig,
    resume: Resume,
    stylesheet: Stylesheet,
) -> Result<Vec<u8>, ExportError> {
    let template = config.template;
    let format = stylesheet.page.size.unwrap_or(config.format);
    let margins_pt = stylesheet
        .page
        .margins
        .unwrap_or(Margins {
            top: config.margins.top * MM_TO_PT,
            right: config.margins.right * MM_TO_PT,
            bottom: config.margins.bottom * MM_TO_PT,
            left: config.margins.left * MM_TO_PT,
        });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(render_document(template, &resume, &stylesheet, format, margins_pt));
    });

    match rx.recv_timeout(RENDER_TIMEOUT) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            Err(ExportError::Timeout { seconds: RENDER_TIMEOUT.as_secs() })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ExportError::Encoding(
            "render worker terminated before signalling readiness".into(),
        )),
    }
}

fn render_document(
    template: TemplateKind,
    resume: &Resume,
    stylesheet: &Stylesheet,
    format: PageFormat,
    margins_pt: Margins,
) -> Result<Vec<u8>, ExportError> {
    // Fonts settled is part of the readiness signal; an empty database is a
    // hard failure, not something to render around.
    let fonts = FontLibrary::with_system_fonts();
    if fonts.is_empty() {
        return Err(ExportError::Precondition(
            "no system fonts available; install at least one sans-serif font".into(),
        ));
    }

    let (w_mm, h_mm) = format.dimensions_mm();
    let page_size_pt = (w_mm * MM_TO_PT, h_mm * MM_TO_PT);

    let mut engine = LayoutEngine::new(stylesheet, page_size_pt, margins_pt);
    engine.layout_elements(templates::build_elements(template, resume));

    let title = stylesheet
        .page
        .title
        .clone()
        .unwrap_or_else(|| format!("CV - {}", resume.personal_info.full_name));
    let renderer = PdfRenderer::new(&title, &fonts);
    renderer.render(engine.pages(), page_size_pt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_check_names_the_missing_field() {
        let value = json!({ "personalInfo": {}, "education": [] });
        let err = validate_document_shape(&value).unwrap_err();
        assert!(err.to_string().contains("experience"), "got: {}", err);
    }

    #[test]
    fn shape_check_rejects_non_objects() {
        let err = validate_document_shape(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn shape_check_accepts_the_minimal_shape() {
        let value = json!({ "personalInfo": {}, "experience": [], "education": [] });
        assert!(validate_document_shape(&value).is_ok());
    }
}
