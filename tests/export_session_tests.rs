mod common;

use common::{GeneratedPdf, MockRasterizer, RecordingSurface, TestResult, target};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use vitae::{ExportSession, RasterExportOptions, RasterExporter};

fn session_with_mock() -> (ExportSession<MockRasterizer>, Arc<std::sync::atomic::AtomicUsize>) {
    let (mock, calls) = MockRasterizer::new();
    let session = ExportSession::new(RasterExporter::new(mock), RasterExportOptions::default());
    (session, calls)
}

#[test]
fn initial_state_is_idle_and_error_free() {
    let (session, _) = session_with_mock();
    assert!(!session.is_exporting());
    assert!(session.last_error().is_none());
}

#[test]
fn missing_target_sets_the_exact_error_and_never_captures() {
    let (mut session, calls) = session_with_mock();

    session.export_pdf(None);

    assert_eq!(session.last_error(), Some("No target element found"));
    assert!(!session.is_exporting());
    assert_eq!(calls.load(Ordering::SeqCst), 0, "rasterizer must not run without a target");
}

#[test]
fn export_writes_the_file_and_returns_to_idle() -> TestResult {
    let (mut session, calls) = session_with_mock();
    session.set_target(Arc::new(target(400.0, 600.0)));

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("curriculum.pdf");
    session.export_pdf(output.to_str());

    assert!(session.last_error().is_none(), "unexpected error: {:?}", session.last_error());
    assert!(!session.is_exporting());
    assert!(output.is_file());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(session.stage().is_empty(), "a clone was left mounted on the stage");
    Ok(())
}

#[test]
fn capture_failure_surfaces_as_a_dismissible_error() -> TestResult {
    let mut session = ExportSession::new(
        RasterExporter::new(MockRasterizer::failing()),
        RasterExportOptions::default(),
    );
    session.set_target(Arc::new(target(400.0, 600.0)));

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("curriculum.pdf");
    session.export_pdf(output.to_str());

    let error = session.last_error().expect("failure must be recorded");
    assert!(error.contains("capture failed"), "got: {}", error);
    assert!(!session.is_exporting());
    assert!(!output.exists(), "no file must be written on failure");
    assert!(session.stage().is_empty(), "failed export leaked a mounted clone");

    session.clear_error();
    assert!(session.last_error().is_none());
    Ok(())
}

#[test]
fn clear_error_always_resets() {
    let (mut session, _) = session_with_mock();
    session.export_pdf(None);
    assert!(session.last_error().is_some());

    session.clear_error();
    assert!(session.last_error().is_none());

    // Clearing with no error present is also fine.
    session.clear_error();
    assert!(session.last_error().is_none());
}

#[test]
fn blob_variant_produces_a_parsable_single_page_pdf() -> TestResult {
    let (mut session, _) = session_with_mock();
    session.set_target(Arc::new(target(400.0, 600.0)));

    let bytes = session.export_blob().expect("blob export should succeed");
    assert!(session.last_error().is_none());

    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert_pdf_page_count!(pdf, 1);
    Ok(())
}

#[test]
fn blob_variant_returns_none_without_a_target() {
    let (mut session, _) = session_with_mock();
    assert!(session.export_blob().is_none());
    assert_eq!(session.last_error(), Some("No target element found"));
}

#[test]
fn print_retitles_the_surface_for_the_dialog_and_restores_it() {
    let (session, _) = session_with_mock();
    let mut surface = RecordingSurface::new("Currículum");

    session.print(&mut surface);

    assert_eq!(surface.titles_at_dialog, vec!["CV - Currículum".to_string()]);
    assert_eq!(surface.title, "Currículum");
    assert!(!session.is_exporting(), "print must not enter the Exporting state");
}
