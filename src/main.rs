use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use vitae::export::vector::{self, DEFAULT_BUILD_DIR, DEFAULT_MARGIN_MM, VectorExportConfig};
use vitae::types::{Margins, PageFormat};
use vitae::{ExportError, TemplateKind};

/// Batch résumé-to-PDF generator.
#[derive(Parser, Debug)]
#[command(name = "export-pdf", version, about = "Generate a résumé PDF from a JSON data file")]
struct Args {
    /// Template to use: ATS | Harvard
    template: String,

    /// Path to the résumé data JSON file
    data_path: PathBuf,

    /// Output PDF path (default: ./cv-<template>.pdf)
    output_path: Option<PathBuf>,

    /// Page format: A4 | Letter
    #[arg(long, default_value = "A4")]
    format: String,

    /// Page margins in mm: top,right,bottom,left
    #[arg(long, value_name = "TOP,RIGHT,BOTTOM,LEFT")]
    margin: Option<String>,

    /// Directory holding the compiled template bundles
    #[arg(long, env = "VITAE_BUILD_DIR", default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ExportError> {
    let template = TemplateKind::from_str(&args.template).map_err(ExportError::Precondition)?;
    let format = PageFormat::from_str(&args.format).map_err(ExportError::Precondition)?;
    let margins = match &args.margin {
        Some(spec) => parse_margins(spec)?,
        None => Margins::uniform(DEFAULT_MARGIN_MM),
    };

    if !args.data_path.is_file() {
        return Err(ExportError::Precondition(format!(
            "data file not found: {}",
            args.data_path.display()
        )));
    }

    let output_path = args
        .output_path
        .unwrap_or_else(|| PathBuf::from(format!("cv-{}.pdf", template.slug())));

    let config = VectorExportConfig {
        template,
        data_path: args.data_path,
        output_path,
        format,
        margins,
        build_dir: args.build_dir,
    };

    println!("Loading resume data from {}", config.data_path.display());
    println!("Rendering the {} template ({} format)...", template, format);

    let summary = vector::export(&config)?;

    println!("Generated {}", summary.path.display());
    println!("Size: {:.2} KB", summary.bytes_written as f64 / 1024.0);
    Ok(())
}

fn parse_margins(spec: &str) -> Result<Margins, ExportError> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    let invalid = || {
        ExportError::Precondition(format!(
            "invalid --margin value '{}': expected top,right,bottom,left in mm",
            spec
        ))
    };
    if parts.len() != 4 {
        return Err(invalid());
    }
    let mut values = [0.0f32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| invalid())?;
    }
    Ok(Margins { top: values[0], right: values[1], bottom: values[2], left: values[3] })
}
