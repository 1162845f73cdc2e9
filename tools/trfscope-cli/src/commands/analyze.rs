//! Analyze a single TRF file and render the report.

use std::path::PathBuf;

use trfscope_analysis::pipeline::{analyze_file, AnalysisOptions, AnalysisReport, LayoutOutcome};
use trfscope_transform_model::{serialize_transforms, TrfFormat};

pub fn run(
    path: PathBuf,
    options: &AnalysisOptions,
    export: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let report = analyze_file(&path, options)
        .map_err(|e| anyhow::anyhow!("Failed to analyze {}: {e}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.metrics)?);
    } else {
        render_report(&report);
    }

    if let Some(dest) = export {
        let text = serialize_transforms(&report.transforms);
        std::fs::write(&dest, text)?;
        println!(
            "\nExported {} transforms to: {}",
            report.transforms.len(),
            dest.display()
        );
    }

    Ok(())
}

pub(crate) fn render_report(report: &AnalysisReport) {
    println!("=== Analysis of {} ===", report.path.display());
    println!("File size: {} bytes", report.file_size);
    println!(
        "Format: {}",
        match report.format {
            TrfFormat::Text => "text",
            TrfFormat::Binary => "binary",
            TrfFormat::Unknown => "unknown (treated as binary)",
        }
    );

    if let Some(header) = &report.header {
        println!(
            "Header: version={}, advertised frames={} (unreliable), data size={}",
            header.version, header.advertised_frame_count, header.advertised_data_size
        );
    }

    match report.layout {
        LayoutOutcome::Detected(layout) => println!(
            "Layout: header={}B, record={}B ({} floats per record)",
            layout.header_size,
            layout.record_size,
            layout.floats_per_record()
        ),
        LayoutOutcome::Fallback(layout) => println!(
            "Layout: not detected; using default header={}B, record={}B (low confidence)",
            layout.header_size, layout.record_size
        ),
        LayoutOutcome::TextInput => {}
    }

    match &report.metrics {
        Some(metrics) => {
            println!(
                "Parsed {} transforms ({} valid)",
                metrics.frame_count, metrics.valid_frame_count
            );
            println!();
            println!("Stability Metrics:");
            println!(
                "  Horizontal (dx): RMS={:.6}, Mean abs={:.6}",
                metrics.dx_rms, metrics.dx_mean_abs
            );
            println!(
                "  Vertical (dy): RMS={:.6}, Mean abs={:.6}",
                metrics.dy_rms, metrics.dy_mean_abs
            );
            if let (Some(rms), Some(mean_abs)) = (metrics.da_rms, metrics.da_mean_abs) {
                println!("  Angular (da): RMS={rms:.6}, Mean abs={mean_abs:.6}");
            }
            println!(
                "  Instability Index: {:.6} (lower = better)",
                metrics.instability_index
            );
            println!();
            println!("Sample transforms (first {}):", report.sample().len());
            for (i, t) in report.sample().iter().enumerate() {
                println!(
                    "  Frame {i}: dx={:.4}, dy={:.4}, da={:.4}",
                    t.dx,
                    t.dy,
                    t.da.unwrap_or(0.0)
                );
            }
        }
        None => println!("No valid transform data found"),
    }
}
