//! Compare two TRF files by instability index.

use std::path::PathBuf;

use trfscope_analysis::compare::{Comparison, Side};
use trfscope_analysis::pipeline::{compare_files, AnalysisOptions, AnalysisReport};
use trfscope_common::TrfResult;

use super::analyze::render_report;

pub fn run(path_a: PathBuf, path_b: PathBuf, options: &AnalysisOptions) -> anyhow::Result<()> {
    let report = compare_files(&path_a, &path_b, options);

    render_side(&path_a, &report.a);
    println!();
    render_side(&path_b, &report.b);

    println!();
    println!("{}", "=".repeat(50));
    println!("COMPARISON SUMMARY");
    println!("{}", "=".repeat(50));

    if let (Ok(a), Ok(b)) = (&report.a, &report.b) {
        if let (Some(ma), Some(mb)) = (&a.metrics, &b.metrics) {
            println!("Frame count: {} vs {}", ma.frame_count, mb.frame_count);
            println!();
            println!("Instability Index:");
            println!("  {}: {:.6}", path_a.display(), ma.instability_index);
            println!("  {}: {:.6}", path_b.display(), mb.instability_index);
        }
    }

    match report.comparison {
        Comparison::Decided {
            winner,
            absolute_difference,
            relative_improvement_pct,
        } => {
            let winner_path = match winner {
                Side::A => &path_a,
                Side::B => &path_b,
            };
            println!("  Difference: {absolute_difference:.6}");
            println!("  Better file: {}", winner_path.display());
            println!("  Improvement: {relative_improvement_pct:.1}%");
        }
        Comparison::Incomparable => {
            println!("Files are incomparable: at least one side produced no metrics.");
        }
    }

    // Missing inputs are non-fatal for the comparison itself but the
    // invocation still exits non-zero.
    if report.a.is_err() || report.b.is_err() {
        anyhow::bail!("comparison incomplete: one or both files could not be analyzed");
    }

    Ok(())
}

fn render_side(path: &PathBuf, result: &TrfResult<AnalysisReport>) {
    match result {
        Ok(report) => render_report(report),
        Err(e) => println!("Could not analyze {}: {e}", path.display()),
    }
}
