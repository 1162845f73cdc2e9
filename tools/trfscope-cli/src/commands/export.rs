//! Export decoded transforms to text TRF format.

use std::path::PathBuf;

use trfscope_analysis::pipeline::{analyze_file, AnalysisOptions};
use trfscope_transform_model::serialize_transforms;

pub fn run(path: PathBuf, output: PathBuf, options: &AnalysisOptions) -> anyhow::Result<()> {
    let report = analyze_file(&path, options)
        .map_err(|e| anyhow::anyhow!("Failed to analyze {}: {e}", path.display()))?;

    if report.transforms.is_empty() {
        anyhow::bail!("no transforms decoded from {}", path.display());
    }

    let text = serialize_transforms(&report.transforms);
    std::fs::write(&output, text)?;

    println!(
        "Exported {} transforms to: {}",
        report.transforms.len(),
        output.display()
    );

    Ok(())
}
