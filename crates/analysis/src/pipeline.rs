//! The single parameterized analysis pipeline.
//!
//! One sequential computation per input: sniff → text parse or (header
//! probe → layout search → bulk decode) → metrics. The pipeline returns
//! data and emits tracing diagnostics; rendering is the caller's job.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use trfscope_common::{TrfError, TrfResult};
use trfscope_transform_model::{
    parse_text_transforms, sniff_bytes, HeaderInfo, LayoutCandidate, Transform, TrfFormat,
};

use crate::compare::{compare, Comparison};
use crate::decode::{decode_transforms, MAX_RECORDS_DEFAULT};
use crate::layout::LayoutSearch;
use crate::metrics::{summarize, StabilityMetrics};
use crate::probe::probe_header;

/// How many leading transforms a report exposes as a sample.
const REPORT_SAMPLE_LEN: usize = 5;

/// Bytes of the input shown in the debug hex preview.
const HEX_PREVIEW_LEN: usize = 128;

/// Tunable pipeline parameters.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Hard cap on decoded record count.
    pub max_records: usize,

    /// Records sampled per layout candidate during detection.
    pub sample_window: usize,

    /// A-priori frame-count expectation used to bias layout detection.
    pub expected_frames: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_records: MAX_RECORDS_DEFAULT,
            sample_window: 20,
            expected_frames: None,
        }
    }
}

/// How the record geometry was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// A candidate validated during the layout search.
    Detected(LayoutCandidate),

    /// Nothing validated; the default geometry was used and the result
    /// is low-confidence.
    Fallback(LayoutCandidate),

    /// Text input; no binary geometry involved.
    TextInput,
}

impl LayoutOutcome {
    /// The geometry used for decoding, when the input was binary.
    pub fn candidate(&self) -> Option<LayoutCandidate> {
        match self {
            Self::Detected(c) | Self::Fallback(c) => Some(*c),
            Self::TextInput => None,
        }
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub path: PathBuf,
    pub file_size: usize,
    pub format: TrfFormat,
    pub header: Option<HeaderInfo>,
    pub layout: LayoutOutcome,

    /// All decoded transforms in frame order, sanitized.
    pub transforms: Vec<Transform>,

    /// Absent when no valid transforms survived decoding.
    pub metrics: Option<StabilityMetrics>,
}

impl AnalysisReport {
    /// The first few transforms, for human-readable reports.
    pub fn sample(&self) -> &[Transform] {
        &self.transforms[..self.transforms.len().min(REPORT_SAMPLE_LEN)]
    }
}

/// Analyze a file on disk.
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> TrfResult<AnalysisReport> {
    if !path.exists() {
        return Err(TrfError::file_not_found(path));
    }
    let buffer = std::fs::read(path)?;
    analyze_buffer(path, &buffer, options)
}

/// Analyze an in-memory buffer. `origin` labels the input in the report
/// and diagnostics.
pub fn analyze_buffer(
    origin: &Path,
    buffer: &[u8],
    options: &AnalysisOptions,
) -> TrfResult<AnalysisReport> {
    info!(
        path = %origin.display(),
        size = buffer.len(),
        "analyzing transform data"
    );

    let format = sniff_bytes(&buffer[..buffer.len().min(512)]);
    debug!(?format, "classified input");

    match format {
        TrfFormat::Text => analyze_text(origin, buffer, format),
        // Unknown is a best-effort fallback onto the binary path.
        TrfFormat::Binary | TrfFormat::Unknown => analyze_binary(origin, buffer, format, options),
    }
}

/// Run the pipeline over two inputs independently and compare them.
///
/// A failure on one side (e.g. a missing file) does not prevent the
/// other side from being analyzed; the comparison is then reported as
/// incomparable.
pub fn compare_files(
    path_a: &Path,
    path_b: &Path,
    options: &AnalysisOptions,
) -> ComparisonReport {
    let a = analyze_file(path_a, options);
    if let Err(e) = &a {
        warn!(path = %path_a.display(), "analysis failed: {e}");
    }
    let b = analyze_file(path_b, options);
    if let Err(e) = &b {
        warn!(path = %path_b.display(), "analysis failed: {e}");
    }

    let comparison = compare(
        a.as_ref().ok().and_then(|r| r.metrics.as_ref()),
        b.as_ref().ok().and_then(|r| r.metrics.as_ref()),
    );

    ComparisonReport { a, b, comparison }
}

/// Result of a two-file comparison run.
#[derive(Debug)]
pub struct ComparisonReport {
    pub a: TrfResult<AnalysisReport>,
    pub b: TrfResult<AnalysisReport>,
    pub comparison: Comparison,
}

fn analyze_text(origin: &Path, buffer: &[u8], format: TrfFormat) -> TrfResult<AnalysisReport> {
    let content = String::from_utf8_lossy(buffer);
    let transforms = parse_text_transforms(&content)?;
    info!(count = transforms.len(), "parsed text transforms");

    let metrics = summarize(&transforms);
    Ok(AnalysisReport {
        path: origin.to_path_buf(),
        file_size: buffer.len(),
        format,
        header: None,
        layout: LayoutOutcome::TextInput,
        transforms,
        metrics,
    })
}

fn analyze_binary(
    origin: &Path,
    buffer: &[u8],
    format: TrfFormat,
    options: &AnalysisOptions,
) -> TrfResult<AnalysisReport> {
    log_hex_preview(buffer);

    let header = probe_header(buffer);
    match &header {
        Some(h) => {
            info!(
                version = h.version,
                data_size = h.advertised_data_size,
                "binary header recognized"
            );
            warn!(
                advertised_frames = h.advertised_frame_count,
                "header frame counts are unreliable; not used for layout detection"
            );
        }
        None => debug!("no recognizable binary header"),
    }

    let search = LayoutSearch {
        sample_window: options.sample_window,
        expected_frames: options.expected_frames,
        ..Default::default()
    };

    if let Some(expected) = options.expected_frames {
        log_expectation_hints(buffer.len(), expected, &search);
    }

    let layout = match search.search(buffer) {
        Some(found) => LayoutOutcome::Detected(found),
        None => {
            warn!(
                header_size = LayoutCandidate::FALLBACK.header_size,
                record_size = LayoutCandidate::FALLBACK.record_size,
                "no layout candidate validated; falling back to default geometry"
            );
            LayoutOutcome::Fallback(LayoutCandidate::FALLBACK)
        }
    };

    // candidate() is always Some on the binary path.
    let geometry = layout.candidate().unwrap_or(LayoutCandidate::FALLBACK);
    let decoded = decode_transforms(buffer, geometry, options.max_records);

    log_value_distribution(&decoded.transforms);
    if !decoded.transforms.is_empty() {
        let valid_pct = 100.0 * decoded.valid_count() as f64 / decoded.transforms.len() as f64;
        info!(
            total = decoded.transforms.len(),
            valid = decoded.valid_count(),
            valid_pct,
            "decoded transforms"
        );
    }

    let metrics = summarize(&decoded.valid).map(|mut m| {
        m.frame_count = decoded.transforms.len();
        m.valid_frame_count = decoded.valid_count();
        m
    });

    Ok(AnalysisReport {
        path: origin.to_path_buf(),
        file_size: buffer.len(),
        format,
        header,
        layout,
        transforms: decoded.transforms,
        metrics,
    })
}

/// Hex dump of the input prefix, for reverse-engineering sessions.
fn log_hex_preview(buffer: &[u8]) {
    let preview = &buffer[..buffer.len().min(HEX_PREVIEW_LEN)];
    for start in (0..preview.len()).step_by(16) {
        let chunk = &preview[start..preview.len().min(start + 16)];
        let hex = chunk
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
            .collect();
        debug!("  {start:04x}: {hex:<47} |{ascii}|");
    }
}

/// Log what the frame-count expectation implies about the geometry, and
/// the feasible configurations closest to it.
fn log_expectation_hints(buffer_len: usize, expected: u64, search: &LayoutSearch) {
    info!(expected, "biasing layout detection toward expected frame count");

    for &header_size in &search.header_sizes {
        let implied = buffer_len.saturating_sub(header_size) as f64 / expected as f64;
        debug!(
            header_size,
            implied_record_size = implied,
            "expectation-implied record size"
        );
    }

    let mut configs = search.feasible_configs(buffer_len);
    configs.sort_by_key(|c| (c.frame_count as i64 - expected as i64).unsigned_abs());
    for config in configs.iter().take(5) {
        info!(
            header_size = config.layout.header_size,
            record_size = config.layout.record_size,
            frames = config.frame_count,
            diff_from_expected = config.frame_count as i64 - expected as i64,
            "feasible configuration"
        );
    }
}

/// Debug summary of the decoded value distribution (first 1000 frames).
fn log_value_distribution(transforms: &[Transform]) {
    if transforms.len() <= 100 {
        return;
    }
    let window = &transforms[..transforms.len().min(1000)];

    let describe = |label: &str, values: Vec<f64>| {
        let mut sorted = values;
        sorted.sort_by(|a, b| a.total_cmp(b));
        debug!(
            "  {label}: min={:.3}, max={:.3}, median={:.3}",
            sorted[0],
            sorted[sorted.len() - 1],
            sorted[sorted.len() / 2]
        );
    };

    debug!("value distribution (first {} frames):", window.len());
    describe("dx", window.iter().map(|t| t.dx).collect());
    describe("dy", window.iter().map(|t| t.dy).collect());
    describe("da", window.iter().map(|t| t.da.unwrap_or(0.0)).collect());
}
