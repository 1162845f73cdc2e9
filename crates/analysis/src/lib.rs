//! trfscope Analysis Core
//!
//! Recovers per-frame motion corrections from TRF files whose binary
//! layout is unknown or loosely documented, then reduces them to
//! stability metrics for quality comparison between runs.
//!
//! The pipeline runs as one sequential computation per input:
//! sniff → (text parse) or (header probe → layout search → bulk decode)
//! → metrics → comparison. The buffer is read once and treated as
//! read-only throughout.
//!
//! All binary decode failures are recoverable: an unrecognized header,
//! an undetected layout, a truncated record, or an out-of-range field
//! each degrade to a smaller valid result instead of aborting. Only
//! missing input files fail a run.

pub mod compare;
pub mod decode;
pub mod layout;
pub mod metrics;
pub mod pipeline;
pub mod probe;

pub use compare::*;
pub use decode::*;
pub use layout::*;
pub use metrics::*;
pub use pipeline::*;
pub use probe::*;
