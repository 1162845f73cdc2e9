//! trfscope Transform Model
//!
//! Defines the core data contracts for trfscope:
//! - **Transform:** Per-frame motion correction (dx, dy, da)
//! - **Format:** Text/binary classification of TRF inputs
//! - **Header:** The advisory binary file header
//! - **Layout:** Hypothesized binary record geometry
//!
//! Transforms carry no identity beyond their position: frame numbers are
//! implicit in sequence order (0-based, contiguous, matching decode order).

pub mod format;
pub mod header;
pub mod layout;
pub mod transform;

pub use format::*;
pub use header::*;
pub use layout::*;
pub use transform::*;
