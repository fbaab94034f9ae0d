//! Shared numerical routines.
//!
//! Every topology leans on the same three primitives: bracketing binary
//! search on a monotone axis, Wachspress generalized barycentric
//! coordinates for non-rectangular cells, and periodic coordinate folding.

pub mod periodic;
pub mod search;
pub mod wachspress;

pub use periodic::fold;
pub use search::bracket;
pub use wachspress::wachspress_weights;
