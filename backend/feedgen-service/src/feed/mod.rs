//! Shared merge and pagination logic used by every feed algorithm.

pub mod cursor;
pub mod merge;
pub mod paginate;

pub use merge::{merge_rank, TargetBatch};
pub use paginate::{clamp_limit, paginate};
