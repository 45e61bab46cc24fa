//! Graph storage layer
//!
//! Provides the packed run-length link array, the metadata derived from it,
//! the title map, and their on-disk caches (raw big-endian arrays and
//! Parquet).

pub mod metadata;
pub mod packed;
#[cfg(feature = "storage")]
pub mod parquet;
pub mod raw;
pub mod titles;

pub use metadata::GraphMetadata;
pub use packed::{PackedLinks, PageId, Runs};
pub use raw::{read_scores, write_scores};
pub use titles::PageTitles;
