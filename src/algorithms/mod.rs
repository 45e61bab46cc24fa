//! Graph algorithms
//!
//! Power-iteration `PageRank` over the packed link representation.

pub mod pagerank;

pub use pagerank::{l1_delta, pagerank, Damping, Pagerank};
