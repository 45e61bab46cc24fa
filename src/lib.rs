//! wiki-pagerank: `PageRank` over Wikipedia's page-link graph
//!
//! # Overview
//!
//! Reads the `page` and `pagelinks` tables straight from Wikipedia's SQL dump
//! files, packs the link graph into a run-length array of incoming links, and
//! ranks every article by power iteration.
//!
//! # Quick Start
//!
//! ```
//! use wiki_pagerank::sql::{parse_tuples, Value};
//! use wiki_pagerank::{Damping, PackedLinks, PageId, Pagerank};
//!
//! // Rows of one `INSERT INTO ... VALUES` statement
//! let rows = parse_tuples("(1,0,'Tokyo'),(2,0,'Kyoto')").unwrap();
//! assert_eq!(rows[1][2], Value::from("Kyoto"));
//!
//! // Kyoto → Tokyo, Tokyo has no outgoing links
//! let links = PackedLinks::from_edges([(PageId(2), PageId(1))]);
//! let mut pr = Pagerank::new(&links).unwrap();
//! for _ in 0..20 {
//!     pr.iterate(Damping::default());
//! }
//! assert!(pr.scores()[1] > pr.scores()[2]);
//! ```
//!
//! # Architecture
//!
//! - **Parsing**: single-pass state machine over `VALUES` lists ([`sql`])
//! - **Storage**: packed incoming-link runs, page metadata, raw and Parquet caches ([`storage`])
//! - **Algorithms**: double-buffered `PageRank` with dangling-node redistribution ([`algorithms`])
//! - **Pipeline**: cache-or-parse loading, iteration with progress logging ([`pipeline`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod ranking;
pub mod sql;
pub mod storage;

// Re-export core types
pub use algorithms::{l1_delta, pagerank, Damping, Pagerank};
pub use config::Config;
pub use error::{Error, Result};
pub use storage::{GraphMetadata, PackedLinks, PageId, PageTitles};
