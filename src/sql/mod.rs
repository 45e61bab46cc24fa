//! SQL dump parsing
//!
//! Recognizes exactly one statement shape, a bulk
//! ``INSERT INTO `table` VALUES (..),(..);`` line, and turns its value list
//! into typed row tuples.

pub mod reader;
pub mod tuples;
pub mod value;

pub use reader::InsertReader;
pub use tuples::parse_tuples;
pub use value::{format_tuples, Tuple, Value};
