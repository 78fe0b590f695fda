//! jupgrade: JUnit 4 to JUnit 5 test-source rewriter
//!
//! Parses Java test sources into a lossless syntax tree, rewrites the tree
//! through fixed rule tables (imports, annotations, `@Test` attributes,
//! assertion messages, display names) and prints it back. Untouched regions
//! keep their exact formatting.

// Core infrastructure - re-exported from jupgrade-core
pub use jupgrade_core::diff;
pub use jupgrade_core::error;
pub use jupgrade_core::files;
pub use jupgrade_core::hash;
pub use jupgrade_core::output;

// Rewrite engine
pub mod convert;
pub mod rewrite;
pub mod rules;

// Front doors
pub mod batch;
pub mod cli;

// Error bridges - converts rewrite-layer errors to JupError
mod error_bridges;

pub use convert::{convert_source, Conversion, ConversionSummary, ConvertError, ConvertOptions};
pub use rules::RuleTables;
