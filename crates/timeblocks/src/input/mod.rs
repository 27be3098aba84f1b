//! Input parsing and data source handling.

mod parser;
mod source;
mod timestamp;

pub use parser::{ColumnNames, Loader, LoaderConfig};
pub use source::{content_hash, SourceMetadata};
pub use timestamp::parse_timestamp;
