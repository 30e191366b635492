pub mod build;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;

pub use build::build;
pub use error::{CatalogError, Result};
pub use index::{CatalogIndex, InvertedIndex, Position, Record, RecordStore};
pub use query::{directors, lookup_boolean, lookup_exact, read_description, QueryPlan};
