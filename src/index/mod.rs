//! Search index module
//!
//! Defines the SearchIndex trait, the Meilisearch client and the embedded
//! tantivy index.

mod embedded;
mod error;
mod meili;
mod traits;
mod types;

pub use embedded::TantivyIndex;
pub use error::IndexError;
pub use meili::MeiliClient;
pub use traits::SearchIndex;
pub use types::*;
